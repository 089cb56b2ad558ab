//! Image feed handler

use axum::{extract::State, Json};
use tracing::debug;

use crate::{error::Result, models::FeedResponse, AppState};

pub async fn handle_feed(State(state): State<AppState>) -> Result<Json<FeedResponse>> {
    let posts = state.feed.recent_posts().await?;
    debug!(source = state.feed.kind(), count = posts.len(), "GET /api/instagram");

    Ok(Json(FeedResponse { posts }))
}
