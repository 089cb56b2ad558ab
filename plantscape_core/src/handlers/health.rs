//! Liveness endpoint

use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use crate::{models::ApiResponse, AppState};

pub async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    let rate_limited_identities = state
        .gateway
        .rate_limiter()
        .map(|limiter| limiter.tracked_identities())
        .unwrap_or(0);

    Json(ApiResponse::success(json!({
        "status": "healthy",
        "app": state.app_name,
        "version": state.version,
        "timestamp": chrono::Utc::now().timestamp(),
        "mailer": state.gateway.mailer_kind(),
        "feed": state.feed.kind(),
        "rate_limited_identities": rate_limited_identities,
    })))
}
