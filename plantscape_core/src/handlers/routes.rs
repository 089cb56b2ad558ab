//! Route table for the public API

use axum::{
    routing::{get, post},
    Router,
};

use super::{contact::handle_contact, feed::handle_feed, health::handle_health};
use crate::AppState;

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handle_health))
        .route("/api/contact", post(handle_contact))
        .route("/api/instagram", get(handle_feed))
}
