//! Contact form submission handler

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
};
use tracing::debug;

use crate::{
    contact::Delivered,
    error::Result,
    middleware::rate_limit::client_identity,
    AppState,
};

/// Body stays raw; the gateway rate-checks the caller before parsing it.
pub async fn handle_contact(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Delivered> {
    let identity = client_identity(&headers);
    debug!(%identity, bytes = body.len(), "POST /api/contact");

    state.gateway.handle(&body, &identity).await
}
