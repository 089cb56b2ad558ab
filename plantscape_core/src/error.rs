//! Application error types and handling

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::feed::FeedError;
use crate::mail::DeliveryError;

pub type Result<T> = std::result::Result<T, AppError>;

pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Too many submissions, retry after {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: u64 },

    /// `details` is only populated when the caller may see field messages.
    #[error("Validation failed")]
    ValidationFailed { details: Option<FieldErrors> },

    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error("Delivery failed: {0}")]
    DeliveryFailed(#[from] DeliveryError),

    #[error("Feed unavailable: {0}")]
    FeedUnavailable(#[from] FeedError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::ValidationFailed { .. } | AppError::MalformedRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::DeliveryFailed(_)
            | AppError::FeedUnavailable(_)
            | AppError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to hand to the client.
    pub fn public_message(&self) -> &'static str {
        match self {
            AppError::RateLimited { .. } => "Too many submissions. Please try again later.",
            AppError::ValidationFailed { .. } => "Invalid form data",
            AppError::MalformedRequest(_) => "Invalid data",
            AppError::DeliveryFailed(_) => "Failed to send email",
            AppError::FeedUnavailable(_) => "Failed to fetch Instagram posts",
            AppError::Other(_) => "Internal server error",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let timestamp = chrono::Utc::now().to_rfc3339();

        match &self {
            AppError::RateLimited { retry_after_seconds } => {
                tracing::info!(retry_after_seconds, "Submission rejected by rate limiter");
            }
            // The gateway logs the failing fields.
            AppError::ValidationFailed { .. } => {}
            AppError::MalformedRequest(detail) => {
                tracing::warn!(%timestamp, error = %detail, "Malformed contact payload");
            }
            AppError::DeliveryFailed(err) => {
                tracing::error!(%timestamp, error = %err, "Email send error");
            }
            AppError::FeedUnavailable(err) => {
                tracing::error!(%timestamp, error = %err, "Instagram API error");
            }
            AppError::Other(err) => {
                tracing::error!(%timestamp, error = ?err, "Unexpected error");
            }
        }

        let mut body = json!({ "error": self.public_message() });
        if let AppError::ValidationFailed { details: Some(details) } = &self {
            body["details"] = json!(details);
        }

        let mut response = (status, Json(body)).into_response();

        if let AppError::RateLimited { retry_after_seconds } = self {
            if let Ok(value) = HeaderValue::from_str(&retry_after_seconds.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }

        response
    }
}
