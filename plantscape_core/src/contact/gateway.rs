//! Contact submission pipeline: rate check, parse, validate, compose, deliver

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use futures_util::FutureExt;
use serde::Serialize;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{info, warn};

use super::compose::Composer;
use crate::config::AppConfig;
use crate::error::{AppError, Result};
use crate::mail::Mailer;
use crate::middleware::rate_limit::RateLimiter;
use crate::models::SubmissionInput;
use crate::validation::ContactFormValidator;

pub const SUCCESS_MESSAGE: &str = "Email sent successfully";

/// Body of a 200 response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Delivered {
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl IntoResponse for Delivered {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[derive(Clone)]
pub struct ContactGateway {
    limiter: Option<RateLimiter>,
    validator: ContactFormValidator,
    composer: Composer,
    mailer: Arc<dyn Mailer>,
    expose_validation_details: bool,
}

impl ContactGateway {
    pub fn new(config: &AppConfig, mailer: Arc<dyn Mailer>) -> anyhow::Result<Self> {
        let limiter = config
            .rate_limit
            .enable
            .then(|| RateLimiter::new(&config.rate_limit));

        Ok(Self {
            limiter,
            validator: ContactFormValidator::new(config.contact.limits.clone()),
            composer: Composer::from_config(&config.contact)?,
            mailer,
            expose_validation_details: config.contact.expose_validation_details,
        })
    }

    pub fn with_rate_limiter(mut self, limiter: RateLimiter) -> Self {
        self.limiter = Some(limiter);
        self
    }

    pub fn rate_limiter(&self) -> Option<&RateLimiter> {
        self.limiter.as_ref()
    }

    pub fn mailer_kind(&self) -> &'static str {
        self.mailer.kind()
    }

    /// Produces exactly one outcome per call. Rate-limited calls never reach
    /// the validator or the mailer.
    pub async fn handle(&self, body: &[u8], identity: &str) -> Result<Delivered> {
        if let Some(limiter) = &self.limiter {
            limiter
                .check_and_record(identity)
                .map_err(|exceeded| AppError::RateLimited {
                    retry_after_seconds: exceeded.retry_after_seconds(),
                })?;
        }

        match AssertUnwindSafe(self.process(body, identity)).catch_unwind().await {
            Ok(outcome) => outcome,
            Err(panic) => Err(AppError::Other(anyhow::anyhow!(
                "panic while handling contact submission: {}",
                panic_message(panic.as_ref())
            ))),
        }
    }

    async fn process(&self, body: &[u8], identity: &str) -> Result<Delivered> {
        let input = parse_submission(body)?;

        let submission = self.validator.validate(&input).map_err(|result| {
            info!(identity, fields = ?result.failed_fields(), "Contact submission failed validation");
            AppError::ValidationFailed {
                details: self.expose_validation_details.then_some(result.errors),
            }
        })?;

        let notification = self.composer.compose(&submission, Utc::now());

        let receipt = self.mailer.send(&notification).await?;

        info!(
            identity,
            mailer = self.mailer.kind(),
            id = ?receipt.id,
            "Contact submission delivered"
        );

        Ok(Delivered {
            message: SUCCESS_MESSAGE,
            id: receipt.id,
        })
    }
}

fn parse_submission(body: &[u8]) -> Result<SubmissionInput> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|e| AppError::MalformedRequest(e.to_string()))?;

    if !value.is_object() {
        warn!("Contact payload is not a JSON object");
        return Err(AppError::MalformedRequest("expected a JSON object".to_string()));
    }

    serde_json::from_value(value).map_err(|e| AppError::MalformedRequest(e.to_string()))
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
