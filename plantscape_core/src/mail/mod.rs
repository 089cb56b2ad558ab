//! Outbound notification delivery

pub mod memory;
pub mod resend;

pub use memory::InMemoryMailer;
pub use resend::ResendMailer;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::{BodyFormat, MailConfig};

/// An email about one contact submission. Built once, sent once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
    pub format: BodyFormat,
    pub reply_to: String,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub id: Option<String>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("mailer is not configured: {0}")]
    NotConfigured(String),

    #[error("provider rejected message ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unreadable provider response: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &NotificationMessage) -> Result<DeliveryReceipt, DeliveryError>;

    /// Short label used in logs and the health report.
    fn kind(&self) -> &'static str;
}

/// Resend when an API key is configured, otherwise the in-memory outbox.
pub fn build_mailer(config: &MailConfig) -> Result<Arc<dyn Mailer>, DeliveryError> {
    if config.api_key().is_none() {
        warn!("No mail API key configured, notifications are kept in memory only");
        return Ok(Arc::new(InMemoryMailer::new()));
    }

    let mailer = ResendMailer::new(config)?;
    info!("Sending contact notifications through Resend");
    Ok(Arc::new(mailer))
}
