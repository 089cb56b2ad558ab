//! In-process outbox, used when no provider is configured

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::{DeliveryError, DeliveryReceipt, Mailer, NotificationMessage};

#[derive(Clone, Default)]
pub struct InMemoryMailer {
    outbox: Arc<Mutex<Vec<NotificationMessage>>>,
    failure: Arc<Mutex<Option<String>>>,
}

impl InMemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mailer whose every send fails with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        let mailer = Self::new();
        mailer.set_failure(Some(reason.into()));
        mailer
    }

    pub fn set_failure(&self, reason: Option<String>) {
        *self.failure.lock() = reason;
    }

    pub fn sent(&self) -> Vec<NotificationMessage> {
        self.outbox.lock().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.outbox.lock().len()
    }
}

#[async_trait]
impl Mailer for InMemoryMailer {
    async fn send(&self, message: &NotificationMessage) -> Result<DeliveryReceipt, DeliveryError> {
        if let Some(reason) = self.failure.lock().clone() {
            return Err(DeliveryError::Transport(reason));
        }

        let id = format!("mem-{}", Uuid::new_v4());
        info!(%id, to = %message.to, subject = %message.subject, "Stored notification in memory outbox");

        self.outbox.lock().push(message.clone());

        Ok(DeliveryReceipt { id: Some(id) })
    }

    fn kind(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BodyFormat;
    use chrono::Utc;

    fn message() -> NotificationMessage {
        NotificationMessage {
            from: "form@example.com".to_string(),
            to: "owner@example.com".to_string(),
            subject: "New Contact Form Submission from Jane Doe".to_string(),
            body: "Hello".to_string(),
            format: BodyFormat::Text,
            reply_to: "jane@example.com".to_string(),
            submitted_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_records_sent_messages() {
        let mailer = InMemoryMailer::new();
        let receipt = mailer.send(&message()).await.unwrap();

        assert!(receipt.id.unwrap().starts_with("mem-"));
        assert_eq!(mailer.sent_count(), 1);
        assert_eq!(mailer.sent()[0].reply_to, "jane@example.com");
    }

    #[tokio::test]
    async fn test_failing_mailer_records_nothing() {
        let mailer = InMemoryMailer::failing("smtp unreachable");
        let err = mailer.send(&message()).await.unwrap_err();

        assert_eq!(err, DeliveryError::Transport("smtp unreachable".to_string()));
        assert_eq!(mailer.sent_count(), 0);

        mailer.set_failure(None);
        assert!(mailer.send(&message()).await.is_ok());
    }
}
