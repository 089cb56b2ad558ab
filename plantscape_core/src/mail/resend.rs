//! Resend email API client

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::{DeliveryError, DeliveryReceipt, Mailer, NotificationMessage};
use crate::config::{BodyFormat, MailConfig};

const USER_AGENT: &str = concat!("plantscape-contact/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct ResendMailer {
    client: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

impl ResendMailer {
    pub fn new(config: &MailConfig) -> Result<Self, DeliveryError> {
        let api_key = config
            .api_key()
            .map(str::to_string)
            .ok_or_else(|| DeliveryError::NotConfigured("missing API key".to_string()))?;

        let endpoint = Url::parse(&config.endpoint)
            .map_err(|e| DeliveryError::NotConfigured(format!("invalid endpoint: {}", e)))?;

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| DeliveryError::NotConfigured(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, message: &NotificationMessage) -> Result<DeliveryReceipt, DeliveryError> {
        let (text, html) = match message.format {
            BodyFormat::Text => (Some(message.body.as_str()), None),
            BodyFormat::Html => (None, Some(message.body.as_str())),
        };

        let request = SendEmailRequest {
            from: &message.from,
            to: [&message.to],
            subject: &message.subject,
            text,
            html,
            reply_to: &message.reply_to,
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .await
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error").to_string());

            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .json::<SendEmailResponse>()
            .await
            .map_err(|e| DeliveryError::InvalidResponse(e.to_string()))?;

        debug!(id = ?body.id, "Resend accepted message");

        Ok(DeliveryReceipt { id: body.id })
    }

    fn kind(&self) -> &'static str {
        "resend"
    }
}

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    html: Option<&'a str>,
    reply_to: &'a str,
}

#[derive(Deserialize)]
struct SendEmailResponse {
    id: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    message: Option<String>,
}
