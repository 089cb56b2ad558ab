//! Turns a validated submission into a notification email

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::config::{BodyFormat, ContactConfig};
use crate::mail::NotificationMessage;
use crate::models::ValidatedSubmission;

/// Removes angle brackets so submitted text cannot open markup in the
/// notification.
pub fn sanitize(value: &str) -> String {
    value.replace(['<', '>'], "")
}

/// Sender, recipient and rendering choices shared by every notification.
#[derive(Debug, Clone)]
pub struct Composer {
    sender: String,
    recipient: String,
    format: BodyFormat,
    timezone: Tz,
}

impl Composer {
    pub fn new(sender: String, recipient: String, format: BodyFormat, timezone: Tz) -> Self {
        Self {
            sender,
            recipient,
            format,
            timezone,
        }
    }

    /// Fails only when the configured timezone is unknown.
    pub fn from_config(config: &ContactConfig) -> anyhow::Result<Self> {
        let timezone = config
            .timezone
            .parse::<Tz>()
            .map_err(|_| anyhow::anyhow!("unknown timezone '{}'", config.timezone))?;

        Ok(Self::new(
            config.sender.clone(),
            config.recipient.clone(),
            config.body_format,
            timezone,
        ))
    }

    pub fn format(&self) -> BodyFormat {
        self.format
    }

    pub fn recipient(&self) -> &str {
        &self.recipient
    }

    pub fn compose(&self, submission: &ValidatedSubmission, submitted_at: DateTime<Utc>) -> NotificationMessage {
        let fields = SanitizedFields::from(submission);
        let submitted_on = self.format_timestamp(submitted_at);

        let body = match self.format {
            BodyFormat::Text => render_text(&fields, submission.email(), &submitted_on),
            BodyFormat::Html => render_html(&fields, submission.email(), &submitted_on),
        };

        NotificationMessage {
            from: self.sender.clone(),
            to: self.recipient.clone(),
            subject: format!("New Contact Form Submission from {}", fields.name),
            body,
            format: self.format,
            reply_to: submission.email().to_string(),
            submitted_at,
        }
    }

    /// e.g. `Friday, October 16, 2026 at 2:05 PM`
    pub fn format_timestamp(&self, at: DateTime<Utc>) -> String {
        at.with_timezone(&self.timezone)
            .format("%A, %B %-d, %Y at %-I:%M %p")
            .to_string()
    }
}

struct SanitizedFields {
    name: String,
    phone: Option<String>,
    referral_source: Option<String>,
    message: String,
}

impl From<&ValidatedSubmission> for SanitizedFields {
    fn from(submission: &ValidatedSubmission) -> Self {
        Self {
            name: sanitize(submission.name()),
            phone: submission.phone().map(sanitize),
            referral_source: submission.referral_source().map(sanitize),
            message: sanitize(submission.message()),
        }
    }
}

fn render_text(fields: &SanitizedFields, email: &str, submitted_on: &str) -> String {
    let mut body = String::from("New Contact Form Submission\n\n");
    body.push_str(&format!("Name: {}\n", fields.name));
    body.push_str(&format!("Email: {}\n", email));
    if let Some(phone) = &fields.phone {
        body.push_str(&format!("Phone: {}\n", phone));
    }
    if let Some(referral_source) = &fields.referral_source {
        body.push_str(&format!("How they heard about us: {}\n", referral_source));
    }
    body.push_str(&format!("Message: {}\n", fields.message));
    body.push_str("\n--------------------\n");
    body.push_str(&format!("Submitted on {}\n", submitted_on));
    body
}

fn render_html(fields: &SanitizedFields, email: &str, submitted_on: &str) -> String {
    let mut body = String::from("<h2>New Contact Form Submission</h2>\n");
    body.push_str(&format!("<p><strong>Name:</strong> {}</p>\n", html_text(&fields.name)));
    body.push_str(&format!("<p><strong>Email:</strong> {}</p>\n", html_text(email)));
    if let Some(phone) = &fields.phone {
        body.push_str(&format!("<p><strong>Phone:</strong> {}</p>\n", html_text(phone)));
    }
    if let Some(referral_source) = &fields.referral_source {
        body.push_str(&format!(
            "<p><strong>How they heard about us:</strong> {}</p>\n",
            html_text(referral_source)
        ));
    }
    body.push_str(&format!(
        "<p><strong>Message:</strong><br>{}</p>\n",
        html_text(&fields.message)
    ));
    body.push_str("<hr>\n");
    body.push_str(&format!("<p><em>Submitted on {}</em></p>\n", submitted_on));
    body
}

/// Text already stripped of angle brackets; escapes what is left and keeps
/// line breaks visible.
fn html_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace("\r\n", "<br>")
        .replace('\n', "<br>")
}
