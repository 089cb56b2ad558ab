use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_RECIPIENT: &str = "rachel@prosperplantscapes.com";
pub const DEFAULT_SENDER: &str = "Prosper Contact Form <rachel@prosperplantscapes.com>";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub contact: ContactConfig,
    pub rate_limit: RateLimitConfig,
    pub mail: MailConfig,
    pub feed: FeedConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyFormat {
    Text,
    Html,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactConfig {
    pub sender: String,
    pub recipient: String,
    /// When set, 400 responses carry the per-field validation messages.
    pub expose_validation_details: bool,
    pub body_format: BodyFormat,
    /// IANA zone used for the "Submitted on" line of the notification.
    pub timezone: String,
    pub limits: ContactLimits,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactLimits {
    pub name_min: usize,
    pub name_max: usize,
    pub email_max: usize,
    pub phone_max: usize,
    pub phone_min_digits: usize,
    pub referral_source_max: usize,
    pub message_min: usize,
    pub message_max: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub enable: bool,
    pub max_submissions: usize,
    pub window_seconds: u64,
    pub eviction_interval_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    pub access_token: Option<String>,
    pub endpoint: String,
    pub limit: usize,
    pub profile_url: String,
    pub fallback_on_error: bool,
    pub fallback_images: Vec<FallbackImage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackImage {
    pub src: String,
    pub alt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            contact: ContactConfig::default(),
            rate_limit: RateLimitConfig::default(),
            mail: MailConfig::default(),
            feed: FeedConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            max_body_bytes: 64 * 1024,
        }
    }
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            sender: DEFAULT_SENDER.to_string(),
            recipient: DEFAULT_RECIPIENT.to_string(),
            expose_validation_details: false,
            body_format: BodyFormat::Text,
            timezone: "America/Chicago".to_string(),
            limits: ContactLimits::default(),
        }
    }
}

impl Default for ContactLimits {
    fn default() -> Self {
        Self {
            name_min: 2,
            name_max: 100,
            // RFC 5321 path limit
            email_max: 254,
            phone_max: 20,
            phone_min_digits: 10,
            referral_source_max: 500,
            message_min: 10,
            message_max: 3000,
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enable: true,
            max_submissions: 3,
            window_seconds: 60,
            eviction_interval_seconds: 300,
        }
    }
}

impl RateLimitConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_seconds)
    }

    pub fn eviction_interval(&self) -> Duration {
        Duration::from_secs(self.eviction_interval_seconds)
    }
}

impl MailConfig {
    /// The API key, unless unset or blank.
    pub fn api_key(&self) -> Option<&str> {
        non_blank(self.api_key.as_deref())
    }
}

impl FeedConfig {
    /// The access token, unless unset or blank.
    pub fn access_token(&self) -> Option<&str> {
        non_blank(self.access_token.as_deref())
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: "https://api.resend.com/emails".to_string(),
            timeout_seconds: 15,
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            endpoint: "https://graph.instagram.com/me/media".to_string(),
            limit: 12,
            profile_url: "https://instagram.com/prosperplantscapes".to_string(),
            fallback_on_error: true,
            fallback_images: default_fallback_images(),
        }
    }
}

fn default_fallback_images() -> Vec<FallbackImage> {
    [
        ("/images/gallery1.jpeg", "Outdoor succulent and cactus arrangement in weathered stone planters"),
        ("/images/gallery4.jpeg", "Elegant interior plant arrangement with snake plants and fiddle leaf figs"),
        ("/images/gallery5.jpeg", "Statement plant installation in geometric brass planter for commercial lobby"),
        ("/images/gallery3.jpeg", "Office balcony with sleek black planters containing agave and rosemary"),
        ("/images/gallery7.jpeg", "Hanging plants in white ceramic planters with rope suspension"),
        ("/images/gallery8.jpeg", "Minimalist plant arrangement in cream ceramic planters"),
    ]
    .into_iter()
    .map(|(src, alt)| FallbackImage {
        src: src.to_string(),
        alt: alt.to_string(),
    })
    .collect()
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
                "https://prosperplantscapes.com".to_string(),
                "https://www.prosperplantscapes.com".to_string(),
            ],
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?);

        if std::path::Path::new("config.toml").exists() {
            builder = builder.add_source(File::with_name("config"));
        }

        builder = builder.add_source(
            Environment::with_prefix("APP")
                .separator("__")
                .try_parsing(true),
        );

        // Variable names the site deployment already uses.
        builder = builder
            .set_override_option("contact.recipient", non_empty_env("EMAIL_TO"))?
            .set_override_option("mail.api_key", non_empty_env("RESEND_API_KEY"))?
            .set_override_option("feed.access_token", non_empty_env("INSTAGRAM_ACCESS_TOKEN"))?;

        let config = builder.build()?;
        let app_config: AppConfig = config.try_deserialize()?;

        app_config.validate()?;

        Ok(app_config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Message("Server port cannot be 0".to_string()));
        }

        if self.server.max_body_bytes == 0 {
            return Err(ConfigError::Message(
                "Max body size must be greater than 0".to_string(),
            ));
        }

        if self.contact.recipient.trim().is_empty() {
            return Err(ConfigError::Message(
                "Contact recipient cannot be empty".to_string(),
            ));
        }

        if self.contact.sender.trim().is_empty() {
            return Err(ConfigError::Message(
                "Contact sender cannot be empty".to_string(),
            ));
        }

        if self.contact.timezone.parse::<chrono_tz::Tz>().is_err() {
            return Err(ConfigError::Message(format!(
                "Unknown timezone '{}'",
                self.contact.timezone
            )));
        }

        let limits = &self.contact.limits;
        if limits.name_min > limits.name_max || limits.message_min > limits.message_max {
            return Err(ConfigError::Message(
                "Contact field minimums cannot exceed their maximums".to_string(),
            ));
        }

        if self.rate_limit.max_submissions == 0 {
            return Err(ConfigError::Message(
                "Rate limit max submissions must be greater than 0".to_string(),
            ));
        }

        if self.rate_limit.window_seconds == 0 {
            return Err(ConfigError::Message(
                "Rate limit window must be greater than 0".to_string(),
            ));
        }

        if self.rate_limit.eviction_interval_seconds == 0 {
            return Err(ConfigError::Message(
                "Rate limit eviction interval must be greater than 0".to_string(),
            ));
        }

        if url::Url::parse(&self.mail.endpoint).is_err() {
            return Err(ConfigError::Message(format!(
                "Invalid mail endpoint '{}'",
                self.mail.endpoint
            )));
        }

        if url::Url::parse(&self.feed.endpoint).is_err() {
            return Err(ConfigError::Message(format!(
                "Invalid feed endpoint '{}'",
                self.feed.endpoint
            )));
        }

        if self.feed.limit == 0 {
            return Err(ConfigError::Message(
                "Feed limit must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}
