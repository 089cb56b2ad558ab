//! Recent-posts feed for the site gallery

pub mod fallback;
pub mod instagram;

pub use fallback::{FallbackFeed, StaticFeed};
pub use instagram::InstagramFeed;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::FeedConfig;
use crate::models::FeedPost;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    #[error("feed is not configured: {0}")]
    NotConfigured(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("upstream returned status {status}")]
    Upstream { status: u16 },

    #[error("unreadable upstream response: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn recent_posts(&self) -> Result<Vec<FeedPost>, FeedError>;

    fn kind(&self) -> &'static str;
}

/// Instagram when an access token is configured, otherwise the static
/// gallery.
pub fn build_feed(config: &FeedConfig) -> Result<Arc<dyn FeedSource>, FeedError> {
    let fallback = StaticFeed::from_config(config);

    if config.access_token().is_none() {
        info!("No Instagram access token configured, serving static gallery");
        return Ok(Arc::new(fallback));
    }

    let instagram = InstagramFeed::new(config)?;

    if config.fallback_on_error {
        Ok(Arc::new(FallbackFeed::new(Arc::new(instagram), fallback)))
    } else {
        warn!("Instagram fallback disabled, upstream errors will surface as 500s");
        Ok(Arc::new(instagram))
    }
}
