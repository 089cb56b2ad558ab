//! Static gallery and the fallback wrapper

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::warn;

use super::{FeedError, FeedSource};
use crate::config::{FallbackImage, FeedConfig};
use crate::models::feed::{FeedPost, MEDIA_IMAGE};

#[derive(Debug, Clone)]
pub struct StaticFeed {
    images: Vec<FallbackImage>,
    permalink: String,
}

impl StaticFeed {
    pub fn new(images: Vec<FallbackImage>, permalink: String) -> Self {
        Self { images, permalink }
    }

    pub fn from_config(config: &FeedConfig) -> Self {
        Self::new(config.fallback_images.clone(), config.profile_url.clone())
    }

    pub fn posts(&self) -> Vec<FeedPost> {
        let timestamp = Utc::now().to_rfc3339();

        self.images
            .iter()
            .enumerate()
            .map(|(index, image)| FeedPost {
                id: (index + 1).to_string(),
                media_url: Some(image.src.clone()),
                media_type: MEDIA_IMAGE.to_string(),
                caption: Some(image.alt.clone()),
                permalink: self.permalink.clone(),
                timestamp: timestamp.clone(),
            })
            .collect()
    }
}

#[async_trait]
impl FeedSource for StaticFeed {
    async fn recent_posts(&self) -> Result<Vec<FeedPost>, FeedError> {
        Ok(self.posts())
    }

    fn kind(&self) -> &'static str {
        "static"
    }
}

/// Serves the static gallery whenever the primary source fails.
pub struct FallbackFeed {
    primary: Arc<dyn FeedSource>,
    fallback: StaticFeed,
}

impl FallbackFeed {
    pub fn new(primary: Arc<dyn FeedSource>, fallback: StaticFeed) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl FeedSource for FallbackFeed {
    async fn recent_posts(&self) -> Result<Vec<FeedPost>, FeedError> {
        match self.primary.recent_posts().await {
            Ok(posts) => Ok(posts),
            Err(err) => {
                warn!(
                    timestamp = %Utc::now().to_rfc3339(),
                    error = %err,
                    source = self.primary.kind(),
                    "Feed unavailable, serving static gallery"
                );
                Ok(self.fallback.posts())
            }
        }
    }

    fn kind(&self) -> &'static str {
        "instagram+fallback"
    }
}
