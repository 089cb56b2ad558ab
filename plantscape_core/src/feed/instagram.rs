//! Instagram Graph API media listing

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use super::{FeedError, FeedSource};
use crate::config::FeedConfig;
use crate::models::FeedPost;

const MEDIA_FIELDS: &str = "id,media_type,media_url,caption,permalink,timestamp";

#[derive(Debug, Clone)]
pub struct InstagramFeed {
    client: reqwest::Client,
    endpoint: Url,
    access_token: String,
    limit: usize,
}

impl InstagramFeed {
    pub fn new(config: &FeedConfig) -> Result<Self, FeedError> {
        let access_token = config
            .access_token()
            .map(str::to_string)
            .ok_or_else(|| FeedError::NotConfigured("missing access token".to_string()))?;

        let endpoint = Url::parse(&config.endpoint)
            .map_err(|e| FeedError::NotConfigured(format!("invalid endpoint: {}", e)))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| FeedError::NotConfigured(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            access_token,
            limit: config.limit,
        })
    }

    fn media_url(&self) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("fields", MEDIA_FIELDS)
            .append_pair("access_token", &self.access_token)
            .append_pair("limit", &self.limit.to_string());
        url
    }
}

#[async_trait]
impl FeedSource for InstagramFeed {
    async fn recent_posts(&self) -> Result<Vec<FeedPost>, FeedError> {
        let response = self
            .client
            .get(self.media_url())
            .send()
            .await
            .map_err(|e| FeedError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Upstream {
                status: status.as_u16(),
            });
        }

        let listing = response
            .json::<MediaListing>()
            .await
            .map_err(|e| FeedError::InvalidResponse(e.without_url().to_string()))?;

        Ok(listing
            .data
            .into_iter()
            .filter(FeedPost::is_displayable)
            .collect())
    }

    fn kind(&self) -> &'static str {
        "instagram"
    }
}

#[derive(Deserialize)]
struct MediaListing {
    #[serde(default)]
    data: Vec<FeedPost>,
}
