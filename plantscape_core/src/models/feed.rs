//! Image feed payloads

use serde::{Deserialize, Serialize};

pub const MEDIA_IMAGE: &str = "IMAGE";
pub const MEDIA_VIDEO: &str = "VIDEO";
pub const MEDIA_CAROUSEL_ALBUM: &str = "CAROUSEL_ALBUM";

/// One post as listed by the Instagram media endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedPost {
    pub id: String,
    #[serde(default)]
    pub media_url: Option<String>,
    pub media_type: String,
    #[serde(default)]
    pub caption: Option<String>,
    pub permalink: String,
    pub timestamp: String,
}

impl FeedPost {
    pub fn is_displayable(&self) -> bool {
        matches!(
            self.media_type.as_str(),
            MEDIA_IMAGE | MEDIA_VIDEO | MEDIA_CAROUSEL_ALBUM
        )
    }
}

#[derive(Debug, Serialize)]
pub struct FeedResponse {
    pub posts: Vec<FeedPost>,
}
