use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use plantscape_core::{
    create_app_with_config,
    feed::{FallbackFeed, FeedError, FeedSource, StaticFeed},
    models::FeedPost,
    AppConfig, AppState, ContactGateway, InMemoryMailer,
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

struct BrokenFeed;

#[async_trait]
impl FeedSource for BrokenFeed {
    async fn recent_posts(&self) -> Result<Vec<FeedPost>, FeedError> {
        Err(FeedError::Upstream { status: 400 })
    }

    fn kind(&self) -> &'static str {
        "broken"
    }
}

fn setup_app(feed: Arc<dyn FeedSource>) -> Router {
    let config = AppConfig::default();
    let gateway = ContactGateway::new(&config, Arc::new(InMemoryMailer::new())).unwrap();
    let state = AppState::new(gateway, feed);

    create_app_with_config(state, config)
}

async fn get_feed(app: Router) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri("/api/instagram").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_static_gallery_without_token() {
    let config = AppConfig::default();
    let feed = plantscape_core::build_feed(&config.feed).unwrap();
    assert_eq!(feed.kind(), "static");

    let (status, body) = get_feed(setup_app(feed)).await;

    assert_eq!(status, StatusCode::OK);
    let posts = body["posts"].as_array().unwrap();
    assert_eq!(posts.len(), config.feed.fallback_images.len());
    assert_eq!(posts[0]["media_type"], "IMAGE");
    assert_eq!(posts[0]["permalink"], config.feed.profile_url.as_str());
}

#[tokio::test]
async fn test_upstream_failure_falls_back_to_gallery() {
    let config = AppConfig::default();
    let feed = FallbackFeed::new(Arc::new(BrokenFeed), StaticFeed::from_config(&config.feed));

    let (status, body) = get_feed(setup_app(Arc::new(feed))).await;

    assert_eq!(status, StatusCode::OK);
    assert!(!body["posts"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_upstream_failure_without_fallback() {
    let (status, body) = get_feed(setup_app(Arc::new(BrokenFeed))).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to fetch Instagram posts");
}
