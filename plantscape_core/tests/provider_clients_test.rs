use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use parking_lot::Mutex;
use plantscape_core::{
    config::{BodyFormat, FeedConfig, MailConfig},
    feed::{FeedError, FeedSource, InstagramFeed},
    mail::{DeliveryError, Mailer, NotificationMessage, ResendMailer},
};
use serde_json::{json, Value};
use std::{collections::HashMap, net::SocketAddr, sync::Arc};

async fn spawn_server(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

#[derive(Clone, Default)]
struct Captured {
    requests: Arc<Mutex<Vec<(Option<String>, Value)>>>,
}

async fn accept_email(
    State(captured): State<Captured>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let auth = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    captured.requests.lock().push((auth, body));

    Json(json!({ "id": "re_4f1c" }))
}

async fn reject_email() -> impl IntoResponse {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "statusCode": 422, "message": "Invalid `from` field." })),
    )
}

fn notification(format: BodyFormat) -> NotificationMessage {
    NotificationMessage {
        from: "Contact Form <onboarding@resend.dev>".to_string(),
        to: "owner@example.com".to_string(),
        subject: "New Contact Form Submission from Jane Doe".to_string(),
        body: "Message: hello".to_string(),
        format,
        reply_to: "jane@example.com".to_string(),
        submitted_at: Utc::now(),
    }
}

fn mail_config(addr: SocketAddr, path: &str) -> MailConfig {
    MailConfig {
        api_key: Some("re_test_key".to_string()),
        endpoint: format!("http://{}{}", addr, path),
        timeout_seconds: 5,
    }
}

#[tokio::test]
async fn test_resend_mailer_posts_message() {
    let captured = Captured::default();
    let app = Router::new()
        .route("/emails", post(accept_email))
        .with_state(captured.clone());
    let addr = spawn_server(app).await;

    let mailer = ResendMailer::new(&mail_config(addr, "/emails")).unwrap();
    let receipt = mailer.send(&notification(BodyFormat::Text)).await.unwrap();

    assert_eq!(receipt.id.as_deref(), Some("re_4f1c"));

    let requests = captured.requests.lock().clone();
    assert_eq!(requests.len(), 1);
    let (auth, body) = &requests[0];
    assert_eq!(auth.as_deref(), Some("Bearer re_test_key"));
    assert_eq!(body["to"], json!(["owner@example.com"]));
    assert_eq!(body["reply_to"], "jane@example.com");
    assert_eq!(body["text"], "Message: hello");
    assert!(body.get("html").is_none());
}

#[tokio::test]
async fn test_resend_mailer_sends_html_bodies_as_html() {
    let captured = Captured::default();
    let app = Router::new()
        .route("/emails", post(accept_email))
        .with_state(captured.clone());
    let addr = spawn_server(app).await;

    let mailer = ResendMailer::new(&mail_config(addr, "/emails")).unwrap();
    mailer.send(&notification(BodyFormat::Html)).await.unwrap();

    let requests = captured.requests.lock().clone();
    assert_eq!(requests[0].1["html"], "Message: hello");
    assert!(requests[0].1.get("text").is_none());
}

#[tokio::test]
async fn test_resend_rejection_carries_provider_detail() {
    let app = Router::new().route("/emails", post(reject_email));
    let addr = spawn_server(app).await;

    let mailer = ResendMailer::new(&mail_config(addr, "/emails")).unwrap();
    let err = mailer.send(&notification(BodyFormat::Text)).await.unwrap_err();

    assert_eq!(
        err,
        DeliveryError::Rejected {
            status: 422,
            message: "Invalid `from` field.".to_string(),
        }
    );
}

#[tokio::test]
async fn test_resend_unreachable_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mailer = ResendMailer::new(&mail_config(addr, "/emails")).unwrap();
    let err = mailer.send(&notification(BodyFormat::Text)).await.unwrap_err();

    assert!(matches!(err, DeliveryError::Transport(_)));
}

async fn media_listing(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    if params.get("access_token").map(String::as_str) != Some("ig_token") {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "bad token" })));
    }

    (
        StatusCode::OK,
        Json(json!({
            "data": [
                {
                    "id": "1790",
                    "media_type": "IMAGE",
                    "media_url": "https://cdn.example/1790.jpg",
                    "caption": "Fiddle leaf figs in the atrium",
                    "permalink": "https://www.instagram.com/p/1790/",
                    "timestamp": "2026-09-30T14:02:11+0000"
                },
                {
                    "id": "1791",
                    "media_type": "STORY",
                    "permalink": "https://www.instagram.com/p/1791/",
                    "timestamp": "2026-09-29T10:00:00+0000"
                },
                {
                    "id": "1792",
                    "media_type": "CAROUSEL_ALBUM",
                    "media_url": "https://cdn.example/1792.jpg",
                    "permalink": "https://www.instagram.com/p/1792/",
                    "timestamp": "2026-09-28T09:30:00+0000"
                }
            ]
        })),
    )
}

fn feed_config(addr: SocketAddr, token: &str) -> FeedConfig {
    FeedConfig {
        access_token: Some(token.to_string()),
        endpoint: format!("http://{}/me/media", addr),
        ..FeedConfig::default()
    }
}

#[tokio::test]
async fn test_instagram_feed_keeps_displayable_posts() {
    let app = Router::new().route("/me/media", get(media_listing));
    let addr = spawn_server(app).await;

    let feed = InstagramFeed::new(&feed_config(addr, "ig_token")).unwrap();
    let posts = feed.recent_posts().await.unwrap();

    let ids: Vec<&str> = posts.iter().map(|post| post.id.as_str()).collect();
    assert_eq!(ids, vec!["1790", "1792"]);
    assert_eq!(posts[0].caption.as_deref(), Some("Fiddle leaf figs in the atrium"));
    assert!(posts[1].caption.is_none());
}

#[tokio::test]
async fn test_instagram_upstream_error() {
    let app = Router::new().route("/me/media", get(media_listing));
    let addr = spawn_server(app).await;

    let feed = InstagramFeed::new(&feed_config(addr, "expired")).unwrap();
    let err = feed.recent_posts().await.unwrap_err();

    assert_eq!(err, FeedError::Upstream { status: 401 });
}
