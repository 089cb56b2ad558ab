//! Core library for the plantscape site backend: contact submissions, the
//! gallery feed and the HTTP router that serves them.

pub mod config;
pub mod contact;
pub mod error;
pub mod feed;
pub mod handlers;
pub mod mail;
pub mod middleware;
pub mod models;
pub mod validation;

pub use config::AppConfig;
pub use contact::{sanitize, Composer, ContactGateway, Delivered};
pub use error::{AppError, Result};
pub use feed::{build_feed, FeedError, FeedSource};
pub use handlers::routes::create_routes;
pub use mail::{build_mailer, DeliveryError, InMemoryMailer, Mailer, ResendMailer};
pub use middleware::cors::cors_layer_from_config;
pub use middleware::rate_limit::{client_identity, RateLimiter};
pub use validation::{ContactFormValidator, ValidationResult};

use axum::{extract::DefaultBodyLimit, middleware as axum_middleware, Router};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::{signal, task::JoinHandle};
use tracing::{debug, error, info};

#[derive(Clone)]
pub struct AppState {
    pub app_name: String,
    pub version: String,
    pub gateway: Arc<ContactGateway>,
    pub feed: Arc<dyn FeedSource>,
}

impl AppState {
    pub fn new(gateway: ContactGateway, feed: Arc<dyn FeedSource>) -> Self {
        Self {
            app_name: "Plantscape Contact Service".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            gateway: Arc::new(gateway),
            feed,
        }
    }

    /// Gateway and feed wired from config around the given mailer.
    pub fn from_config(config: &AppConfig, mailer: Arc<dyn Mailer>) -> anyhow::Result<Self> {
        let gateway = ContactGateway::new(config, mailer)?;
        let feed = build_feed(&config.feed)?;

        Ok(Self::new(gateway, feed))
    }

    pub fn with_feed(mut self, feed: Arc<dyn FeedSource>) -> Self {
        self.feed = feed;
        self
    }
}

pub fn create_app(state: AppState) -> Router {
    create_app_with_config(state, AppConfig::default())
}

pub fn create_app_with_config(state: AppState, config: AppConfig) -> Router {
    let mut router = Router::new().merge(create_routes());

    router = router.layer(DefaultBodyLimit::max(config.server.max_body_bytes));

    router = router.layer(middleware::cors::cors_layer_from_config(&config.cors));

    router = router.layer(axum_middleware::from_fn(
        middleware::security_headers::security_headers_middleware,
    ));

    router = router.layer(middleware::logging::logging_layer());

    router.with_state(state)
}

/// Periodically drops limiter identities with no live timestamps.
pub fn spawn_eviction_task(limiter: RateLimiter, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.tick().await;

        loop {
            interval.tick().await;

            let evicted = limiter.evict_idle();
            if evicted > 0 {
                debug!(
                    evicted,
                    remaining = limiter.tracked_identities(),
                    "Evicted idle rate limit identities"
                );
            }
        }
    })
}

pub async fn run_server(app: Router, addr: SocketAddr) -> anyhow::Result<()> {
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    let app = app.into_make_service_with_connect_info::<SocketAddr>();

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
