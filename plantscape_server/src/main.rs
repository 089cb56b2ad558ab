//! Main entry point for the HTTP server binary

use anyhow::Result;
use plantscape_core::{
    build_mailer, create_app_with_config, run_server, spawn_eviction_task, AppConfig, AppState,
};
use std::net::SocketAddr;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = AppConfig::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    info!("Configuration loaded successfully");
    info!("Server will bind to: {}", config.bind_address());
    info!("Contact notifications go to: {}", config.contact.recipient);

    let addr: SocketAddr = config
        .bind_address()
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid bind address: {}", e))?;

    let mailer = build_mailer(&config.mail)
        .map_err(|e| anyhow::anyhow!("Failed to initialize mailer: {}", e))?;

    let state = AppState::from_config(&config, mailer)?;

    info!("App: {} v{}", state.app_name, state.version);
    info!(
        mailer = state.gateway.mailer_kind(),
        feed = state.feed.kind(),
        "Collaborators ready"
    );

    if let Some(limiter) = state.gateway.rate_limiter() {
        spawn_eviction_task(limiter.clone(), config.rate_limit.eviction_interval());
        info!(
            max_submissions = config.rate_limit.max_submissions,
            window_seconds = config.rate_limit.window_seconds,
            "Rate limiting enabled; idle identities evicted every {}s",
            config.rate_limit.eviction_interval_seconds
        );
    } else {
        warn!("Rate limiting is disabled");
    }

    let app = create_app_with_config(state, config);

    run_server(app, addr).await?;

    info!("Server shutdown complete");
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let default_level = if cfg!(debug_assertions) {
            "debug"
        } else {
            "info"
        };

        format!(
            "{}={},plantscape_core={},tower_http=debug,axum=debug",
            env!("CARGO_CRATE_NAME").replace('-', "_"),
            default_level,
            default_level
        )
        .into()
    });

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_file(true)
        .with_line_number(true);

    let is_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    if is_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.pretty())
            .init();
    }
}
