//! DouK Gateway - HTTP front end for douyin/tiktok content extraction.
//!
//! This binary loads the settings document, builds the web extraction engine,
//! and starts the HTTP server.

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use douk_gateway::{
    config::Config,
    extract::WebExtractor,
    server::{create_router, AppState, RouterConfig},
    SettingsStore,
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    // Initialize logging
    init_logging(config.verbose);

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    // Load the settings document
    let settings = match SettingsStore::load(&config.settings) {
        Ok(settings) => settings,
        Err(e) => {
            error!("Failed to load settings: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let snapshot = settings.snapshot().await;

    info!("Configuration:");
    info!("  Settings document: {}", config.settings.display());
    if !snapshot.proxy.is_empty() {
        info!("  Proxy: {}", snapshot.proxy);
    }
    info!("  Upstream timeout: {}s", snapshot.timeout);

    // Auth status with warning when the gate is open
    let token_set = config.token.is_some() || !snapshot.token.is_empty();
    if token_set {
        info!("  Auth: token required");
    } else {
        warn!("  Auth: DISABLED - no API token configured");
        warn!("        Set --token, DOUK_TOKEN, or the token field in the settings document");
    }

    // Build the extraction engine
    let extractor = match WebExtractor::new(&snapshot) {
        Ok(extractor) => extractor,
        Err(e) => {
            error!("Failed to build extraction engine: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Build router configuration
    let mut router_config = RouterConfig::new().with_tracing(!config.no_tracing);
    if let Some(ref token) = config.token {
        router_config = router_config.with_token(token.clone());
    }
    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    // Create router
    let state = AppState::new(extractor, settings);
    let router = create_router(state, router_config);

    // Bind and serve
    let addr = config.bind_address(&snapshot);

    info!("");
    info!("Server listening on: http://{}", addr);
    info!("  Probe the token gate:  curl -H 'token: <token>' http://{}/token", addr);
    info!("  Read the settings:     curl -H 'token: <token>' http://{}/settings", addr);
    info!("");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "douk_gateway=debug,tower_http=debug"
    } else {
        "douk_gateway=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
