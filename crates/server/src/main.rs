use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cinetag_core::{
    load_config, validate_config, MetadataGateway, MovieProvider, Recommender, TagTable,
    TmdbClient,
};
use cinetag_server::{create_router, AppState};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("cinetag {} starting", VERSION);

    let config_path = std::env::var("CINETAG_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;
    validate_config(&config).context("Invalid configuration")?;
    info!("Configuration loaded successfully");

    let tags = match &config.tags.keywords_csv {
        Some(path) => TagTable::with_keywords_file(path)
            .with_context(|| format!("Failed to load keyword table from {:?}", path))?,
        None => TagTable::builtin(),
    };
    info!("Tag table ready with {} entries", tags.len());

    let provider: Arc<dyn MovieProvider> = Arc::new(
        TmdbClient::new(config.tmdb.clone()).context("Failed to initialize TMDB client")?,
    );
    info!("Using movie provider: {}", provider.name());

    let gateway = Arc::new(MetadataGateway::new(provider, config.gateway_config()));
    let recommender = Arc::new(Recommender::new(
        gateway,
        Arc::new(tags),
        config.engine.clone(),
    ));

    let addr = SocketAddr::new(config.server.host, config.server.port);
    let state = Arc::new(AppState::new(config, recommender));
    let app = create_router(state);

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
