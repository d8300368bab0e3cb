//! dogdata-svc - dog age-band reference data service
//!
//! Serves per-breed, per-gender health and physical statistics split into
//! non-overlapping age bands over HTTP/JSON.

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};

use dogdata_svc::config::{Args, ServiceConfig};
use dogdata_svc::db::BreedRepository;
use dogdata_svc::services::AgeBandService;
use dogdata_svc::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = ServiceConfig::resolve(&args).context("Failed to load configuration")?;

    dogdata_common::config::init_tracing(&config.logging);

    let config_path = args.config_path();
    if config_path.exists() {
        info!("Configuration file: {}", config_path.display());
    } else {
        warn!(
            "Configuration file {} not found, using defaults and overrides",
            config_path.display()
        );
    }

    info!(
        "Starting dogdata-svc v{} (overlap policy: {}, revalidate updates: {})",
        env!("CARGO_PKG_VERSION"),
        config.validation.overlap_policy,
        config.validation.revalidate_updates
    );

    let db_path = config.database_path();
    info!("Database: {}", db_path.display());
    let pool = dogdata_common::db::init_database(&db_path)
        .await
        .context("Failed to initialize database")?;

    let repo = BreedRepository::new(pool.clone());
    let service = AgeBandService::new(repo, config.lifecycle_settings());
    let app = build_router(AppState::new(service));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    pool.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
