//! # stockroomd — stockroom daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (CLI args, env vars, config file)
//! - Initialize logging
//! - Open the photo directory
//! - Pick a storage backend; for `SQLite`, keep retrying the connection until
//!   the database answers
//! - Construct the device service, injecting adapters via port traits
//! - Build the axum router, bind a TCP port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer; no domain logic belongs here.

mod cli;
mod config;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use stockroom_adapter_http_axum::router::{self, RouterOptions};
use stockroom_adapter_http_axum::state::AppState;
use stockroom_adapter_photos_fs::LocalPhotoStore;
use stockroom_adapter_storage_memory::InMemoryDeviceRepository;
use stockroom_adapter_storage_sqlite_sqlx::SqliteDeviceRepository;
use stockroom_app::ports::{DeviceRepository, PhotoStore};
use stockroom_app::services::device_service::DeviceService;

use crate::cli::Cli;
use crate::config::{Config, StorageBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(&cli).context("failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // Photos
    let photos = LocalPhotoStore::open(&config.photos.dir)
        .await
        .context("failed to open photo directory")?;
    tracing::info!(dir = %photos.root().display(), "photo directory ready");

    // Storage
    match config.storage.backend {
        StorageBackend::Memory => {
            tracing::info!("using in-memory storage");
            let service = DeviceService::new(InMemoryDeviceRepository::new(), photos);
            serve(&config, service, true).await
        }
        StorageBackend::Sqlite => {
            tracing::info!("using sqlite storage");
            let db = stockroom_adapter_storage_sqlite_sqlx::Config {
                database_url: config.database.url.clone(),
            }
            .build_with_retry(config.retry_interval())
            .await;
            let service = DeviceService::new(SqliteDeviceRepository::new(db.pool().clone()), photos);
            serve(&config, service, false).await
        }
    }
}

/// Bind the listener and serve until a shutdown signal arrives.
async fn serve<R, P>(
    config: &Config,
    service: DeviceService<R, P>,
    serve_forms: bool,
) -> anyhow::Result<()>
where
    R: DeviceRepository + Send + Sync + 'static,
    P: PhotoStore + Send + Sync + 'static,
{
    let options = RouterOptions {
        serve_forms,
        max_upload_bytes: config.server.max_upload_bytes,
    };
    let app = router::build(AppState::new(service), options);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!("stockroomd listening on http://{bind_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("stockroomd stopped");
    Ok(())
}

/// Resolve on Ctrl-C or, on unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received, draining connections");
}
