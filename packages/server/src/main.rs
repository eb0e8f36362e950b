use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use chatlog_common::PayloadEnricher;
use chatlog_common::storage::s3_store::S3ObjectStore;
use chatlog_common::storage::{ImageStore, UrlIssuer, UrlMode};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

use chatlog_server::config::AppConfig;
use chatlog_server::database;
use chatlog_server::service::ChatRecordService;
use chatlog_server::state::AppState;
use chatlog_server::store::SeaOrmRecordStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AppConfig::load().context("Failed to load config")?;

    let db = database::init_db(&config.database)
        .await
        .context("Failed to initialize database")?;
    database::ensure_indexes(&db).await;

    let object_store = Arc::new(
        S3ObjectStore::new(&config.storage).context("Failed to initialize object storage")?,
    );
    if config.storage.ensure_bucket {
        object_store
            .ensure_bucket(&config.storage.bucket)
            .await
            .context("Failed to ensure object storage bucket")?;
    }

    let mode = config.storage.url_mode();
    match &mode {
        UrlMode::Public { endpoint } => info!(%endpoint, "Issuing public image URLs"),
        UrlMode::Private => info!("Issuing presigned image URLs"),
    }
    let issuer = UrlIssuer::new(config.storage.bucket.clone(), mode, object_store.clone());
    let images = ImageStore::new(config.storage.bucket.clone(), object_store);

    let shutdown = CancellationToken::new();
    let state = AppState {
        records: ChatRecordService::new(
            Arc::new(SeaOrmRecordStore::new(db)),
            PayloadEnricher::new(issuer),
            images,
        ),
        shutdown: shutdown.clone(),
        config: config.clone(),
    };

    let app = chatlog_server::build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    Ok(())
}

/// Wait for Ctrl+C, then cancel in-flight work.
async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
    shutdown.cancel();
}
