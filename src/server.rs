//! HTTP server initialization and runtime setup.
//!
//! Connects the configured link store, builds the application state and runs
//! the Axum server until Ctrl+C.

use crate::application::services::LinkService;
use crate::config::{Config, StoreBackend};
use crate::domain::repositories::LinkRepository;
use crate::infrastructure::persistence::{
    DynamoLinkRepository, MemoryLinkRepository, PgLinkRepository,
};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;

/// Opens a PostgreSQL pool sized from the configuration and applies migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn connect_postgres(config: &Config) -> Result<PgPool> {
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL is required for the postgres backend")?;

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(config.db_acquire_timeout())
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    Ok(pool)
}

/// Builds the link store selected by `STORE_BACKEND`.
///
/// # Errors
///
/// Returns an error if the backend cannot be reached at startup.
pub async fn connect_store(config: &Config) -> Result<Arc<dyn LinkRepository>> {
    let repository: Arc<dyn LinkRepository> = match config.store_backend {
        StoreBackend::Postgres => {
            let pool = connect_postgres(config).await?;
            Arc::new(PgLinkRepository::new(Arc::new(pool)))
        }
        StoreBackend::DynamoDb => {
            let table = config
                .dynamodb_table
                .as_deref()
                .context("DYNAMODB_TABLE is required for the dynamodb backend")?;
            let repository = DynamoLinkRepository::connect(
                table,
                config.dynamodb_endpoint.as_deref(),
                config.store_timeout(),
            )
            .await;
            tracing::info!(table = %repository.table(), "DynamoDB client ready");
            Arc::new(repository)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store, links are lost on restart");
            Arc::new(MemoryLinkRepository::new())
        }
    };

    Ok(repository)
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => tracing::warn!("Failed to listen for Ctrl+C: {}. Shutting down.", e),
    }
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - The configured link store (PostgreSQL with migrations, DynamoDB, or memory)
/// - The link service
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Store connection fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let repository = connect_store(&config).await?;

    if let Err(e) = repository.ping().await {
        tracing::warn!(backend = repository.backend(), error = %e, "Store not reachable at startup");
    }

    let link_service = LinkService::new(repository, config.service_settings());
    let state = AppState::new(Arc::new(link_service));

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address: {}", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
