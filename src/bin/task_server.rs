//! Serves the task REST API.
//!
//! Usage:
//!
//! ```text
//! task_server [--bind 127.0.0.1:8000] [--storage postgres|memory] [--database-url URL]
//! ```
//!
//! Run `task_server --help` for every flag and its environment variable.
//! The `tasks` table must already exist; see `migrations/`.

use clap::Parser;
use std::sync::Arc;
use taskdesk::config::{ServerConfig, StorageKind, load_env_file};
use taskdesk::http::router;
use taskdesk::sql::connect_pool;
use taskdesk::task::{
    adapters::{memory::InMemoryTaskRepository, postgres::PostgresTaskRepository},
    ports::TaskRepository,
    services::TaskService,
};
use taskdesk::telemetry::init_tracing;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let env_file = load_env_file()?;
    let config = ServerConfig::parse();
    init_tracing(&config.log_filter)?;
    if let Some(path) = env_file {
        info!(path = %path.display(), "loaded environment file");
    }

    let repository = build_repository(&config)?;
    let app = router(TaskService::new(repository));

    let listener = TcpListener::bind(config.bind).await?;
    info!(
        address = %listener.local_addr()?,
        storage = ?config.storage,
        app_env = ?config.app_env,
        "task server listening"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("task server stopped");
    Ok(())
}

fn build_repository(config: &ServerConfig) -> Result<Arc<dyn TaskRepository>, BoxError> {
    match config.storage {
        StorageKind::Memory => {
            warn!("using in-memory storage; tasks are lost on exit");
            Ok(Arc::new(InMemoryTaskRepository::new()))
        }
        StorageKind::Postgres => {
            let database = &config.database;
            info!(
                url = %database.redacted_url()?,
                pool_size = database.pool_size,
                "connecting to PostgreSQL"
            );
            let pool = connect_pool(&database.connection_url()?, database.pool_size)?;
            Ok(Arc::new(PostgresTaskRepository::new(pool)))
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
