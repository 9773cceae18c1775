mod config;
mod db;
mod errors;
mod history;
mod routes;
mod screening;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, HistoryBackend};
use crate::db::{create_pool, ensure_schema};
use crate::history::{FileHistoryStore, HistoryStore, InMemoryHistoryStore, PgHistoryStore};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on invalid env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Screener API v{}", env!("CARGO_PKG_VERSION"));

    let history = build_history_store(&config).await?;
    info!("Score history backend: {}", history.backend());
    info!(
        "Recruiter batches score up to {} resumes in parallel",
        config.scoring_workers
    );

    let state = AppState {
        config: config.clone(),
        history,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the history store selected by `HISTORY_BACKEND`.
async fn build_history_store(config: &Config) -> Result<Arc<dyn HistoryStore>> {
    let store: Arc<dyn HistoryStore> = match config.history_backend {
        HistoryBackend::File => {
            let store = FileHistoryStore::open(config.history_dir.clone())?;
            info!("Score history directory: {}", store.dir().display());
            Arc::new(store)
        }
        HistoryBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is required for postgres history"))?;
            let pool = create_pool(url).await?;
            ensure_schema(&pool).await?;
            Arc::new(PgHistoryStore::new(pool))
        }
        HistoryBackend::Memory => Arc::new(InMemoryHistoryStore::new()),
    };
    Ok(store)
}
