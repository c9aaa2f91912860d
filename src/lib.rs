//! Polls: list published questions, vote on a choice, and see the tallies.
//!
//! Questions become visible once their publication time has passed. Until then every
//! page that names them answers 404, exactly as for a question that does not exist.
//! Votes are counted with a single atomic update in the store.
use std::sync::Arc;

use tokio::{net::TcpListener, signal};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod poll;
pub mod routes;
pub mod store;
pub mod templates;

use config::Config;
use db::PgStore;
use error::Result;
use routes::{create_routes, AppState};
use store::{seed_sample, MemoryStore, PollStore};

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("polls=info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).compact())
        .init();
}

/// Picks Postgres when a database URL is configured, memory otherwise.
pub async fn open_store(config: &Config) -> Result<Arc<dyn PollStore>> {
    let store: Arc<dyn PollStore> = match &config.database_url {
        Some(url) => {
            info!("Connecting to Postgres...");
            let pool = db::create_pool(url, config.max_connections).await?;
            let store = PgStore::new(pool);
            store.ensure_schema().await?;
            Arc::new(store)
        }
        None => {
            info!("DATABASE_URL not set, keeping polls in memory");
            Arc::new(MemoryStore::new())
        }
    };

    if config.seed {
        seed_sample(store.as_ref()).await?;
    }

    Ok(store)
}

pub async fn start_server(config: Config) -> Result<()> {
    let store = open_store(&config).await?;
    let app = create_routes(AppState::new(store));

    let address = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, shutting down");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
