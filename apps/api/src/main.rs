mod branches;
mod config;
mod db;
mod errors;
mod extract;
mod hierarchy;
mod models;
mod notes;
mod pull_requests;
mod routes;
mod seed;
mod state;
mod store;
mod validation;

#[cfg(test)]
mod test_support;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, StorageBackend};
use crate::db::{create_pool, run_migrations};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{MemoryStore, PgStore, ResearchStore};

#[derive(Parser)]
#[command(name = "archivist")]
#[command(about = "Branch-aware annotation service for archival research")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve {
        /// Load the demo dataset before serving
        #[arg(long, env = "SEED_DEMO_DATA")]
        seed: bool,
    },

    /// Load the demo dataset and exit
    Seed,

    /// Apply database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command.unwrap_or(Commands::Serve { seed: false }) {
        Commands::Serve { seed } => serve(config, seed).await,
        Commands::Seed => {
            let store = build_store(&config).await?;
            seed::run_seed(store.as_ref(), config.default_user()).await;
            Ok(())
        }
        Commands::Migrate => {
            let pool = create_pool(config.require_database_url()?, config.db_max_connections).await?;
            run_migrations(&pool).await
        }
    }
}

async fn serve(config: Config, seed_demo: bool) -> Result<()> {
    info!("Starting Archivist API v{}", env!("CARGO_PKG_VERSION"));

    let store = build_store(&config).await?;

    // Authored rows reference the default user, so it must exist first.
    store.upsert_user(config.default_user()).await?;
    info!("Default user {} ready", config.default_user_id);

    if seed_demo {
        seed::run_seed(store.as_ref(), config.default_user()).await;
    }

    let state = AppState {
        store,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once a frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Picks the persistence backend from configuration.
async fn build_store(config: &Config) -> Result<Arc<dyn ResearchStore>> {
    match config.storage_backend {
        StorageBackend::Postgres => {
            let pool =
                create_pool(config.require_database_url()?, config.db_max_connections).await?;
            if config.run_migrations {
                run_migrations(&pool).await?;
            }
            Ok(Arc::new(PgStore::new(pool)))
        }
        StorageBackend::Memory => {
            info!("Using in-memory storage; data is lost on exit");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
