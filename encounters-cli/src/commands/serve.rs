//! HTTP server command for the encounters API
//!
//! Picks a storage backend, wires it into the service and runs the server
//! until shutdown.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use encounters_server::db::{self, StoreBackend, DEFAULT_MAX_CONNECTIONS};
use encounters_server::http::{run_server, AppState, ServerConfig};
use encounters_server::EncounterService;

/// Storage adapter selection
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    /// PostgreSQL (requires DATABASE_URL)
    Postgres,
    /// In-process store, lost on exit
    Memory,
}

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "ENCOUNTERS_BIND", default_value = "0.0.0.0:4000")]
    pub bind: SocketAddr,

    /// Storage backend
    #[arg(long, value_enum, env = "ENCOUNTERS_STORE", default_value = "postgres")]
    pub store: StoreKind,

    /// Database URL (required for the postgres store)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Maximum pooled database connections
    #[arg(long, default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,

    /// Directory served for paths no route claims
    #[arg(long, default_value = "./static")]
    pub static_dir: PathBuf,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,
}

impl ServeArgs {
    fn backend(&self) -> Result<StoreBackend> {
        match self.store {
            StoreKind::Memory => Ok(StoreBackend::Memory),
            StoreKind::Postgres => {
                let database_url = self
                    .database_url
                    .clone()
                    .context("DATABASE_URL not set. Set via --database-url, DATABASE_URL env or .env, or use --store memory")?;
                Ok(StoreBackend::Postgres {
                    database_url,
                    max_connections: self.max_connections,
                })
            }
        }
    }

    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            bind_addr: self.bind,
            cors_permissive: self.cors_permissive,
            static_dir: self.static_dir.clone(),
            request_timeout: Duration::from_secs(self.timeout),
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let backend = args.backend()?;

    tracing::info!(store = backend.name(), "Starting encounters server on {}", args.bind);

    let store = db::connect(&backend)
        .await
        .context("Failed to open encounter store")?;

    let state = AppState {
        service: EncounterService::new(store),
        store_name: backend.name(),
    };

    // Blocks until shutdown
    run_server(state, args.server_config())
        .await
        .context("Server error")?;

    Ok(())
}
