//! Database layer - connection pool, migrations and encounter stores
//!
//! The backend is picked once at startup and shared behind
//! `Arc<dyn EncounterStore>`; nothing above this module knows which one runs.

pub mod migrations;
pub mod pool;
pub mod repos;

use std::sync::Arc;

pub use pool::{create_pool, create_pool_with_options, DEFAULT_MAX_CONNECTIONS};
pub use repos::*;

/// Which storage adapter to run with
#[derive(Debug, Clone)]
pub enum StoreBackend {
    /// PostgreSQL via sqlx; migrations run on connect
    Postgres {
        database_url: String,
        max_connections: u32,
    },
    /// In-process document collections, lost on exit
    Memory,
}

impl StoreBackend {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Postgres { .. } => "postgres",
            Self::Memory => "memory",
        }
    }
}

/// Open the configured backend.
pub async fn connect(backend: &StoreBackend) -> Result<Arc<dyn EncounterStore>, StoreError> {
    match backend {
        StoreBackend::Postgres {
            database_url,
            max_connections,
        } => {
            let pool = create_pool_with_options(database_url, *max_connections).await?;
            migrations::run(&pool).await?;
            tracing::info!(max_connections, "Connected to PostgreSQL");
            Ok(Arc::new(PgEncounterStore::new(pool)))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data is lost on shutdown");
            Ok(Arc::new(MemoryEncounterStore::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_backend_connects_without_database() {
        let store = connect(&StoreBackend::Memory).await.unwrap();
        assert!(store.list_encounters().await.unwrap().is_empty());
    }

    #[test]
    fn backend_names() {
        assert_eq!(StoreBackend::Memory.name(), "memory");
        let pg = StoreBackend::Postgres {
            database_url: "postgres://localhost/encounters".into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        };
        assert_eq!(pg.name(), "postgres");
    }
}
