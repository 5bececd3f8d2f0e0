//! encounters-server: REST backend for tourism encounters
//!
//! Create, list, update and delete base encounters together with their
//! social and hidden-location specializations. Storage is pluggable:
//! PostgreSQL for deployments, an in-process document store for local runs
//! and tests.

pub mod db;
pub mod http;
pub mod models;
pub mod service;

pub use db::{EncounterStore, StoreBackend, StoreError};
pub use http::{run_server, AppState, ServerConfig, ServerError};
pub use service::EncounterService;
