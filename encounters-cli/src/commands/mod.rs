//! Command implementations for the encounters CLI

pub mod serve;

pub use serve::run_serve;
