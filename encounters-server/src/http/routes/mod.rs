//! Route handlers organized by resource

pub mod health;
pub mod encounters;
pub mod social;
pub mod hidden_location;
