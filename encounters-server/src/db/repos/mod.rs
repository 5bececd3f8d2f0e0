//! Encounter storage contract and its adapters
//!
//! Every adapter follows these rules:
//! - Identifiers are generated by the store, never taken from the caller on create
//! - List operations are full scans in storage-native order
//! - Updates overwrite the whole field whitelist and report zero matches as NotFound
//! - Deleting a base encounter cascades to children by parent id, without a transaction

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::models::{
    Encounter, EncounterId, HiddenLocationEncounter, HiddenLocationEncounterId, NewEncounter,
    SocialEncounter, SocialEncounterId, ValidationError,
};

pub use memory::MemoryEncounterStore;
pub use postgres::PgEncounterStore;

/// Storage error type
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("document error: {0}")]
    Document(#[from] serde_json::Error),

    #[error("invalid stored value: {0}")]
    InvalidRecord(#[from] ValidationError),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },
}

impl StoreError {
    pub(crate) fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }
}

/// CRUD contract shared by every storage backend.
#[async_trait]
pub trait EncounterStore: Send + Sync {
    /// Insert a base encounter under a fresh id and return the stored record.
    async fn create_encounter(&self, encounter: NewEncounter) -> Result<Encounter, StoreError>;

    async fn create_social_encounter(&self, encounter: SocialEncounter) -> Result<(), StoreError>;

    async fn create_hidden_location_encounter(
        &self,
        encounter: HiddenLocationEncounter,
    ) -> Result<(), StoreError>;

    async fn list_encounters(&self) -> Result<Vec<Encounter>, StoreError>;

    async fn list_social_encounters(&self) -> Result<Vec<SocialEncounter>, StoreError>;

    async fn list_hidden_location_encounters(
        &self,
    ) -> Result<Vec<HiddenLocationEncounter>, StoreError>;

    async fn get_encounter(&self, id: EncounterId) -> Result<Option<Encounter>, StoreError>;

    /// First social encounter attached to the given base encounter.
    async fn social_encounter_for(
        &self,
        encounter_id: EncounterId,
    ) -> Result<Option<SocialEncounter>, StoreError>;

    /// First hidden-location encounter attached to the given base encounter.
    async fn hidden_location_encounter_for(
        &self,
        encounter_id: EncounterId,
    ) -> Result<Option<HiddenLocationEncounter>, StoreError>;

    async fn update_encounter(&self, encounter: &Encounter) -> Result<(), StoreError>;

    async fn update_social_encounter(&self, encounter: &SocialEncounter) -> Result<(), StoreError>;

    async fn update_hidden_location_encounter(
        &self,
        encounter: &HiddenLocationEncounter,
    ) -> Result<(), StoreError>;

    /// Delete a base encounter, then its hidden-location and social children.
    ///
    /// Returns NotFound without touching children when the base is missing.
    /// A child failure is returned as-is; the base stays deleted.
    async fn delete_encounter(&self, id: EncounterId) -> Result<(), StoreError>;

    async fn delete_social_encounter(&self, id: SocialEncounterId) -> Result<(), StoreError>;

    async fn delete_hidden_location_encounter(
        &self,
        id: HiddenLocationEncounterId,
    ) -> Result<(), StoreError>;
}
