//! Encounter service
//!
//! Thin layer between handlers and the store. Its only decision is to mint
//! ids for specialized encounters so handlers can echo the full record.

use std::sync::Arc;

use crate::db::{EncounterStore, StoreError};
use crate::models::{
    Encounter, EncounterId, HiddenLocationEncounter, HiddenLocationEncounterId, NewEncounter,
    NewHiddenLocationEncounter, NewSocialEncounter, SocialEncounter, SocialEncounterId,
};

#[derive(Clone)]
pub struct EncounterService {
    store: Arc<dyn EncounterStore>,
}

impl EncounterService {
    pub fn new(store: Arc<dyn EncounterStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, encounter: NewEncounter) -> Result<Encounter, StoreError> {
        self.store.create_encounter(encounter).await
    }

    pub async fn create_social_encounter(
        &self,
        encounter: NewSocialEncounter,
    ) -> Result<SocialEncounter, StoreError> {
        let encounter = encounter.with_id(SocialEncounterId::new());
        self.store.create_social_encounter(encounter.clone()).await?;
        Ok(encounter)
    }

    pub async fn create_hidden_location_encounter(
        &self,
        encounter: NewHiddenLocationEncounter,
    ) -> Result<HiddenLocationEncounter, StoreError> {
        let encounter = encounter.with_id(HiddenLocationEncounterId::new());
        self.store
            .create_hidden_location_encounter(encounter.clone())
            .await?;
        Ok(encounter)
    }

    pub async fn get_all_encounters(&self) -> Result<Vec<Encounter>, StoreError> {
        self.store.list_encounters().await
    }

    pub async fn get_all_social_encounters(&self) -> Result<Vec<SocialEncounter>, StoreError> {
        self.store.list_social_encounters().await
    }

    pub async fn get_all_hidden_location_encounters(
        &self,
    ) -> Result<Vec<HiddenLocationEncounter>, StoreError> {
        self.store.list_hidden_location_encounters().await
    }

    pub async fn get_encounter(&self, id: EncounterId) -> Result<Option<Encounter>, StoreError> {
        self.store.get_encounter(id).await
    }

    /// `Ok(None)` means no social encounter hangs off this base encounter.
    pub async fn social_encounter_id(
        &self,
        encounter_id: EncounterId,
    ) -> Result<Option<SocialEncounterId>, StoreError> {
        Ok(self
            .store
            .social_encounter_for(encounter_id)
            .await?
            .map(|social| social.id))
    }

    /// `Ok(None)` means no hidden-location encounter hangs off this base encounter.
    pub async fn hidden_location_encounter_id(
        &self,
        encounter_id: EncounterId,
    ) -> Result<Option<HiddenLocationEncounterId>, StoreError> {
        Ok(self
            .hidden_location_encounter_for(encounter_id)
            .await?
            .map(|hidden| hidden.id))
    }

    pub async fn hidden_location_encounter_for(
        &self,
        encounter_id: EncounterId,
    ) -> Result<Option<HiddenLocationEncounter>, StoreError> {
        self.store.hidden_location_encounter_for(encounter_id).await
    }

    pub async fn update(&self, encounter: &Encounter) -> Result<(), StoreError> {
        self.store.update_encounter(encounter).await
    }

    pub async fn update_social_encounter(
        &self,
        encounter: &SocialEncounter,
    ) -> Result<(), StoreError> {
        self.store.update_social_encounter(encounter).await
    }

    pub async fn update_hidden_location_encounter(
        &self,
        encounter: &HiddenLocationEncounter,
    ) -> Result<(), StoreError> {
        self.store.update_hidden_location_encounter(encounter).await
    }

    pub async fn delete_encounter(&self, id: EncounterId) -> Result<(), StoreError> {
        self.store.delete_encounter(id).await
    }

    pub async fn delete_social_encounter(&self, id: SocialEncounterId) -> Result<(), StoreError> {
        self.store.delete_social_encounter(id).await
    }

    pub async fn delete_hidden_location_encounter(
        &self,
        id: HiddenLocationEncounterId,
    ) -> Result<(), StoreError> {
        self.store.delete_hidden_location_encounter(id).await
    }
}
