//! In-process document store
//!
//! Each entity kind lives in its own collection of JSON documents keyed by
//! `_id`, the same shape a document database would hold. Nothing survives a
//! restart.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{EncounterStore, StoreError};
use crate::models::{
    Encounter, EncounterId, HiddenLocationEncounter, HiddenLocationEncounterId, NewEncounter,
    SocialEncounter, SocialEncounterId,
};

const ID_KEY: &str = "_id";
const PARENT_KEY: &str = "encounterId";

type Collection = Vec<Value>;

#[derive(Default)]
struct Collections {
    encounters: Collection,
    social_encounters: Collection,
    hidden_location_encounters: Collection,
}

/// Memory-backed encounter store
#[derive(Default)]
pub struct MemoryEncounterStore {
    collections: RwLock<Collections>,
}

impl MemoryEncounterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn has_key(doc: &Value, key: &str, expected: &str) -> bool {
    doc.get(key).and_then(Value::as_str) == Some(expected)
}

fn decode_all<T: DeserializeOwned>(docs: &[Value]) -> Result<Vec<T>, StoreError> {
    docs.iter()
        .map(|doc| serde_json::from_value(doc.clone()).map_err(StoreError::from))
        .collect()
}

fn find_by<T: DeserializeOwned>(
    docs: &[Value],
    key: &str,
    expected: &str,
) -> Result<Option<T>, StoreError> {
    docs.iter()
        .find(|doc| has_key(doc, key, expected))
        .map(|doc| serde_json::from_value(doc.clone()))
        .transpose()
        .map_err(StoreError::from)
}

/// Overwrite the document with the matching `_id`. Returns whether one matched.
fn replace<T: Serialize>(docs: &mut [Value], id: &str, record: &T) -> Result<bool, StoreError> {
    let doc = serde_json::to_value(record)?;
    match docs.iter_mut().find(|d| has_key(d, ID_KEY, id)) {
        Some(slot) => {
            *slot = doc;
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Remove every document where `key` equals `expected`. Returns how many went.
fn remove_where(docs: &mut Collection, key: &str, expected: &str) -> usize {
    let before = docs.len();
    docs.retain(|doc| !has_key(doc, key, expected));
    before - docs.len()
}

#[async_trait]
impl EncounterStore for MemoryEncounterStore {
    async fn create_encounter(&self, encounter: NewEncounter) -> Result<Encounter, StoreError> {
        let id = EncounterId::new();
        let doc = serde_json::to_value(encounter.with_id(id))?;

        let mut collections = self.collections.write().await;
        collections.encounters.push(doc);

        find_by(&collections.encounters, ID_KEY, &id.to_string())?
            .ok_or_else(|| StoreError::not_found("encounter", id))
    }

    async fn create_social_encounter(&self, encounter: SocialEncounter) -> Result<(), StoreError> {
        let doc = serde_json::to_value(&encounter)?;
        self.collections.write().await.social_encounters.push(doc);
        Ok(())
    }

    async fn create_hidden_location_encounter(
        &self,
        encounter: HiddenLocationEncounter,
    ) -> Result<(), StoreError> {
        let doc = serde_json::to_value(&encounter)?;
        self.collections
            .write()
            .await
            .hidden_location_encounters
            .push(doc);
        Ok(())
    }

    async fn list_encounters(&self) -> Result<Vec<Encounter>, StoreError> {
        decode_all(&self.collections.read().await.encounters)
    }

    async fn list_social_encounters(&self) -> Result<Vec<SocialEncounter>, StoreError> {
        decode_all(&self.collections.read().await.social_encounters)
    }

    async fn list_hidden_location_encounters(
        &self,
    ) -> Result<Vec<HiddenLocationEncounter>, StoreError> {
        decode_all(&self.collections.read().await.hidden_location_encounters)
    }

    async fn get_encounter(&self, id: EncounterId) -> Result<Option<Encounter>, StoreError> {
        find_by(
            &self.collections.read().await.encounters,
            ID_KEY,
            &id.to_string(),
        )
    }

    async fn social_encounter_for(
        &self,
        encounter_id: EncounterId,
    ) -> Result<Option<SocialEncounter>, StoreError> {
        find_by(
            &self.collections.read().await.social_encounters,
            PARENT_KEY,
            &encounter_id.to_string(),
        )
    }

    async fn hidden_location_encounter_for(
        &self,
        encounter_id: EncounterId,
    ) -> Result<Option<HiddenLocationEncounter>, StoreError> {
        find_by(
            &self.collections.read().await.hidden_location_encounters,
            PARENT_KEY,
            &encounter_id.to_string(),
        )
    }

    async fn update_encounter(&self, encounter: &Encounter) -> Result<(), StoreError> {
        let id = encounter.id.to_string();
        let mut collections = self.collections.write().await;
        if !replace(&mut collections.encounters, &id, encounter)? {
            return Err(StoreError::not_found("encounter", id));
        }
        Ok(())
    }

    async fn update_social_encounter(&self, encounter: &SocialEncounter) -> Result<(), StoreError> {
        let id = encounter.id.to_string();
        let mut collections = self.collections.write().await;
        if !replace(&mut collections.social_encounters, &id, encounter)? {
            return Err(StoreError::not_found("social encounter", id));
        }
        Ok(())
    }

    async fn update_hidden_location_encounter(
        &self,
        encounter: &HiddenLocationEncounter,
    ) -> Result<(), StoreError> {
        let id = encounter.id.to_string();
        let mut collections = self.collections.write().await;
        if !replace(&mut collections.hidden_location_encounters, &id, encounter)? {
            return Err(StoreError::not_found("hidden location encounter", id));
        }
        Ok(())
    }

    async fn delete_encounter(&self, id: EncounterId) -> Result<(), StoreError> {
        let id = id.to_string();
        let mut collections = self.collections.write().await;

        if remove_where(&mut collections.encounters, ID_KEY, &id) == 0 {
            return Err(StoreError::not_found("encounter", id));
        }

        let hidden = remove_where(&mut collections.hidden_location_encounters, PARENT_KEY, &id);
        let social = remove_where(&mut collections.social_encounters, PARENT_KEY, &id);
        tracing::debug!(encounter_id = %id, hidden, social, "cascaded encounter delete");
        Ok(())
    }

    async fn delete_social_encounter(&self, id: SocialEncounterId) -> Result<(), StoreError> {
        let id = id.to_string();
        let mut collections = self.collections.write().await;
        if remove_where(&mut collections.social_encounters, ID_KEY, &id) == 0 {
            return Err(StoreError::not_found("social encounter", id));
        }
        Ok(())
    }

    async fn delete_hidden_location_encounter(
        &self,
        id: HiddenLocationEncounterId,
    ) -> Result<(), StoreError> {
        let id = id.to_string();
        let mut collections = self.collections.write().await;
        if remove_where(&mut collections.hidden_location_encounters, ID_KEY, &id) == 0 {
            return Err(StoreError::not_found("hidden location encounter", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EncounterKind, EncounterStatus, NewHiddenLocationEncounter, NewSocialEncounter};

    fn sample() -> NewEncounter {
        NewEncounter {
            name: "Old Town Square".into(),
            description: "Meet other tourists at the fountain".into(),
            xp_points: 120,
            status: EncounterStatus::Active,
            kind: EncounterKind::Social,
            latitude: 45.2551,
            longitude: 19.8451,
            should_be_approved: true,
        }
    }

    fn social_for(parent: EncounterId) -> SocialEncounter {
        NewSocialEncounter {
            encounter_id: parent,
            tourists_required_for_completion: 3,
            distance_threshold: 20.0,
            tourist_ids: vec![7, 9],
        }
        .with_id(SocialEncounterId::new())
    }

    fn hidden_for(parent: EncounterId) -> HiddenLocationEncounter {
        NewHiddenLocationEncounter {
            image_url: "https://img.example/clock.png".into(),
            image_latitude: 45.25,
            image_longitude: 19.84,
            distance_threshold: 5.0,
            encounter_id: parent,
        }
        .with_id(HiddenLocationEncounterId::new())
    }

    #[tokio::test]
    async fn create_returns_stored_record_with_fresh_id() {
        let store = MemoryEncounterStore::new();
        let first = store.create_encounter(sample()).await.unwrap();
        let second = store.create_encounter(sample()).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(first.name, "Old Town Square");
        assert_eq!(first.xp_points, 120);
        assert_eq!(store.list_encounters().await.unwrap(), vec![first, second]);
    }

    #[tokio::test]
    async fn documents_are_keyed_by_storage_id() {
        let store = MemoryEncounterStore::new();
        let created = store.create_encounter(sample()).await.unwrap();

        let collections = store.collections.read().await;
        let doc = &collections.encounters[0];
        assert!(has_key(doc, ID_KEY, &created.id.to_string()));
    }

    #[tokio::test]
    async fn update_overwrites_whole_record() {
        let store = MemoryEncounterStore::new();
        let created = store.create_encounter(sample()).await.unwrap();

        let replacement = Encounter {
            name: "Renamed".into(),
            description: String::new(),
            xp_points: 0,
            status: EncounterStatus::Archived,
            ..created.clone()
        };
        store.update_encounter(&replacement).await.unwrap();

        let stored = store.get_encounter(created.id).await.unwrap().unwrap();
        assert_eq!(stored, replacement);
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found_and_creates_nothing() {
        let store = MemoryEncounterStore::new();
        let ghost = sample().with_id(EncounterId::new());

        let err = store.update_encounter(&ghost).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { resource: "encounter", .. }));
        assert!(store.list_encounters().await.unwrap().is_empty());

        let err = store.update_social_encounter(&social_for(ghost.id)).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
        assert!(store.list_social_encounters().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_cascades_to_children_of_that_encounter_only() {
        let store = MemoryEncounterStore::new();
        let doomed = store.create_encounter(sample()).await.unwrap();
        let kept = store.create_encounter(sample()).await.unwrap();

        store.create_social_encounter(social_for(doomed.id)).await.unwrap();
        store.create_hidden_location_encounter(hidden_for(doomed.id)).await.unwrap();
        let kept_social = social_for(kept.id);
        store.create_social_encounter(kept_social.clone()).await.unwrap();

        store.delete_encounter(doomed.id).await.unwrap();

        assert_eq!(store.list_encounters().await.unwrap(), vec![kept]);
        assert_eq!(store.list_social_encounters().await.unwrap(), vec![kept_social]);
        assert!(store.list_hidden_location_encounters().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_without_children_succeeds() {
        let store = MemoryEncounterStore::new();
        let lonely = store.create_encounter(sample()).await.unwrap();

        store.delete_encounter(lonely.id).await.unwrap();
        assert!(store.list_encounters().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_unknown_encounter_leaves_orphans_alone() {
        let store = MemoryEncounterStore::new();
        let missing = EncounterId::new();
        store.create_social_encounter(social_for(missing)).await.unwrap();

        let err = store.delete_encounter(missing).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
        assert_eq!(store.list_social_encounters().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn lookup_by_parent_returns_none_when_absent() {
        let store = MemoryEncounterStore::new();
        let parent = store.create_encounter(sample()).await.unwrap();
        assert!(store.social_encounter_for(parent.id).await.unwrap().is_none());

        let hidden = hidden_for(parent.id);
        store.create_hidden_location_encounter(hidden.clone()).await.unwrap();
        assert_eq!(
            store.hidden_location_encounter_for(parent.id).await.unwrap(),
            Some(hidden)
        );
    }

    #[tokio::test]
    async fn single_child_delete_reports_missing() {
        let store = MemoryEncounterStore::new();
        let social = social_for(EncounterId::new());
        store.create_social_encounter(social.clone()).await.unwrap();

        store.delete_social_encounter(social.id).await.unwrap();
        let err = store.delete_social_encounter(social.id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }
}
