//! PostgreSQL encounter store
//!
//! One table per entity kind. Children point at their parent through an
//! `encounter_id` column that carries no foreign key, so orphans are possible.
//! Enum columns hold the numeric constants from the models.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{EncounterStore, StoreError};
use crate::models::{
    Encounter, EncounterId, EncounterKind, EncounterStatus, HiddenLocationEncounter,
    HiddenLocationEncounterId, NewEncounter, SocialEncounter, SocialEncounterId,
    ValidationError,
};

const ENCOUNTER_COLUMNS: &str =
    "id, name, description, xp_points, status, kind, latitude, longitude, should_be_approved";
const SOCIAL_COLUMNS: &str =
    "id, encounter_id, tourists_required_for_completion, distance_threshold, tourist_ids";
const HIDDEN_LOCATION_COLUMNS: &str =
    "id, encounter_id, image_url, image_latitude, image_longitude, distance_threshold";

#[derive(Debug, FromRow)]
struct EncounterRow {
    id: Uuid,
    name: String,
    description: String,
    xp_points: i32,
    status: i16,
    kind: i16,
    latitude: f64,
    longitude: f64,
    should_be_approved: bool,
}

impl TryFrom<EncounterRow> for Encounter {
    type Error = ValidationError;

    fn try_from(row: EncounterRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: EncounterId::from_uuid(row.id),
            name: row.name,
            description: row.description,
            xp_points: row.xp_points,
            status: EncounterStatus::try_from(row.status)?,
            kind: EncounterKind::try_from(row.kind)?,
            latitude: row.latitude,
            longitude: row.longitude,
            should_be_approved: row.should_be_approved,
        })
    }
}

#[derive(Debug, FromRow)]
struct SocialRow {
    id: Uuid,
    encounter_id: Uuid,
    tourists_required_for_completion: i32,
    distance_threshold: f64,
    tourist_ids: Vec<i64>,
}

impl From<SocialRow> for SocialEncounter {
    fn from(row: SocialRow) -> Self {
        Self {
            id: SocialEncounterId::from_uuid(row.id),
            encounter_id: EncounterId::from_uuid(row.encounter_id),
            tourists_required_for_completion: row.tourists_required_for_completion,
            distance_threshold: row.distance_threshold,
            tourist_ids: row.tourist_ids,
        }
    }
}

#[derive(Debug, FromRow)]
struct HiddenLocationRow {
    id: Uuid,
    encounter_id: Uuid,
    image_url: String,
    image_latitude: f64,
    image_longitude: f64,
    distance_threshold: f64,
}

impl From<HiddenLocationRow> for HiddenLocationEncounter {
    fn from(row: HiddenLocationRow) -> Self {
        Self {
            id: HiddenLocationEncounterId::from_uuid(row.id),
            encounter_id: EncounterId::from_uuid(row.encounter_id),
            image_url: row.image_url,
            image_latitude: row.image_latitude,
            image_longitude: row.image_longitude,
            distance_threshold: row.distance_threshold,
        }
    }
}

/// Encounter store backed by a PostgreSQL pool
#[derive(Clone)]
pub struct PgEncounterStore {
    pool: PgPool,
}

impl PgEncounterStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl EncounterStore for PgEncounterStore {
    /// Insert under a fresh id; RETURNING hands back the persisted row.
    async fn create_encounter(&self, encounter: NewEncounter) -> Result<Encounter, StoreError> {
        let id = EncounterId::new();
        let row: EncounterRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO encounters
                (id, name, description, xp_points, status, kind, latitude, longitude, should_be_approved)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {ENCOUNTER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&encounter.name)
        .bind(&encounter.description)
        .bind(encounter.xp_points)
        .bind(encounter.status.as_i16())
        .bind(encounter.kind.as_i16())
        .bind(encounter.latitude)
        .bind(encounter.longitude)
        .bind(encounter.should_be_approved)
        .fetch_one(&self.pool)
        .await?;

        Ok(Encounter::try_from(row)?)
    }

    async fn create_social_encounter(&self, encounter: SocialEncounter) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO social_encounters
                (id, encounter_id, tourists_required_for_completion, distance_threshold, tourist_ids)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(encounter.id)
        .bind(encounter.encounter_id)
        .bind(encounter.tourists_required_for_completion)
        .bind(encounter.distance_threshold)
        .bind(&encounter.tourist_ids)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn create_hidden_location_encounter(
        &self,
        encounter: HiddenLocationEncounter,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO hidden_location_encounters
                (id, encounter_id, image_url, image_latitude, image_longitude, distance_threshold)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(encounter.id)
        .bind(encounter.encounter_id)
        .bind(&encounter.image_url)
        .bind(encounter.image_latitude)
        .bind(encounter.image_longitude)
        .bind(encounter.distance_threshold)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_encounters(&self) -> Result<Vec<Encounter>, StoreError> {
        let rows: Vec<EncounterRow> =
            sqlx::query_as(&format!("SELECT {ENCOUNTER_COLUMNS} FROM encounters"))
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter()
            .map(|row| Encounter::try_from(row).map_err(StoreError::from))
            .collect()
    }

    async fn list_social_encounters(&self) -> Result<Vec<SocialEncounter>, StoreError> {
        let rows: Vec<SocialRow> =
            sqlx::query_as(&format!("SELECT {SOCIAL_COLUMNS} FROM social_encounters"))
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(SocialEncounter::from).collect())
    }

    async fn list_hidden_location_encounters(
        &self,
    ) -> Result<Vec<HiddenLocationEncounter>, StoreError> {
        let rows: Vec<HiddenLocationRow> = sqlx::query_as(&format!(
            "SELECT {HIDDEN_LOCATION_COLUMNS} FROM hidden_location_encounters"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(HiddenLocationEncounter::from).collect())
    }

    async fn get_encounter(&self, id: EncounterId) -> Result<Option<Encounter>, StoreError> {
        let row: Option<EncounterRow> = sqlx::query_as(&format!(
            "SELECT {ENCOUNTER_COLUMNS} FROM encounters WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Encounter::try_from).transpose()?)
    }

    async fn social_encounter_for(
        &self,
        encounter_id: EncounterId,
    ) -> Result<Option<SocialEncounter>, StoreError> {
        let row: Option<SocialRow> = sqlx::query_as(&format!(
            "SELECT {SOCIAL_COLUMNS} FROM social_encounters WHERE encounter_id = $1 LIMIT 1"
        ))
        .bind(encounter_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(SocialEncounter::from))
    }

    async fn hidden_location_encounter_for(
        &self,
        encounter_id: EncounterId,
    ) -> Result<Option<HiddenLocationEncounter>, StoreError> {
        let row: Option<HiddenLocationRow> = sqlx::query_as(&format!(
            "SELECT {HIDDEN_LOCATION_COLUMNS} FROM hidden_location_encounters \
             WHERE encounter_id = $1 LIMIT 1"
        ))
        .bind(encounter_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(HiddenLocationEncounter::from))
    }

    async fn update_encounter(&self, encounter: &Encounter) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE encounters
            SET name = $2,
                description = $3,
                xp_points = $4,
                status = $5,
                kind = $6,
                latitude = $7,
                longitude = $8,
                should_be_approved = $9
            WHERE id = $1
            "#,
        )
        .bind(encounter.id)
        .bind(&encounter.name)
        .bind(&encounter.description)
        .bind(encounter.xp_points)
        .bind(encounter.status.as_i16())
        .bind(encounter.kind.as_i16())
        .bind(encounter.latitude)
        .bind(encounter.longitude)
        .bind(encounter.should_be_approved)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("encounter", encounter.id));
        }
        Ok(())
    }

    async fn update_social_encounter(&self, encounter: &SocialEncounter) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE social_encounters
            SET encounter_id = $2,
                tourists_required_for_completion = $3,
                distance_threshold = $4,
                tourist_ids = $5
            WHERE id = $1
            "#,
        )
        .bind(encounter.id)
        .bind(encounter.encounter_id)
        .bind(encounter.tourists_required_for_completion)
        .bind(encounter.distance_threshold)
        .bind(&encounter.tourist_ids)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("social encounter", encounter.id));
        }
        Ok(())
    }

    async fn update_hidden_location_encounter(
        &self,
        encounter: &HiddenLocationEncounter,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE hidden_location_encounters
            SET image_url = $2,
                image_latitude = $3,
                image_longitude = $4,
                distance_threshold = $5,
                encounter_id = $6
            WHERE id = $1
            "#,
        )
        .bind(encounter.id)
        .bind(&encounter.image_url)
        .bind(encounter.image_latitude)
        .bind(encounter.image_longitude)
        .bind(encounter.distance_threshold)
        .bind(encounter.encounter_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("hidden location encounter", encounter.id));
        }
        Ok(())
    }

    /// Not wrapped in a transaction: children are removed after the base
    /// row is already gone.
    async fn delete_encounter(&self, id: EncounterId) -> Result<(), StoreError> {
        let deleted = sqlx::query("DELETE FROM encounters WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if deleted.rows_affected() == 0 {
            return Err(StoreError::not_found("encounter", id));
        }

        let hidden = sqlx::query("DELETE FROM hidden_location_encounters WHERE encounter_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let social = sqlx::query("DELETE FROM social_encounters WHERE encounter_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        tracing::debug!(
            encounter_id = %id,
            hidden = hidden.rows_affected(),
            social = social.rows_affected(),
            "cascaded encounter delete"
        );
        Ok(())
    }

    async fn delete_social_encounter(&self, id: SocialEncounterId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM social_encounters WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("social encounter", id));
        }
        Ok(())
    }

    async fn delete_hidden_location_encounter(
        &self,
        id: HiddenLocationEncounterId,
    ) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM hidden_location_encounters WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("hidden location encounter", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, migrations};
    use crate::models::{NewHiddenLocationEncounter, NewSocialEncounter};

    // Integration tests - run with DATABASE_URL set
    // cargo test -p encounters-server -- --ignored

    async fn store() -> PgEncounterStore {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = create_pool(&url).await.expect("pool creation failed");
        migrations::run(&pool).await.expect("migrations failed");
        PgEncounterStore::new(pool)
    }

    fn sample() -> NewEncounter {
        NewEncounter {
            name: "Petrovaradin clock".into(),
            description: "The drunk clock".into(),
            xp_points: 75,
            status: EncounterStatus::Active,
            kind: EncounterKind::Location,
            latitude: 45.2524,
            longitude: 19.8617,
            should_be_approved: false,
        }
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn create_then_fetch_round_trips_every_field() {
        let store = store().await;
        let created = store.create_encounter(sample()).await.unwrap();

        let fetched = store.get_encounter(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, sample().with_id(created.id));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn update_missing_row_is_not_found() {
        let store = store().await;
        let ghost = sample().with_id(EncounterId::new());

        let err = store.update_encounter(&ghost).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
        assert!(store.get_encounter(ghost.id).await.unwrap().is_none());
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn delete_cascades_to_children() {
        let store = store().await;
        let parent = store.create_encounter(sample()).await.unwrap();

        let social = NewSocialEncounter {
            encounter_id: parent.id,
            tourists_required_for_completion: 2,
            distance_threshold: 10.0,
            tourist_ids: vec![1, 2, 3],
        }
        .with_id(SocialEncounterId::new());
        let hidden = NewHiddenLocationEncounter {
            encounter_id: parent.id,
            image_url: "https://img.example/clock.jpg".into(),
            ..Default::default()
        }
        .with_id(HiddenLocationEncounterId::new());

        store.create_social_encounter(social).await.unwrap();
        store.create_hidden_location_encounter(hidden).await.unwrap();
        assert!(store.social_encounter_for(parent.id).await.unwrap().is_some());

        store.delete_encounter(parent.id).await.unwrap();

        assert!(store.get_encounter(parent.id).await.unwrap().is_none());
        assert!(store.social_encounter_for(parent.id).await.unwrap().is_none());
        assert!(store.hidden_location_encounter_for(parent.id).await.unwrap().is_none());
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn delete_missing_encounter_is_not_found() {
        let store = store().await;
        let err = store.delete_encounter(EncounterId::new()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }
}
