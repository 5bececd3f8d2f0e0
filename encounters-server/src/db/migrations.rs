//! Database migrations for encounter tables

use sqlx::PgPool;

/// Run all encounter migrations. Safe to run on every startup.
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running encounter migrations...");

    // Base encounters
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS encounters (
            id UUID PRIMARY KEY,
            name TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL DEFAULT '',
            xp_points INTEGER NOT NULL DEFAULT 0,
            status SMALLINT NOT NULL DEFAULT 0,
            kind SMALLINT NOT NULL DEFAULT 2,
            latitude DOUBLE PRECISION NOT NULL DEFAULT 0,
            longitude DOUBLE PRECISION NOT NULL DEFAULT 0,
            should_be_approved BOOLEAN NOT NULL DEFAULT FALSE
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Social encounters; encounter_id carries no foreign key
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS social_encounters (
            id UUID PRIMARY KEY,
            encounter_id UUID NOT NULL,
            tourists_required_for_completion INTEGER NOT NULL DEFAULT 0,
            distance_threshold DOUBLE PRECISION NOT NULL DEFAULT 0,
            tourist_ids BIGINT[] NOT NULL DEFAULT '{}'
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Hidden-location encounters
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS hidden_location_encounters (
            id UUID PRIMARY KEY,
            encounter_id UUID NOT NULL,
            image_url TEXT NOT NULL DEFAULT '',
            image_latitude DOUBLE PRECISION NOT NULL DEFAULT 0,
            image_longitude DOUBLE PRECISION NOT NULL DEFAULT 0,
            distance_threshold DOUBLE PRECISION NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Cascading deletes and parent lookups filter on encounter_id
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_social_encounters_encounter ON social_encounters(encounter_id)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_hidden_location_encounters_encounter ON hidden_location_encounters(encounter_id)",
    )
    .execute(pool)
    .await?;

    tracing::info!("Encounter migrations complete");
    Ok(())
}
