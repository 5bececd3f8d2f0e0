//! Social encounter endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Serialize;
use serde_json::value::RawValue;
use serde_json::Value;

use crate::http::error::ApiError;
use crate::http::extractors::{JsonBody, ValidId};
use crate::http::render::{public_list, public_value};
use crate::http::server::AppState;
use crate::models::{EncounterId, NewSocialEncounter, SocialEncounterId, SocialEncounterPatch};

/// Lookup response; `null` when the base encounter has no social part
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialEncounterIdResponse {
    pub social_encounter_id: Option<SocialEncounterId>,
}

/// POST /encounters/createSocialEncounter
#[tracing::instrument(skip_all)]
async fn create(
    State(state): State<Arc<AppState>>,
    JsonBody(new): JsonBody<NewSocialEncounter>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let created = state.service.create_social_encounter(new).await?;
    tracing::info!(
        social_encounter_id = %created.id,
        encounter_id = %created.encounter_id,
        "Created social encounter"
    );

    Ok((StatusCode::CREATED, Json(public_value(&created)?)))
}

/// GET /socialEncounters
#[tracing::instrument(skip_all)]
async fn get_all(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Box<RawValue>>>, ApiError> {
    let encounters = state.service.get_all_social_encounters().await?;
    tracing::debug!(count = encounters.len(), "Retrieved social encounters");

    Ok(Json(public_list(&encounters)))
}

/// GET /encounters/getSocialEncounterId/{baseEncounterId}
#[tracing::instrument(skip_all, fields(encounter_id = %id))]
async fn get_id_for_encounter(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId<EncounterId>,
) -> Result<Json<SocialEncounterIdResponse>, ApiError> {
    let social_encounter_id = state.service.social_encounter_id(id).await?;
    Ok(Json(SocialEncounterIdResponse { social_encounter_id }))
}

/// PUT /encounters/updateSocialEncounter
#[tracing::instrument(skip_all)]
async fn update(
    State(state): State<Arc<AppState>>,
    JsonBody(patch): JsonBody<SocialEncounterPatch>,
) -> Result<Json<Value>, ApiError> {
    let encounter = patch.into_social_encounter()?;
    state.service.update_social_encounter(&encounter).await?;
    tracing::info!(social_encounter_id = %encounter.id, "Updated social encounter");

    Ok(Json(public_value(&encounter)?))
}

/// DELETE /encounters/deleteSocialEncounter/{socialEncounterId}
#[tracing::instrument(skip_all, fields(social_encounter_id = %id))]
async fn delete_social(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId<SocialEncounterId>,
) -> Result<StatusCode, ApiError> {
    state.service.delete_social_encounter(id).await?;
    tracing::info!("Deleted social encounter");

    Ok(StatusCode::NO_CONTENT)
}

/// Social encounter routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/socialEncounters", get(get_all))
        .route("/encounters/createSocialEncounter", post(create))
        .route("/encounters/updateSocialEncounter", put(update))
        .route(
            "/encounters/getSocialEncounterId/{baseEncounterId}",
            get(get_id_for_encounter),
        )
        .route(
            "/encounters/deleteSocialEncounter/{socialEncounterId}",
            delete(delete_social),
        )
}
