//! Hidden-location encounter endpoints

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
use crate::models::{
    EncounterId, HiddenLocationEncounterId, HiddenLocationEncounterPatch,
    NewHiddenLocationEncounter,
};

/// Lookup response; `null` when the base encounter has no hidden-location part
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HiddenLocationEncounterIdResponse {
    pub hidden_location_encounter_id: Option<HiddenLocationEncounterId>,
}

/// POST /encounters/createHiddenLocationEncounter
#[tracing::instrument(skip_all)]
async fn create(
    State(state): State<Arc<AppState>>,
    JsonBody(new): JsonBody<NewHiddenLocationEncounter>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let created = state.service.create_hidden_location_encounter(new).await?;
    tracing::info!(
        hidden_location_encounter_id = %created.id,
        encounter_id = %created.encounter_id,
        "Created hidden location encounter"
    );

    Ok((StatusCode::CREATED, Json(public_value(&created)?)))
}

/// GET /hiddenLocationEncounters
#[tracing::instrument(skip_all)]
async fn get_all(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Box<RawValue>>>, ApiError> {
    let encounters = state.service.get_all_hidden_location_encounters().await?;
    tracing::debug!(count = encounters.len(), "Retrieved hidden location encounters");

    Ok(Json(public_list(&encounters)))
}

/// GET /encounters/getHiddenLocationEncounter/{encounterId}
#[tracing::instrument(skip_all, fields(encounter_id = %id))]
async fn get_for_encounter(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId<EncounterId>,
) -> Result<Json<Value>, ApiError> {
    let encounter = state
        .service
        .hidden_location_encounter_for(id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "hidden location encounter for encounter",
            id: id.to_string(),
        })?;

    Ok(Json(public_value(&encounter)?))
}

/// GET /encounters/getHiddenLocationEncounterId/{baseEncounterId}
#[tracing::instrument(skip_all, fields(encounter_id = %id))]
async fn get_id_for_encounter(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId<EncounterId>,
) -> Result<Json<HiddenLocationEncounterIdResponse>, ApiError> {
    let hidden_location_encounter_id = state.service.hidden_location_encounter_id(id).await?;
    Ok(Json(HiddenLocationEncounterIdResponse {
        hidden_location_encounter_id,
    }))
}

/// PUT /encounters/updateHiddenLocationEncounter
#[tracing::instrument(skip_all)]
async fn update(
    State(state): State<Arc<AppState>>,
    JsonBody(patch): JsonBody<HiddenLocationEncounterPatch>,
) -> Result<Json<Value>, ApiError> {
    let encounter = patch.into_hidden_location_encounter()?;
    state
        .service
        .update_hidden_location_encounter(&encounter)
        .await?;
    tracing::info!(hidden_location_encounter_id = %encounter.id, "Updated hidden location encounter");

    Ok(Json(public_value(&encounter)?))
}

/// DELETE /encounters/deleteHiddenLocationEncounter/{hiddenLocationEncounterId}
#[tracing::instrument(skip_all, fields(hidden_location_encounter_id = %id))]
async fn delete_hidden_location(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId<HiddenLocationEncounterId>,
) -> Result<StatusCode, ApiError> {
    state.service.delete_hidden_location_encounter(id).await?;
    tracing::info!("Deleted hidden location encounter");

    Ok(StatusCode::NO_CONTENT)
}

/// Hidden-location encounter routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/hiddenLocationEncounters", get(get_all))
        .route("/encounters/createHiddenLocationEncounter", post(create))
        .route("/encounters/updateHiddenLocationEncounter", put(update))
        .route(
            "/encounters/getHiddenLocationEncounter/{encounterId}",
            get(get_for_encounter),
        )
        .route(
            "/encounters/getHiddenLocationEncounterId/{baseEncounterId}",
            get(get_id_for_encounter),
        )
        .route(
            "/encounters/deleteHiddenLocationEncounter/{hiddenLocationEncounterId}",
            delete(delete_hidden_location),
        )
}
