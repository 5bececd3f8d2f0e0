//! Base encounter endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::value::RawValue;
use serde_json::Value;

use crate::http::error::ApiError;
use crate::http::extractors::{JsonBody, ValidId};
use crate::http::render::{public_list, public_value};
use crate::http::server::AppState;
use crate::models::{EncounterId, EncounterPatch, NewEncounter};

/// POST /encounters/create
#[tracing::instrument(skip_all)]
async fn create(
    State(state): State<Arc<AppState>>,
    JsonBody(new): JsonBody<NewEncounter>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let created = state.service.create(new).await?;
    tracing::info!(encounter_id = %created.id, "Created encounter");

    Ok((StatusCode::CREATED, Json(public_value(&created)?)))
}

/// GET /encounters
#[tracing::instrument(skip_all)]
async fn get_all(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Box<RawValue>>>, ApiError> {
    let encounters = state.service.get_all_encounters().await?;
    tracing::debug!(count = encounters.len(), "Retrieved encounters");

    Ok(Json(public_list(&encounters)))
}

/// GET /encounters/getEncounterById/{encounterId}
#[tracing::instrument(skip_all, fields(encounter_id = %id))]
async fn get_by_id(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId<EncounterId>,
) -> Result<Json<Value>, ApiError> {
    let encounter = state
        .service
        .get_encounter(id)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "encounter",
            id: id.to_string(),
        })?;

    Ok(Json(public_value(&encounter)?))
}

/// PUT /encounters/update
#[tracing::instrument(skip_all)]
async fn update(
    State(state): State<Arc<AppState>>,
    JsonBody(patch): JsonBody<EncounterPatch>,
) -> Result<Json<Value>, ApiError> {
    let encounter = patch.into_encounter()?;
    state.service.update(&encounter).await?;
    tracing::info!(encounter_id = %encounter.id, "Updated encounter");

    Ok(Json(public_value(&encounter)?))
}

/// DELETE /encounters/deleteEncounter/{baseEncounterId}
///
/// Also removes the social and hidden-location encounters attached to it.
#[tracing::instrument(skip_all, fields(encounter_id = %id))]
async fn delete_encounter(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId<EncounterId>,
) -> Result<StatusCode, ApiError> {
    state.service.delete_encounter(id).await?;
    tracing::info!("Deleted encounter");

    Ok(StatusCode::NO_CONTENT)
}

/// Base encounter routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/encounters", get(get_all))
        .route("/encounters/create", post(create))
        .route("/encounters/update", put(update))
        .route("/encounters/getEncounterById/{encounterId}", get(get_by_id))
        .route(
            "/encounters/deleteEncounter/{baseEncounterId}",
            delete(delete_encounter),
        )
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::{json, Value};

    use crate::http::test_support::TestApp;

    fn payload() -> Value {
        json!({
            "name": "Danube quay",
            "description": "Find the old ferry dock",
            "xpPoints": 50,
            "status": "Active",
            "type": "Location",
            "latitude": 45.2461,
            "longitude": 19.8517,
            "shouldBeApproved": true
        })
    }

    #[tokio::test]
    async fn create_returns_201_with_public_id() {
        let app = TestApp::new();
        let (status, body) = app
            .send(Method::POST, "/encounters/create", Some(payload()))
            .await;

        assert_eq!(status, StatusCode::CREATED);
        assert!(body["id"].as_str().is_some());
        assert!(body.get("_id").is_none());
        assert_eq!(body["xpPoints"], 50);
    }

    #[tokio::test]
    async fn every_create_gets_an_unseen_id() {
        let app = TestApp::new();
        let (_, first) = app.send(Method::POST, "/encounters/create", Some(payload())).await;
        let (_, second) = app.send(Method::POST, "/encounters/create", Some(payload())).await;
        assert_ne!(first["id"], second["id"]);
    }

    #[tokio::test]
    async fn malformed_body_is_400() {
        let app = TestApp::new();
        let (status, _) = app
            .send_raw(Method::POST, "/encounters/create", "{\"name\": ")
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = app
            .send(Method::POST, "/encounters/create", Some(json!({ "xpPoints": "lots" })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn list_never_exposes_storage_key() {
        let app = TestApp::new();
        app.send(Method::POST, "/encounters/create", Some(payload())).await;
        app.send(Method::POST, "/encounters/create", Some(payload())).await;

        let (status, body) = app.send(Method::GET, "/encounters", None).await;
        assert_eq!(status, StatusCode::OK);

        let items = body.as_array().unwrap();
        assert_eq!(items.len(), 2);
        for item in items {
            assert!(item.get("_id").is_none());
            assert!(item["id"].is_string());
        }
    }

    #[tokio::test]
    async fn empty_list_is_empty_array() {
        let app = TestApp::new();
        let (status, body) = app.send(Method::GET, "/encounters", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn round_trip_preserves_every_field() {
        let app = TestApp::new();
        let (_, created) = app.send(Method::POST, "/encounters/create", Some(payload())).await;

        let (_, list) = app.send(Method::GET, "/encounters", None).await;
        let mut fetched = list[0].clone();
        assert_eq!(fetched["id"], created["id"]);

        fetched.as_object_mut().unwrap().remove("id");
        assert_eq!(fetched, payload());
    }

    #[tokio::test]
    async fn update_rewrites_whole_whitelist() {
        let app = TestApp::new();
        let (_, created) = app.send(Method::POST, "/encounters/create", Some(payload())).await;
        let id = created["id"].as_str().unwrap().to_owned();

        let (status, body) = app
            .send(
                Method::PUT,
                "/encounters/update",
                Some(json!({ "id": id, "name": "Renamed quay", "xpPoints": 80 })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Renamed quay");

        let (_, fetched) = app
            .send(Method::GET, &format!("/encounters/getEncounterById/{id}"), None)
            .await;
        assert_eq!(fetched["name"], "Renamed quay");
        assert_eq!(fetched["xpPoints"], 80);
        // Fields left out of the update are reset, not merged
        assert_eq!(fetched["description"], "");
        assert_eq!(fetched["status"], "Draft");
        assert_eq!(fetched["type"], "Misc");
        assert_eq!(fetched["latitude"], 0.0);
        assert_eq!(fetched["shouldBeApproved"], false);
    }

    #[tokio::test]
    async fn update_unknown_id_fails_and_creates_nothing() {
        let app = TestApp::new();
        let ghost = uuid::Uuid::new_v4().to_string();

        let (status, _) = app
            .send(Method::PUT, "/encounters/update", Some(json!({ "id": ghost, "name": "x" })))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, list) = app.send(Method::GET, "/encounters", None).await;
        assert_eq!(list, json!([]));
    }

    #[tokio::test]
    async fn update_with_bad_or_missing_id_is_400() {
        let app = TestApp::new();

        let (status, _) = app
            .send(Method::PUT, "/encounters/update", Some(json!({ "Id": "zzz" })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = app
            .send(Method::PUT, "/encounters/update", Some(json!({ "name": "no id" })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn delete_cascades_to_children() {
        let app = TestApp::new();
        let (_, created) = app.send(Method::POST, "/encounters/create", Some(payload())).await;
        let id = created["id"].as_str().unwrap().to_owned();

        app.send(
            Method::POST,
            "/encounters/createSocialEncounter",
            Some(json!({ "encounterId": id, "touristsRequiredForCompletion": 2 })),
        )
        .await;
        app.send(
            Method::POST,
            "/encounters/createHiddenLocationEncounter",
            Some(json!({ "encounterId": id, "imageURL": "https://img.example/a.png" })),
        )
        .await;

        let (status, body) = app
            .send_raw(Method::DELETE, &format!("/encounters/deleteEncounter/{id}"), "")
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_empty());

        let (_, encounters) = app.send(Method::GET, "/encounters", None).await;
        let (_, social) = app.send(Method::GET, "/socialEncounters", None).await;
        let (_, hidden) = app.send(Method::GET, "/hiddenLocationEncounters", None).await;
        assert_eq!(encounters, json!([]));
        assert_eq!(social, json!([]));
        assert_eq!(hidden, json!([]));
    }

    #[tokio::test]
    async fn delete_without_children_succeeds() {
        let app = TestApp::new();
        let (_, created) = app.send(Method::POST, "/encounters/create", Some(payload())).await;
        let id = created["id"].as_str().unwrap();

        let (status, _) = app
            .send_raw(Method::DELETE, &format!("/encounters/deleteEncounter/{id}"), "")
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn delete_unknown_encounter_is_404_and_keeps_orphans() {
        let app = TestApp::new();
        let ghost = uuid::Uuid::new_v4().to_string();
        app.send(
            Method::POST,
            "/encounters/createSocialEncounter",
            Some(json!({ "encounterId": ghost })),
        )
        .await;

        let (status, _) = app
            .send_raw(Method::DELETE, &format!("/encounters/deleteEncounter/{ghost}"), "")
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, social) = app.send(Method::GET, "/socialEncounters", None).await;
        assert_eq!(social.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn malformed_path_id_is_400() {
        let app = TestApp::new();
        let (status, _) = app
            .send_raw(Method::DELETE, "/encounters/deleteEncounter/12", "")
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = app
            .send(Method::GET, "/encounters/getEncounterById/abc", None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn get_by_id_missing_is_404() {
        let app = TestApp::new();
        let ghost = uuid::Uuid::new_v4();
        let (status, body) = app
            .send(Method::GET, &format!("/encounters/getEncounterById/{ghost}"), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
    }
}
