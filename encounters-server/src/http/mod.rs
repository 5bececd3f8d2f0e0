//! HTTP server layer
//!
//! Axum server with:
//! - CORS (localhost only by default)
//! - Request tracing
//! - Graceful shutdown
//! - JSON error responses
//! - `_id` to `id` renaming on every response body

pub mod server;
pub mod error;
pub mod extractors;
pub mod render;
pub mod routes;

pub use server::{build_router, run_server, AppState, ServerConfig, ServerError};
pub use error::ApiError;

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request, StatusCode};
    use axum::Router;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::{build_router, AppState, ServerConfig};
    use crate::db::MemoryEncounterStore;
    use crate::service::EncounterService;

    /// Full router over a fresh memory store
    pub struct TestApp {
        router: Router,
    }

    impl TestApp {
        pub fn new() -> Self {
            Self::with_config(&ServerConfig::default())
        }

        pub fn with_config(config: &ServerConfig) -> Self {
            let state = AppState {
                service: EncounterService::new(Arc::new(MemoryEncounterStore::new())),
                store_name: "memory",
            };
            Self {
                router: build_router(state, config),
            }
        }

        /// Send a JSON request and parse the JSON response (Null when empty).
        pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
            let body = body.map(|v| v.to_string()).unwrap_or_default();
            let (status, text) = self.send_raw(method, uri, &body).await;
            let value = if text.is_empty() {
                Value::Null
            } else {
                serde_json::from_str(&text).expect("response was not JSON")
            };
            (status, value)
        }

        pub async fn send_raw(&self, method: Method, uri: &str, body: &str) -> (StatusCode, String) {
            let request = Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_owned()))
                .expect("valid request");

            let response = self
                .router
                .clone()
                .oneshot(request)
                .await
                .expect("router is infallible");

            let status = response.status();
            let bytes = to_bytes(response.into_body(), usize::MAX)
                .await
                .expect("readable body");
            (status, String::from_utf8_lossy(&bytes).into_owned())
        }
    }

    #[tokio::test]
    async fn unmatched_paths_fall_back_to_static_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>encounters</h1>").unwrap();

        let config = ServerConfig {
            static_dir: dir.path().to_path_buf(),
            ..ServerConfig::default()
        };
        let app = TestApp::with_config(&config);

        let (status, body) = app.send_raw(Method::GET, "/index.html", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "<h1>encounters</h1>");

        let (status, _) = app.send_raw(Method::GET, "/missing.css", "").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
