pub mod drafts;
pub mod folders;
pub mod principles;
pub mod sessions;

use std::path::Path;
use std::sync::Arc;

use axum::extract::State;
use axum::response::Json;
use axum::routing::{any, get};
use axum::Router;
use tower_http::services::ServeDir;

use crate::error::ApiError;
use crate::AppState;

/// JSON API under `/api`, `/health`, and the static front end for every
/// other path.
pub fn router(public_dir: &Path) -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .merge(sessions::routes())
        .merge(folders::routes())
        .merge(principles::routes())
        .merge(drafts::routes())
        .route("/api", any(api_not_found))
        .route("/api/{*path}", any(api_not_found))
        .fallback_service(ServeDir::new(public_dir))
}

async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "dataDir": state.service.store().location(),
        "model": state.config.llm.model,
    }))
}

async fn api_not_found() -> ApiError {
    ApiError::not_found("Not found")
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use axum::Router;
    use http_body_util::BodyExt;
    use pilot_core::config::PilotConfig;
    use pilot_core::llm::LlmService;
    use pilot_core::store::{MemoryStore, Store};
    use pilot_core::PilotService;
    use serde_json::Value;

    pub use pilot_core::test_support::spawn_completion_stub;

    use crate::AppState;

    /// State over an in-memory store. Completion calls go to `base_url`
    /// when given, otherwise they fail for lack of a key.
    pub fn test_app_state(base_url: Option<&str>) -> Arc<AppState> {
        let mut config = PilotConfig::default_config();
        config.llm.env_var = Some("PILOT_WEB_TEST_KEY_NEVER_SET".into());
        if let Some(url) = base_url {
            config.llm.base_url = Some(url.to_string());
            config.llm.api_key = Some("test-key".into());
        }
        let service = PilotService::new(
            Store::Memory(MemoryStore::new()),
            LlmService::from_config(&config.llm),
        );
        Arc::new(AppState { service, config })
    }

    pub fn test_router(state: Arc<AppState>) -> Router {
        super::router(std::path::Path::new("public")).with_state(state)
    }

    pub async fn body_json(body: Body) -> Value {
        let bytes = body.collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    pub fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health() {
        let app = test_router(test_app_state(None));
        let resp = app.oneshot(get_request("/health")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body_json(resp.into_body()).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["dataDir"], ":memory:");
    }

    #[tokio::test]
    async fn test_unknown_api_path_is_json_404() {
        let app = test_router(test_app_state(None));
        let resp = app.oneshot(get_request("/api/nothing/here")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body = body_json(resp.into_body()).await;
        assert_eq!(body["error"], "Not found");
    }

    #[tokio::test]
    async fn test_static_files_served_from_public_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>Prompt Pilot</h1>").unwrap();
        std::fs::write(dir.path().join("app.js"), "console.log(1);").unwrap();

        let app = router(dir.path()).with_state(test_app_state(None));

        let resp = app.clone().oneshot(get_request("/")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = http_body_util::BodyExt::collect(resp.into_body())
            .await
            .unwrap()
            .to_bytes();
        assert_eq!(&bytes[..], b"<h1>Prompt Pilot</h1>");

        let resp = app.clone().oneshot(get_request("/app.js")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = app.oneshot(get_request("/missing.css")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let root = tempfile::tempdir().unwrap();
        let public = root.path().join("public");
        std::fs::create_dir_all(&public).unwrap();
        std::fs::write(root.path().join("secret.txt"), "nope").unwrap();

        let app = router(&public).with_state(test_app_state(None));
        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/../secret.txt")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_ne!(resp.status(), StatusCode::OK);
    }
}
