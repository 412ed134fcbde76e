use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/drafts", get(list_drafts).post(add_draft))
        .route("/api/optimize", post(optimize))
}

#[derive(Debug, Deserialize)]
pub struct TextRequest {
    #[serde(default)]
    pub text: Option<String>,
}

async fn list_drafts(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let drafts = state.service.list_drafts().await?;
    Ok(Json(json!({ "drafts": drafts })))
}

async fn add_draft(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TextRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(req) = payload?;
    let draft = state
        .service
        .add_draft(req.text.as_deref().unwrap_or_default())
        .await?;
    Ok((StatusCode::CREATED, Json(json!({ "draft": draft }))))
}

async fn optimize(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TextRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(req) = payload?;
    let completion = state
        .service
        .optimize(req.text.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(json!({
        "raw": completion.text,
        "usage": completion.usage,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::testing::*;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_add_and_list_drafts() {
        let app = test_router(test_app_state(None));
        let resp = app
            .clone()
            .oneshot(json_request("POST", "/api/drafts", json!({"text": " idea "})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body = body_json(resp.into_body()).await;
        assert_eq!(body["draft"]["text"], "idea");
        assert!(body["draft"]["id"].is_string());
        assert!(body["draft"]["createdAt"].is_string());

        let resp = app.oneshot(get_request("/api/drafts")).await.unwrap();
        let body = body_json(resp.into_body()).await;
        assert_eq!(body["drafts"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_blank_draft() {
        let app = test_router(test_app_state(None));
        let resp = app
            .oneshot(json_request("POST", "/api/drafts", json!({})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp.into_body()).await;
        assert_eq!(body["error"], "Draft text is required");
    }

    #[tokio::test]
    async fn test_optimize() {
        let stub = spawn_completion_stub(StatusCode::OK, "Better prompt").await;
        let app = test_router(test_app_state(Some(&stub.base_url)));

        let resp = app
            .oneshot(json_request("POST", "/api/optimize", json!({"text": "make it good"})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp.into_body()).await;
        assert_eq!(body["raw"], "Better prompt");
        assert_eq!(body["usage"]["total_tokens"], 12);

        let requests = stub.requests();
        assert_eq!(requests[0]["messages"].as_array().unwrap().len(), 2);
        assert_eq!(requests[0]["messages"][1]["content"], "make it good");
    }

    #[tokio::test]
    async fn test_optimize_requires_text() {
        let app = test_router(test_app_state(None));
        let resp = app
            .oneshot(json_request("POST", "/api/optimize", json!({"text": "  "})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp.into_body()).await;
        assert_eq!(body["error"], "Text is required");
    }
}
