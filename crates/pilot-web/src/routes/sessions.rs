use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post, put};
use axum::Router;
use pilot_core::service::SendOutcome;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/sessions", get(list_sessions).post(create_session))
        .route("/api/sessions/{id}", get(get_session))
        .route("/api/sessions/{id}/messages", post(send_message))
        .route("/api/sessions/{id}/archive", put(archive_session))
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    #[serde(default)]
    pub content: Option<String>,
}

async fn list_sessions(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let sessions = state.service.list_sessions().await?;
    Ok(Json(json!({ "sessions": sessions })))
}

async fn create_session(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let session = state.service.create_session().await?;
    Ok((StatusCode::CREATED, Json(json!({ "session": session }))))
}

async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let session = state.service.get_session(&id).await?;
    Ok(Json(json!({ "session": session })))
}

async fn send_message(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<Json<SendOutcome>, ApiError> {
    let Json(req) = payload?;
    let content = req.content.unwrap_or_default();
    let outcome = state.service.send_message(&id, &content).await?;
    Ok(Json(outcome))
}

/// Only a JSON `true` archives; any other value, a missing field or an
/// empty body restores the session.
async fn archive_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let archived = if body.iter().all(u8::is_ascii_whitespace) {
        false
    } else {
        let body: Value = serde_json::from_slice(&body)
            .map_err(|e| ApiError::bad_request(format!("Invalid JSON body: {e}")))?;
        body.get("archived") == Some(&Value::Bool(true))
    };
    let session = state.service.set_archived(&id, archived).await?;
    Ok(Json(json!({ "session": session })))
}
