use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use pilot_core::service::{FolderInput, PromptInput};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/folders", get(list_folders).post(save_folder))
        .route("/api/folders/{id}/prompts", post(add_prompt))
}

async fn list_folders(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let folders = state.service.list_folders().await?;
    Ok(Json(json!({ "folders": folders })))
}

/// 201 when a folder was created, 200 when an existing one was updated.
async fn save_folder(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<FolderInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(input) = payload?;
    let saved = state.service.save_folder(&input).await?;
    let status = if saved.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(json!({ "folder": saved.folder }))))
}

async fn add_prompt(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<PromptInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(input) = payload?;
    let prompt = state.service.add_prompt(&id, &input).await?;
    Ok((StatusCode::CREATED, Json(json!({ "prompt": prompt }))))
}
