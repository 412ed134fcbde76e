use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use pilot_core::model::PrinciplesInput;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/principles", get(get_principles).post(save_principles))
}

#[derive(Debug, Deserialize)]
pub struct SavePrinciplesRequest {
    #[serde(default)]
    pub principles: Option<PrinciplesInput>,
}

async fn get_principles(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let principles = state.service.get_principles().await?;
    Ok(Json(json!({ "principles": principles })))
}

async fn save_principles(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SavePrinciplesRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(req) = payload?;
    let input = req
        .principles
        .unwrap_or(PrinciplesInput::Other(Value::Null));
    let principles = state.service.save_principles(&input).await?;
    Ok(Json(json!({ "principles": principles })))
}
