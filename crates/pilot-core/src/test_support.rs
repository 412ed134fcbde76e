use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::config::LlmConfig;

type Seen = Arc<Mutex<Vec<(Option<String>, Value)>>>;

#[derive(Clone)]
struct StubState {
    status: StatusCode,
    content: String,
    seen: Seen,
}

/// Local stand-in for the chat-completions endpoint.
pub struct CompletionStub {
    pub base_url: String,
    seen: Seen,
}

impl CompletionStub {
    pub fn last_request(&self) -> Option<Value> {
        self.seen.lock().unwrap().last().map(|(_, body)| body.clone())
    }

    pub fn last_auth(&self) -> Option<String> {
        self.seen.lock().unwrap().last().and_then(|(auth, _)| auth.clone())
    }

    /// Every request body received so far, oldest first.
    pub fn requests(&self) -> Vec<Value> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .map(|(_, body)| body.clone())
            .collect()
    }

    pub fn request_count(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

async fn handle(
    State(state): State<StubState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.seen.lock().unwrap().push((auth, body));

    if state.status.is_success() {
        (
            state.status,
            Json(json!({
                "choices": [{"message": {"role": "assistant", "content": state.content}}],
                "usage": {"prompt_tokens": 5, "completion_tokens": 7, "total_tokens": 12}
            })),
        )
    } else {
        (state.status, Json(json!({"error": {"message": "stub failure"}})))
    }
}

pub async fn spawn_completion_stub(status: StatusCode, content: &str) -> CompletionStub {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let state = StubState {
        status,
        content: content.to_string(),
        seen: seen.clone(),
    };
    let app = Router::new()
        .route("/v1/chat/completions", post(handle))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    CompletionStub {
        base_url: format!("http://{addr}"),
        seen,
    }
}

pub fn stub_config(base_url: &str) -> LlmConfig {
    LlmConfig {
        api_key: Some("test-key".into()),
        base_url: Some(base_url.to_string()),
        ..Default::default()
    }
}
