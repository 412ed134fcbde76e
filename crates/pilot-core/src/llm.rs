use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{LlmConfig, DEFAULT_API_KEY_ENV};
use crate::error::{PilotError, Result};
use crate::model::principles::numbered;
use crate::model::Message;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const EMPTY_COMPLETION: &str = "No response from OpenAI.";

const SYSTEM_PREAMBLE: &str = "You are a prompt engineering assistant that helps users refine and optimize their prompts.
Follow these guidelines:
1. Clarify user identity, intent, and desired outcome
2. Set the tone, format, and constraints explicitly
3. Surface necessary contextual signals
4. Ask for step-by-step reasoning when needed
5. Include examples and validation cues
6. Request verification or ask clarifying questions";

const SYSTEM_CLOSING: &str = "If the user's prompt is missing critical information, ask clarifying questions. Otherwise, provide an optimized, production-ready version of their prompt.";

/// System instruction: the fixed checklist, the user's numbered principles
/// (when any), then the closing instruction.
pub fn build_system_prompt(principles: &[String]) -> String {
    let mut prompt = SYSTEM_PREAMBLE.to_string();
    if !principles.is_empty() {
        prompt.push_str("\n\nPrinciples to follow:\n");
        prompt.push_str(&numbered(principles));
    }
    prompt.push_str("\n\n");
    prompt.push_str(SYSTEM_CLOSING);
    prompt
}

/// One entry of the chat-completions `messages` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

impl From<&Message> for ChatMessage {
    fn from(message: &Message) -> Self {
        Self::new(message.role.as_str(), message.content.clone())
    }
}

/// System instruction followed by the last `turns` messages, oldest first.
pub fn build_messages(system: &str, history: &[Message], turns: usize) -> Vec<ChatMessage> {
    let start = history.len().saturating_sub(turns);
    std::iter::once(ChatMessage::new("system", system))
        .chain(history[start..].iter().map(ChatMessage::from))
        .collect()
}

/// Assistant text plus the upstream `usage` block, if any.
#[derive(Debug, Clone, Serialize)]
pub struct Completion {
    pub text: String,
    pub usage: Option<Value>,
}

/// Chat-completions client. The API key is resolved per request, so a
/// missing key only fails the calls that need it.
pub struct LlmService {
    config: LlmConfig,
    client: reqwest::Client,
}

impl std::fmt::Debug for LlmService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmService")
            .field("model", &self.config.model)
            .field("base_url", &self.base_url())
            .finish()
    }
}

impl LlmService {
    pub fn from_config(config: &LlmConfig) -> Self {
        Self {
            config: config.clone(),
            client: reqwest::Client::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn base_url(&self) -> &str {
        self.config.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Optimize the newest user message in a conversation. Only the last
    /// `history_turns` messages are sent.
    pub async fn optimize_conversation(
        &self,
        history: &[Message],
        principles: &[String],
    ) -> Result<Completion> {
        let system = build_system_prompt(principles);
        let messages = build_messages(&system, history, self.config.history_turns);
        self.complete(&messages).await
    }

    /// One-shot optimization of a standalone draft.
    pub async fn optimize_text(&self, text: &str, principles: &[String]) -> Result<Completion> {
        let messages = vec![
            ChatMessage::new("system", build_system_prompt(principles)),
            ChatMessage::new("user", text),
        ];
        self.complete(&messages).await
    }

    /// OpenAI: POST {base_url}/v1/chat/completions
    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<Completion> {
        let api_key = resolve_api_key(&self.config)?;
        let url = format!("{}/v1/chat/completions", self.base_url().trim_end_matches('/'));

        let body = serde_json::json!({
            "model": self.config.model,
            "temperature": self.config.temperature,
            "messages": messages,
        });

        tracing::debug!(
            "chat completion: model={} messages={}",
            self.config.model,
            messages.len()
        );

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            tracing::warn!("OpenAI request failed: {status}");
            return Err(PilotError::Upstream(format!(
                "OpenAI request failed: {} {text}",
                status.as_u16()
            )));
        }

        let json: Value = resp.json().await?;
        Ok(parse_completion(&json))
    }
}

fn parse_completion(json: &Value) -> Completion {
    let text = json["choices"][0]["message"]["content"]
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(EMPTY_COMPLETION)
        .to_string();
    let usage = json.get("usage").filter(|u| !u.is_null()).cloned();
    Completion { text, usage }
}

fn resolve_api_key(config: &LlmConfig) -> Result<String> {
    if let Some(ref key) = config.api_key {
        if !key.is_empty() {
            return Ok(key.clone());
        }
    }

    let env_var_name = config.env_var.as_deref().unwrap_or(DEFAULT_API_KEY_ENV);

    std::env::var(env_var_name)
        .ok()
        .filter(|key| !key.is_empty())
        .ok_or_else(|| PilotError::Config(format!("{env_var_name} is not set in environment")))
}
