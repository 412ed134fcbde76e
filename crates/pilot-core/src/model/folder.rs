use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::truncate_chars;

pub const PROMPT_TITLE_LIMIT: usize = 50;

/// A named container of saved prompts. `parent_id` is stored as given;
/// nothing checks that it points at an existing folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub prompts: Vec<Prompt>,
    pub created_at: DateTime<Utc>,
}

impl Folder {
    pub fn new(name: impl Into<String>, parent_id: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            parent_id: parent_id.filter(|p| !p.is_empty()),
            prompts: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Prompt {
    /// Build a prompt from user input. Both fields are trimmed; a blank title
    /// falls back to the first 50 characters of the content.
    pub fn new(title: Option<&str>, content: &str) -> Self {
        let content = content.trim();
        let title = match title.map(str::trim) {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => truncate_chars(content, PROMPT_TITLE_LIMIT).to_string(),
        };
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            content: content.to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}
