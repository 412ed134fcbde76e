use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::folder::{Prompt, PROMPT_TITLE_LIMIT};
use super::truncate_chars;

/// Legacy single-text draft. Older files may lack an id or carry
/// timestamps in other formats (epoch numbers, free text), so everything
/// but `text` is optional and `createdAt` is kept as raw JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    #[serde(
        default,
        deserialize_with = "lenient_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Value>,
}

/// Accept string or numeric ids; anything else reads as absent.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

impl Draft {
    pub fn new(text: &str) -> Self {
        Self {
            id: Some(Uuid::new_v4().to_string()),
            text: text.trim().to_string(),
            created_at: Some(Value::String(Utc::now().to_rfc3339())),
        }
    }

    /// Parsed creation time, if the stored value is an RFC 3339 string.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
            .as_ref()
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Convert into a prompt for the "Imported Drafts" folder. The title is
    /// the first 50 characters of the text, with `...` when it was cut.
    pub fn to_prompt(&self) -> Prompt {
        let title = if self.text.chars().count() > PROMPT_TITLE_LIMIT {
            format!("{}...", truncate_chars(&self.text, PROMPT_TITLE_LIMIT))
        } else {
            self.text.clone()
        };
        let mut prompt = Prompt::new(None, &self.text).with_title(title);
        prompt.content = self.text.clone();
        prompt.with_created_at(self.created_at().unwrap_or_else(Utc::now))
    }
}
