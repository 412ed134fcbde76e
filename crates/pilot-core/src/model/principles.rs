use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Raw `principles` payload: a newline-delimited string or a list.
/// Anything else normalizes to an empty list. Within a list only strings,
/// numbers and booleans are kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrinciplesInput {
    Text(String),
    List(Vec<Value>),
    Other(Value),
}

impl PrinciplesInput {
    /// Trim every entry and drop the blank ones.
    pub fn normalize(&self) -> Vec<String> {
        match self {
            Self::Text(text) => text
                .split('\n')
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
            Self::List(items) => items.iter().filter_map(principle_from_value).collect(),
            Self::Other(_) => Vec::new(),
        }
    }
}

fn principle_from_value(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Number principles `1. ...`, `2. ...` one per line.
pub fn numbered(principles: &[String]) -> String {
    principles
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{}. {}", i + 1, p))
        .collect::<Vec<_>>()
        .join("\n")
}
