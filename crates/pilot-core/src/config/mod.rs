use crate::error::{PilotError, Result};
use config::{Config, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PilotConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding `sessions.json`, `folders.json`, `principles.json`
    /// and the legacy `drafts.json`.
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_web_port")]
    pub port: u16,
    #[serde(default = "default_web_host")]
    pub host: String,
    #[serde(default = "default_public_dir")]
    pub public_dir: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            port: default_web_port(),
            host: default_web_host(),
            public_dir: default_public_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_llm_temperature")]
    pub temperature: f64,
    #[serde(default)]
    pub api_key: Option<String>,
    /// Environment variable consulted when `api_key` is unset.
    #[serde(default)]
    pub env_var: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    /// How many trailing conversation messages are sent with each request.
    #[serde(default = "default_history_turns")]
    pub history_turns: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_llm_model(),
            temperature: default_llm_temperature(),
            api_key: None,
            env_var: None,
            base_url: None,
            history_turns: default_history_turns(),
        }
    }
}

// -- Defaults --

fn default_data_dir() -> String {
    "data".to_string()
}
fn default_web_port() -> u16 {
    4173
}
fn default_web_host() -> String {
    "127.0.0.1".to_string()
}
fn default_public_dir() -> String {
    "public".to_string()
}
fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_llm_temperature() -> f64 {
    0.7
}
fn default_history_turns() -> usize {
    10
}

pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

impl PilotConfig {
    /// Load configuration with three-layer TOML merge:
    /// 1. ~/.config/prompt-pilot/config.toml (global)
    /// 2. .prompt-pilot/config.toml (project)
    /// 3. .prompt-pilot/config.local.toml (local, gitignored)
    pub fn load(project_dir: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                builder = builder.add_source(File::from(global_path).required(false));
            }
        }

        if let Some(dir) = project_dir {
            let project_config = dir.join(".prompt-pilot").join("config.toml");
            if project_config.exists() {
                builder = builder.add_source(File::from(project_config).required(false));
            }

            let local_config = dir.join(".prompt-pilot").join("config.local.toml");
            if local_config.exists() {
                builder = builder.add_source(File::from(local_config).required(false));
            }
        }

        let config = builder
            .build()
            .map_err(|e| PilotError::Config(e.to_string()))?;

        let mut cfg: Self = config
            .try_deserialize()
            .map_err(|e| PilotError::Config(e.to_string()))?;

        cfg.validate();
        Ok(cfg)
    }

    /// Load with defaults only (no files).
    pub fn default_config() -> Self {
        Self {
            storage: StorageConfig::default(),
            web: WebConfig::default(),
            llm: LlmConfig::default(),
        }
    }

    /// Validate config values, fixing out-of-range values and logging warnings.
    pub fn validate(&mut self) -> Vec<String> {
        let mut warnings = Vec::new();

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            warnings.push(format!(
                "llm.temperature = {} out of range [0.0, 2.0], clamping",
                self.llm.temperature
            ));
            self.llm.temperature = self.llm.temperature.clamp(0.0, 2.0);
        }

        if self.llm.history_turns == 0 {
            warnings.push("llm.history_turns = 0, setting to 1".to_string());
            self.llm.history_turns = 1;
        }

        if self.llm.model.trim().is_empty() {
            warnings.push(format!(
                "llm.model is empty, using '{}'",
                default_llm_model()
            ));
            self.llm.model = default_llm_model();
        }

        if self.storage.data_dir.trim().is_empty() {
            warnings.push(format!(
                "storage.data_dir is empty, using '{}'",
                default_data_dir()
            ));
            self.storage.data_dir = default_data_dir();
        }

        for w in &warnings {
            tracing::warn!("config: {}", w);
        }

        warnings
    }

    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.storage.data_dir)
    }

    pub fn public_dir(&self) -> PathBuf {
        PathBuf::from(&self.web.public_dir)
    }
}

fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("prompt-pilot").join("config.toml"))
}
