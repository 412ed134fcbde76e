use thiserror::Error;

#[derive(Debug, Error)]
pub enum PilotError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidInput(String),

    /// The completion API answered with a non-success status.
    #[error("{0}")]
    Upstream(String),
}

impl PilotError {
    /// Returns `true` for errors caused by the request itself rather than
    /// by storage or the upstream service.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::InvalidInput(_))
    }
}

pub type Result<T> = std::result::Result<T, PilotError>;
