use thiserror::Error;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("rate limit exceeded for key: {0}")]
    RateLimited(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("mail delivery error: {0}")]
    Delivery(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl TelemetryError {
    /// Wrap any persistence-layer failure. The inner detail is kept for
    /// server-side logging and never echoed to clients.
    pub fn storage(err: impl std::fmt::Display) -> Self {
        TelemetryError::Storage(err.to_string())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        TelemetryError::Validation(msg.into())
    }
}

pub type TelemetryResult<T> = Result<T, TelemetryError>;
