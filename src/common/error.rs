use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    /// The sheet backend did not report success, or returned something that
    /// is not a row collection.
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SyncError {
    pub fn upstream(message: impl Into<String>) -> Self {
        SyncError::UpstreamUnavailable(message.into())
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;
