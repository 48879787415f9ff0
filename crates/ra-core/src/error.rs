//! Error types for the research assistant

use thiserror::Error;

/// Main error type for research assistant operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing required setting: {0}")]
    MissingConfig(String),

    #[error("Invalid setting {key}: {reason}")]
    InvalidConfig { key: String, reason: String },

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a missing configuration error
    pub fn missing_config(key: impl Into<String>) -> Self {
        Error::MissingConfig(key.into())
    }

    /// Create an invalid configuration error
    pub fn invalid_config(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidConfig {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create a timeout error
    pub fn timeout(msg: impl Into<String>) -> Self {
        Error::Timeout(msg.into())
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Error::Transport(msg.into())
    }

    /// True for errors caused by the remote side not answering in time
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout(_))
    }
}
