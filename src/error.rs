//! Error types for apiq.

use thiserror::Error;

/// The main error type for apiq operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Failed to parse a compact relationship or path string.
    #[error("Parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The transport could not deliver the request at all.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The backend answered with a failure status.
    ///
    /// When the payload carried dotted validation errors under `errors`,
    /// they have already been expanded into a nested structure.
    #[error("Request failed with status {status}")]
    Response {
        status: u16,
        payload: serde_json::Value,
    },

    /// The `errors` field of a failure payload is not a map of message lists.
    #[error("Malformed error payload: {0}")]
    MalformedErrors(String),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// Create a parse error at the given position.
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }

    /// Status code of a failed response, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Response { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Nested validation errors of a failed response, if present.
    pub fn validation_errors(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Response { payload, .. } => payload.get("errors"),
            _ => None,
        }
    }
}

/// Result type alias for apiq operations.
pub type ApiResult<T> = Result<T, ApiError>;
