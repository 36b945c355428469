//! Error types for controller communication

use thiserror::Error;

/// Connector errors
#[derive(Error, Debug)]
pub enum ConnectorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{endpoint} failed with status {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Filter too large for the controller: {taps} taps (maximum {limit})")]
    TooManyTaps { taps: usize, limit: usize },

    #[error("Invalid group link {0:?} (expected ID:CHANNEL)")]
    InvalidLink(String),

    #[error("Device not found: {0}")]
    DeviceNotFound(String),
}

/// Result type for connector operations
pub type ConnectorResult<T> = Result<T, ConnectorError>;
