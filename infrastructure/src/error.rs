//! Error types for the channel adapters

use thiserror::Error;

/// Result type alias for transport operations
pub type Result<T> = std::result::Result<T, TransportError>;

/// Errors that can occur on a duplex channel
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Channel is not open (state: {state})")]
    NotOpen { state: String },

    #[error("Transport closed")]
    Closed,

    #[error("Failed to connect to {endpoint}: {reason}")]
    Connect { endpoint: String, reason: String },

    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors resolved into a correlated call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CorrelatorError {
    #[error("Transport closed before a response arrived")]
    TransportClosed,

    #[error("JSON-RPC error (code {code}): {message}")]
    Rpc { code: i64, message: String },

    #[error("Channel is not open (state: {state})")]
    NotOpen { state: String },

    #[error("Send failed: {0}")]
    Send(String),
}

impl From<TransportError> for CorrelatorError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Closed => CorrelatorError::TransportClosed,
            TransportError::NotOpen { state } => CorrelatorError::NotOpen { state },
            other => CorrelatorError::Send(other.to_string()),
        }
    }
}
