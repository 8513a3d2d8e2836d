//! Language client port
//!
//! A request/response channel to a language server, bound to one editor
//! surface. Implementations correlate responses to requests and must fail
//! every outstanding call when the underlying channel closes.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LanguageClientError {
    #[error("Channel is not open (state: {0})")]
    NotOpen(String),

    #[error("Transport closed before a response arrived")]
    TransportClosed,

    #[error("Language server error (code {code}): {message}")]
    Rpc { code: i64, message: String },

    #[error("Request timed out")]
    Timeout,

    #[error("{0}")]
    Other(String),
}

#[async_trait]
pub trait LanguageClient: Send + Sync {
    /// Issue a request and wait for its result payload.
    async fn call(&self, method: &str, params: Value) -> Result<Option<Value>, LanguageClientError>;

    /// Send a notification (no response expected).
    async fn notify(&self, method: &str, params: Value) -> Result<(), LanguageClientError>;

    /// Tear down the channel. Safe to call more than once.
    fn close(&self);
}
