//! Session channel port
//!
//! Outbound side of the session channel. Inbound envelopes are decoded by
//! the adapter and handed to the reconciler as [`RemoteEvent`]s.
//!
//! [`RemoteEvent`]: notebook_domain::RemoteEvent

use async_trait::async_trait;
use notebook_domain::CreateRequest;
use thiserror::Error;

/// Errors surfaced when sending on the session channel.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionTransportError {
    #[error("Session channel is not open (state: {0})")]
    NotOpen(String),

    #[error("Transport closed")]
    Closed,

    #[error("Send failed: {0}")]
    SendFailed(String),
}

#[async_trait]
pub trait SessionTransport: Send + Sync {
    /// Whether the channel currently accepts envelopes.
    fn is_open(&self) -> bool;

    /// Transmit a create request. Fails explicitly when the channel is not open.
    async fn send_create(&self, request: &CreateRequest) -> Result<(), SessionTransportError>;
}
