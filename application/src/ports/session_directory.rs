//! Session directory port
//!
//! Creation and lookup of remote sessions over a plain request/response
//! channel. The adapter lives in the infrastructure layer.

use async_trait::async_trait;
use notebook_domain::Session;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("{status}: {body}")]
    Status { status: u16, body: String },

    #[error("Request failed: {0}")]
    Http(String),

    #[error("Invalid session payload: {0}")]
    Decode(String),
}

#[async_trait]
pub trait SessionDirectory: Send + Sync {
    /// Create a new, empty session.
    async fn create_session(&self) -> Result<Session, DirectoryError>;

    /// Fetch an existing session with its ordered messages.
    async fn fetch_session(&self, id: &str) -> Result<Session, DirectoryError>;

    /// Identifiers of recently used sessions.
    async fn recent_sessions(&self) -> Result<Vec<String>, DirectoryError>;
}
