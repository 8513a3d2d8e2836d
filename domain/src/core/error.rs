//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid create request: {0}")]
    InvalidCreateRequest(String),

    #[error("Invalid message kind: {0}")]
    InvalidKind(String),
}

/// Reasons a remote event was not applied to the transcript.
///
/// None of these are fatal: the event is dropped and the transcript is left
/// exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("No message with id {0}")]
    UnknownMessage(String),

    #[error("Message {0} is not a code message")]
    NotCodeMessage(String),

    #[error("Unrecognized execution status '{status}' for message {id}")]
    UnrecognizedStatus { id: String, status: String },

    #[error("Message id {0} is already in use")]
    DuplicateId(String),

    #[error("Generation failed for message {0}")]
    GenerationFailed(String),

    #[error("Session reported message {0} as not found")]
    RemoteNotFound(String),

    #[error("Unrecognized event (result: {})", .tag.as_deref().unwrap_or("<missing>"))]
    Unrecognized { tag: Option<String> },
}

impl ReconcileError {
    /// Lookup misses can legitimately happen while local and remote logs race.
    pub fn is_lookup_miss(&self) -> bool {
        matches!(self, ReconcileError::UnknownMessage(_))
    }
}
