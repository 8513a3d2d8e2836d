//! Domain layer for notebook-client
//!
//! This crate contains the core entities and value objects of the notebook
//! client. It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Transcript
//!
//! A session's history is an ordered, append-only list of [`Message`]s.
//! Local messages are appended optimistically with a temporary identifier
//! and later confirmed by the remote session; remote [`RemoteEvent`]s mutate
//! existing entries in place but never reorder or remove them.
//!
//! ## Language intelligence
//!
//! Completion and hover results from the language server are normalized into
//! editor-facing [`Suggestion`]s and [`Hover`]s.

pub mod core;
pub mod language;
pub mod notebook;
pub mod session;

// Re-export commonly used types
pub use core::error::{DomainError, ReconcileError};
pub use language::{
    completion::{CompletionItem, Suggestion, suggestions_from_result},
    hover::{Hover, HoverContent, hover_from_result},
    position::{EditorPosition, ProtocolPosition, cell_uri, draft_cell_uri},
};
pub use notebook::{
    entities::{ExecutionStatus, Message, MessageBody, MessageId, MessageKind},
    event::RemoteEvent,
    output::{DataOutput, MimeType, Output, StreamName, StreamOutput},
    request::CreateRequest,
    transcript::Transcript,
};
pub use session::entities::Session;
