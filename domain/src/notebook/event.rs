//! Remote events applied to a transcript.

use super::output::Output;

/// A remote-originated state change, decoded from one session envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteEvent {
    /// The session accepted a locally created message (`created`).
    Confirmation { tmp_id: String, assigned_id: String },
    /// Execution status report for a code message. `status` is the raw wire
    /// value and is validated when applied.
    StatusChange { id: String, status: String },
    /// One output record for a code message.
    OutputAppend { id: String, output: Output },
    /// A streamed generation fragment (`generation success`).
    ContentAppend { id: String, delta: String },
    /// The session failed to produce a generation for `id`.
    GenerationFailed { id: String },
    /// The session does not know the referenced message.
    NotFound { id: String },
    /// Anything the codec could not map. `tag` is the `result` field when present.
    Unrecognized { tag: Option<String>, raw: String },
}

impl RemoteEvent {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            RemoteEvent::Confirmation { .. } => "confirmation",
            RemoteEvent::StatusChange { .. } => "status_change",
            RemoteEvent::OutputAppend { .. } => "output_append",
            RemoteEvent::ContentAppend { .. } => "content_append",
            RemoteEvent::GenerationFailed { .. } => "generation_failed",
            RemoteEvent::NotFound { .. } => "not_found",
            RemoteEvent::Unrecognized { .. } => "unrecognized",
        }
    }

    /// Identifier the event targets, if any.
    pub fn target(&self) -> Option<&str> {
        match self {
            RemoteEvent::Confirmation { tmp_id, .. } => Some(tmp_id),
            RemoteEvent::StatusChange { id, .. }
            | RemoteEvent::OutputAppend { id, .. }
            | RemoteEvent::ContentAppend { id, .. }
            | RemoteEvent::GenerationFailed { id }
            | RemoteEvent::NotFound { id } => Some(id),
            RemoteEvent::Unrecognized { .. } => None,
        }
    }
}
