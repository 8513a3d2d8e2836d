//! Append-only transcript with an identifier index.
//!
//! Messages are kept in insertion order in a `Vec`; a `HashMap` from the
//! current identifier string to the position keeps every remote lookup O(1).
//! The index is updated in the same `&mut self` call that rewrites an
//! identifier, so no reader can observe a half-confirmed message.

use super::entities::{ExecutionStatus, Message, MessageBody, MessageId};
use super::event::RemoteEvent;
use super::output::Output;
use crate::core::error::ReconcileError;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<Message>,
    index: HashMap<String, usize>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a transcript from messages already known to the session.
    ///
    /// Messages whose identifier repeats an earlier one are skipped.
    pub fn from_messages(messages: impl IntoIterator<Item = Message>) -> (Self, Vec<ReconcileError>) {
        let mut transcript = Self::new();
        let mut skipped = Vec::new();
        for msg in messages {
            if let Err(e) = transcript.push(msg) {
                skipped.push(e);
            }
        }
        (transcript, skipped)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Message> {
        self.index.get(id).map(|&i| &self.messages[i])
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Append a message. Returns its position.
    pub fn push(&mut self, message: Message) -> Result<usize, ReconcileError> {
        let key = message.id().as_str().to_string();
        if self.index.contains_key(&key) {
            return Err(ReconcileError::DuplicateId(key));
        }
        let pos = self.messages.len();
        self.messages.push(message);
        self.index.insert(key, pos);
        Ok(pos)
    }

    /// Apply one remote event. Returns the position of the mutated message.
    pub fn apply(&mut self, event: &RemoteEvent) -> Result<usize, ReconcileError> {
        match event {
            RemoteEvent::Confirmation {
                tmp_id,
                assigned_id,
            } => self.confirm(tmp_id, assigned_id),
            RemoteEvent::StatusChange { id, status } => self.set_status(id, status),
            RemoteEvent::OutputAppend { id, output } => self.append_output(id, output.clone()),
            RemoteEvent::ContentAppend { id, delta } => self.append_content(id, delta),
            RemoteEvent::GenerationFailed { id } => {
                Err(ReconcileError::GenerationFailed(id.clone()))
            }
            RemoteEvent::NotFound { id } => Err(ReconcileError::RemoteNotFound(id.clone())),
            RemoteEvent::Unrecognized { tag, .. } => {
                Err(ReconcileError::Unrecognized { tag: tag.clone() })
            }
        }
    }

    /// Replace a temporary identifier with the one assigned by the session.
    ///
    /// Only temporary identifiers can be confirmed, so a repeated confirmation
    /// is a lookup miss and leaves the transcript untouched.
    pub fn confirm(&mut self, tmp_id: &str, assigned_id: &str) -> Result<usize, ReconcileError> {
        let pos = self
            .index
            .get(tmp_id)
            .copied()
            .filter(|&i| self.messages[i].id().is_temporary())
            .ok_or_else(|| ReconcileError::UnknownMessage(tmp_id.to_string()))?;

        if self.index.contains_key(assigned_id) {
            return Err(ReconcileError::DuplicateId(assigned_id.to_string()));
        }

        self.index.remove(tmp_id);
        self.index.insert(assigned_id.to_string(), pos);
        self.messages[pos].confirm(assigned_id.to_string());
        Ok(pos)
    }

    /// Overwrite the execution status of a code message.
    ///
    /// Arrival order is trusted; only unrecognized values are rejected.
    pub fn set_status(&mut self, id: &str, status: &str) -> Result<usize, ReconcileError> {
        let pos = self.code_position(id)?;
        let parsed =
            ExecutionStatus::from_wire(status).ok_or_else(|| ReconcileError::UnrecognizedStatus {
                id: id.to_string(),
                status: status.to_string(),
            })?;
        if let MessageBody::Code {
            execution_status, ..
        } = self.messages[pos].body_mut()
        {
            *execution_status = parsed;
        }
        Ok(pos)
    }

    pub fn append_output(&mut self, id: &str, out: Output) -> Result<usize, ReconcileError> {
        let pos = self.code_position(id)?;
        if let MessageBody::Code { output, .. } = self.messages[pos].body_mut() {
            output.push(out);
        }
        Ok(pos)
    }

    /// Concatenate `delta` onto the message content, in receipt order.
    pub fn append_content(&mut self, id: &str, delta: &str) -> Result<usize, ReconcileError> {
        let pos = self
            .position(id)
            .ok_or_else(|| ReconcileError::UnknownMessage(id.to_string()))?;
        self.messages[pos].append_content(delta);
        Ok(pos)
    }

    fn code_position(&self, id: &str) -> Result<usize, ReconcileError> {
        let pos = self
            .position(id)
            .ok_or_else(|| ReconcileError::UnknownMessage(id.to_string()))?;
        match self.messages[pos].body() {
            MessageBody::Code { .. } => Ok(pos),
            MessageBody::Plain => Err(ReconcileError::NotCodeMessage(id.to_string())),
        }
    }

    /// Identifier of the message at `pos`.
    pub fn id_at(&self, pos: usize) -> Option<&MessageId> {
        self.messages.get(pos).map(|m| m.id())
    }
}
