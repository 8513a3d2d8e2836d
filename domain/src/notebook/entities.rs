//! Notebook transcript entities

use super::output::Output;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Identifier of a [`Message`].
///
/// A message starts life with a client-generated temporary identifier and
/// switches, exactly once, to the identifier assigned by the remote session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MessageId {
    /// Locally generated placeholder (UUID v4), pending confirmation.
    Temporary(String),
    /// Identifier assigned by the remote session.
    Confirmed(String),
}

impl MessageId {
    /// Generate a fresh temporary identifier.
    pub fn temporary() -> Self {
        MessageId::Temporary(Uuid::new_v4().to_string())
    }

    pub fn confirmed(id: impl Into<String>) -> Self {
        MessageId::Confirmed(id.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            MessageId::Temporary(id) | MessageId::Confirmed(id) => id,
        }
    }

    pub fn is_temporary(&self) -> bool {
        matches!(self, MessageId::Temporary(_))
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Message discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    Code,
    Query,
    /// Placeholder for an in-flight generation. Never created by the user.
    Llm,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Text => "text",
            MessageKind::Code => "code",
            MessageKind::Query => "query",
            MessageKind::Llm => "llm",
        }
    }

    /// Whether a user may create a message of this kind.
    pub fn is_manual(&self) -> bool {
        !matches!(self, MessageKind::Llm)
    }

    /// Next kind in the composer cycle: code → text → query → code.
    ///
    /// `llm` is not part of the cycle and maps to `code`.
    pub fn cycle(&self) -> Self {
        match self {
            MessageKind::Code => MessageKind::Text,
            MessageKind::Text => MessageKind::Query,
            MessageKind::Query | MessageKind::Llm => MessageKind::Code,
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(MessageKind::Text),
            "code" => Ok(MessageKind::Code),
            "query" => Ok(MessageKind::Query),
            "llm" => Ok(MessageKind::Llm),
            other => Err(format!("unknown message kind: {}", other)),
        }
    }
}

/// Execution progress of a code message: `pending → started → done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    Pending,
    Started,
    Done,
}

impl ExecutionStatus {
    /// Parse a status as reported by the session.
    ///
    /// Accepts the canonical names as well as the execution engine's
    /// `busy` / `idle` vocabulary. Returns `None` for anything else.
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(ExecutionStatus::Pending),
            "started" | "busy" => Some(ExecutionStatus::Started),
            "done" | "idle" => Some(ExecutionStatus::Done),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionStatus::Pending => "pending",
            ExecutionStatus::Started => "started",
            ExecutionStatus::Done => "done",
        }
    }
}

/// Kind-specific payload of a message.
#[derive(Debug, Clone, PartialEq)]
pub enum MessageBody {
    /// `text`, `query` and `llm` messages carry only their content.
    Plain,
    /// `code` messages track execution and outputs.
    Code {
        execution_status: ExecutionStatus,
        output: Vec<Output>,
    },
}

/// An entry in a session transcript (Entity)
///
/// `acknowledged` is derived from the identifier: a message is acknowledged
/// exactly when its identifier is no longer temporary.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    id: MessageId,
    author: String,
    kind: MessageKind,
    content: String,
    body: MessageBody,
}

impl Message {
    /// A locally created message with a fresh temporary identifier.
    pub fn local(author: impl Into<String>, kind: MessageKind, content: impl Into<String>) -> Self {
        Self::new(MessageId::temporary(), author, kind, content)
    }

    /// A message already known to the remote session.
    pub fn confirmed(
        id: impl Into<String>,
        author: impl Into<String>,
        kind: MessageKind,
        content: impl Into<String>,
    ) -> Self {
        Self::new(MessageId::confirmed(id), author, kind, content)
    }

    /// Empty `llm` placeholder authored by the assistant.
    pub fn llm_placeholder() -> Self {
        Self::local("assistant", MessageKind::Llm, "")
    }

    fn new(
        id: MessageId,
        author: impl Into<String>,
        kind: MessageKind,
        content: impl Into<String>,
    ) -> Self {
        let body = match kind {
            MessageKind::Code => MessageBody::Code {
                execution_status: ExecutionStatus::Pending,
                output: Vec::new(),
            },
            _ => MessageBody::Plain,
        };
        Self {
            id,
            author: author.into(),
            kind,
            content: content.into(),
            body,
        }
    }

    /// Replace the default code payload (used when hydrating a fetched session).
    pub fn with_execution(mut self, status: ExecutionStatus, output: Vec<Output>) -> Self {
        if let MessageBody::Code {
            execution_status,
            output: current,
        } = &mut self.body
        {
            *execution_status = status;
            *current = output;
        }
        self
    }

    pub fn id(&self) -> &MessageId {
        &self.id
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn body(&self) -> &MessageBody {
        &self.body
    }

    pub fn acknowledged(&self) -> bool {
        !self.id.is_temporary()
    }

    /// Execution status, for code messages only.
    pub fn execution_status(&self) -> Option<ExecutionStatus> {
        match &self.body {
            MessageBody::Code {
                execution_status, ..
            } => Some(*execution_status),
            MessageBody::Plain => None,
        }
    }

    /// Outputs, for code messages only.
    pub fn output(&self) -> Option<&[Output]> {
        match &self.body {
            MessageBody::Code { output, .. } => Some(output),
            MessageBody::Plain => None,
        }
    }

    pub(crate) fn confirm(&mut self, assigned: String) {
        self.id = MessageId::Confirmed(assigned);
    }

    pub(crate) fn append_content(&mut self, delta: &str) {
        self.content.push_str(delta);
    }

    pub(crate) fn body_mut(&mut self) -> &mut MessageBody {
        &mut self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_code_message_defaults() {
        let msg = Message::local("user", MessageKind::Code, "print(1)");
        assert!(!msg.acknowledged());
        assert!(msg.id().is_temporary());
        assert_eq!(msg.execution_status(), Some(ExecutionStatus::Pending));
        assert_eq!(msg.output(), Some(&[][..]));
    }

    #[test]
    fn plain_messages_have_no_execution_fields() {
        let msg = Message::local("user", MessageKind::Text, "# notes");
        assert_eq!(msg.execution_status(), None);
        assert!(msg.output().is_none());
    }

    #[test]
    fn temporary_ids_are_unique() {
        assert_ne!(MessageId::temporary(), MessageId::temporary());
    }

    #[test]
    fn confirm_flips_acknowledged() {
        let mut msg = Message::local("user", MessageKind::Text, "hi");
        msg.confirm("7".to_string());
        assert!(msg.acknowledged());
        assert_eq!(msg.id().as_str(), "7");
    }

    #[test]
    fn status_wire_vocabulary() {
        assert_eq!(ExecutionStatus::from_wire("busy"), Some(ExecutionStatus::Started));
        assert_eq!(ExecutionStatus::from_wire("idle"), Some(ExecutionStatus::Done));
        assert_eq!(ExecutionStatus::from_wire("started"), Some(ExecutionStatus::Started));
        assert_eq!(ExecutionStatus::from_wire("zombie"), None);
    }

    #[test]
    fn kind_cycle_matches_composer_order() {
        assert_eq!(MessageKind::Code.cycle(), MessageKind::Text);
        assert_eq!(MessageKind::Text.cycle(), MessageKind::Query);
        assert_eq!(MessageKind::Query.cycle(), MessageKind::Code);
    }

    #[test]
    fn kind_from_str() {
        assert_eq!("Code".parse::<MessageKind>(), Ok(MessageKind::Code));
        assert!("cell".parse::<MessageKind>().is_err());
    }
}
