//! Session reconciliation use case.
//!
//! [`SessionReconciler`] owns the transcript of one session. Local creations
//! are appended optimistically; remote events from the session channel are
//! merged in arrival order through [`SessionReconciler::apply_remote`], which
//! is the only path for remote-originated mutation.
//!
//! Failures while applying a remote event never stop the stream: they are
//! returned to the caller, traced, and recorded as `diagnostic` events on the
//! session log.

use crate::ports::session_logger::{NoSessionLogger, SessionLogEvent, SessionLogger};
use crate::ports::session_transport::{SessionTransport, SessionTransportError};
use notebook_domain::{
    CreateRequest, DomainError, Message, MessageId, MessageKind, ReconcileError, RemoteEvent,
    Session, Transcript,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors from [`SessionReconciler::submit`].
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("Invalid message: {0}")]
    Domain(#[from] DomainError),

    #[error("Transport error: {0}")]
    Transport(#[from] SessionTransportError),
}

/// Identifiers produced by one local creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedIds {
    pub message: MessageId,
    /// The paired `llm` placeholder, present only for queries.
    pub placeholder: Option<MessageId>,
}

pub struct SessionReconciler {
    session_id: String,
    author: String,
    transcript: Transcript,
    transport: Arc<dyn SessionTransport>,
    session_logger: Arc<dyn SessionLogger>,
}

impl SessionReconciler {
    pub fn new(session_id: impl Into<String>, transport: Arc<dyn SessionTransport>) -> Self {
        Self {
            session_id: session_id.into(),
            author: "user".to_string(),
            transcript: Transcript::new(),
            transport,
            session_logger: Arc::new(NoSessionLogger),
        }
    }

    /// Seed the transcript with the messages of a fetched session.
    pub fn from_session(session: Session, transport: Arc<dyn SessionTransport>) -> Self {
        let id = session.id().to_string();
        let (transcript, skipped) = Transcript::from_messages(session.into_messages());
        for err in &skipped {
            warn!("Skipping message while hydrating session {}: {}", id, err);
        }
        debug!(
            "Hydrated session {} with {} message(s)",
            id,
            transcript.len()
        );
        Self {
            transcript,
            ..Self::new(id, transport)
        }
    }

    /// Create with a session logger.
    pub fn with_session_logger(mut self, logger: Arc<dyn SessionLogger>) -> Self {
        self.session_logger = logger;
        self
    }

    /// Author recorded on locally created messages.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Stable copy of the transcript for readers outside the reconciler.
    pub fn snapshot(&self) -> Vec<Message> {
        self.transcript.messages().to_vec()
    }

    /// Append a local message (and, for a query, its `llm` placeholder).
    ///
    /// `llm` messages are only ever produced by the session and cannot be
    /// created locally.
    pub fn create_local(
        &mut self,
        content: impl Into<String>,
        kind: MessageKind,
    ) -> Result<CreatedIds, DomainError> {
        if !kind.is_manual() {
            return Err(DomainError::InvalidKind(kind.as_str().to_string()));
        }

        let message = Message::local(self.author.clone(), kind, content);
        let message_id = message.id().clone();
        self.push_local(message)?;

        let placeholder = if kind == MessageKind::Query {
            let placeholder = Message::llm_placeholder();
            let placeholder_id = placeholder.id().clone();
            self.push_local(placeholder)?;
            Some(placeholder_id)
        } else {
            None
        };

        Ok(CreatedIds {
            message: message_id,
            placeholder,
        })
    }

    fn push_local(&mut self, message: Message) -> Result<(), DomainError> {
        // Temporary ids are fresh v4 uuids; a collision means a broken generator.
        self.transcript
            .push(message)
            .map(|_| ())
            .map_err(|e| DomainError::InvalidCreateRequest(e.to_string()))
    }

    /// Create a message locally and request its creation on the session.
    ///
    /// The channel is checked before the optimistic append, so a closed
    /// channel leaves the transcript unchanged. A send that fails after the
    /// append leaves the message unacknowledged.
    pub async fn submit(
        &mut self,
        content: impl Into<String>,
        kind: MessageKind,
    ) -> Result<CreatedIds, SubmitError> {
        if !self.transport.is_open() {
            return Err(SessionTransportError::NotOpen("closed".to_string()).into());
        }

        let content = content.into();
        let ids = self.create_local(content.clone(), kind)?;
        let request = CreateRequest::new(&ids.message, content, kind, ids.placeholder.as_ref())?;

        self.transport.send_create(&request).await?;
        info!("Requested creation of {} message {}", kind, ids.message);

        self.session_logger.log(SessionLogEvent::new(
            "create_sent",
            json!({
                "session_id": self.session_id,
                "id": request.id(),
                "kind": kind.as_str(),
                "response_id": request.response_id(),
            }),
        ));

        Ok(ids)
    }

    /// Merge one remote event into the transcript.
    ///
    /// Returns the position of the mutated message. On error the transcript
    /// is unchanged.
    pub fn apply_remote(&mut self, event: RemoteEvent) -> Result<usize, ReconcileError> {
        match self.transcript.apply(&event) {
            Ok(pos) => {
                debug!("Applied {} at position {}", event.name(), pos);
                self.session_logger.log(SessionLogEvent::new(
                    "remote_event",
                    json!({
                        "session_id": self.session_id,
                        "event": event.name(),
                        "target": event.target(),
                        "position": pos,
                    }),
                ));
                Ok(pos)
            }
            Err(err) => {
                if err.is_lookup_miss() {
                    debug!("Dropping {}: {}", event.name(), err);
                } else {
                    warn!("Dropping {}: {}", event.name(), err);
                }
                let raw = match &event {
                    RemoteEvent::Unrecognized { raw, .. } => Some(raw.as_str()),
                    _ => None,
                };
                self.session_logger.log(SessionLogEvent::new(
                    "diagnostic",
                    json!({
                        "session_id": self.session_id,
                        "event": event.name(),
                        "target": event.target(),
                        "error": err.to_string(),
                        "raw": raw,
                    }),
                ));
                Err(err)
            }
        }
    }
}
