//! Session domain entities

use crate::notebook::entities::Message;

/// A remote notebook session as returned by the session directory.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    id: String,
    messages: Vec<Message>,
}

impl Session {
    pub fn new(id: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            id: id.into(),
            messages,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }
}
