//! Outbound create request

use super::entities::{MessageId, MessageKind};
use crate::core::error::DomainError;
use serde::Serialize;

/// `{ request_type: "create", id, content, type, response_id? }`
///
/// `response_id` is present exactly when `type = "query"`, where it names
/// the paired `llm` placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateRequest {
    request_type: &'static str,
    id: String,
    content: String,
    #[serde(rename = "type")]
    kind: MessageKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_id: Option<String>,
}

impl CreateRequest {
    /// Build a create request, rejecting invalid combinations before anything
    /// reaches the wire.
    pub fn new(
        id: &MessageId,
        content: impl Into<String>,
        kind: MessageKind,
        response_id: Option<&MessageId>,
    ) -> Result<Self, DomainError> {
        let MessageId::Temporary(tmp) = id else {
            return Err(DomainError::InvalidCreateRequest(format!(
                "message {} is already confirmed",
                id
            )));
        };

        match (kind, response_id) {
            (MessageKind::Llm, _) => {
                return Err(DomainError::InvalidCreateRequest(
                    "llm messages cannot be created locally".into(),
                ));
            }
            (MessageKind::Query, None) => {
                return Err(DomainError::InvalidCreateRequest(
                    "query requires a paired placeholder id".into(),
                ));
            }
            (MessageKind::Text | MessageKind::Code, Some(_)) => {
                return Err(DomainError::InvalidCreateRequest(format!(
                    "response_id is only valid for queries, got {}",
                    kind
                )));
            }
            _ => {}
        }

        Ok(Self {
            request_type: "create",
            id: tmp.clone(),
            content: content.into(),
            kind,
            response_id: response_id.map(|r| r.as_str().to_string()),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn response_id(&self) -> Option<&str> {
        self.response_id.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn code_request_has_no_response_id() {
        let id = MessageId::Temporary("tmp-1".into());
        let req = CreateRequest::new(&id, "print(1)", MessageKind::Code, None).unwrap();
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({"request_type": "create", "id": "tmp-1", "content": "print(1)", "type": "code"})
        );
    }

    #[test]
    fn query_carries_placeholder_id() {
        let id = MessageId::Temporary("q".into());
        let placeholder = MessageId::Temporary("p".into());
        let req =
            CreateRequest::new(&id, "explain", MessageKind::Query, Some(&placeholder)).unwrap();
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["response_id"], "p");
        assert_eq!(value["type"], "query");
    }

    #[test]
    fn query_without_placeholder_is_rejected() {
        let id = MessageId::Temporary("q".into());
        let err = CreateRequest::new(&id, "explain", MessageKind::Query, None).unwrap_err();
        assert!(matches!(err, DomainError::InvalidCreateRequest(_)));
    }

    #[test]
    fn llm_and_confirmed_ids_are_rejected() {
        let tmp = MessageId::Temporary("x".into());
        assert!(CreateRequest::new(&tmp, "", MessageKind::Llm, None).is_err());

        let confirmed = MessageId::confirmed("3");
        assert!(CreateRequest::new(&confirmed, "a", MessageKind::Text, None).is_err());
    }

    #[test]
    fn response_id_on_text_is_rejected() {
        let id = MessageId::Temporary("t".into());
        let other = MessageId::Temporary("o".into());
        assert!(CreateRequest::new(&id, "a", MessageKind::Text, Some(&other)).is_err());
    }
}
