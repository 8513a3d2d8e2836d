//! Session channel envelope codec.
//!
//! Inbound envelopes are tagged by `result`:
//!
//! | `result`             | fields                                  |
//! |----------------------|-----------------------------------------|
//! | `created`            | `tmpID`, `id`                           |
//! | `code execution`     | `id`, `type` (status/stream/error/data), `content` |
//! | `generation success` | `id`, `content` (one streamed fragment) |
//! | `generation failed`  | `id`                                    |
//! | `not found`          | `id`                                    |
//!
//! Session-assigned ids are integers on the wire; they are normalized to
//! strings so they share one key space with temporary ids.

use notebook_domain::{
    DataOutput, ExecutionStatus, Message, MessageKind, Output, RemoteEvent, StreamOutput,
};
use serde::Deserialize;
use serde_json::Value;

/// Decode one inbound envelope. Never fails: anything unexpected becomes
/// [`RemoteEvent::Unrecognized`].
pub fn decode_envelope(envelope: &Value) -> RemoteEvent {
    let tag = envelope.get("result").and_then(Value::as_str);
    let decoded = match tag {
        Some("created") => decode_created(envelope),
        Some("code execution") => decode_execution(envelope),
        Some("generation success") => wire_id(envelope.get("id")).and_then(|id| {
            let delta = envelope.get("content")?.as_str()?.to_string();
            Some(RemoteEvent::ContentAppend { id, delta })
        }),
        Some("generation failed") => {
            wire_id(envelope.get("id")).map(|id| RemoteEvent::GenerationFailed { id })
        }
        Some("not found") => wire_id(envelope.get("id")).map(|id| RemoteEvent::NotFound { id }),
        _ => None,
    };

    decoded.unwrap_or_else(|| RemoteEvent::Unrecognized {
        tag: tag.map(str::to_string),
        raw: envelope.to_string(),
    })
}

fn decode_created(envelope: &Value) -> Option<RemoteEvent> {
    let tmp_id = envelope.get("tmpID")?.as_str()?.to_string();
    let assigned_id = wire_id(envelope.get("id"))?;
    Some(RemoteEvent::Confirmation {
        tmp_id,
        assigned_id,
    })
}

fn decode_execution(envelope: &Value) -> Option<RemoteEvent> {
    let id = wire_id(envelope.get("id"))?;
    let content = envelope.get("content")?;
    match envelope.get("type")?.as_str()? {
        "status" => Some(RemoteEvent::StatusChange {
            id,
            status: content.as_str()?.to_string(),
        }),
        "stream" => {
            let stream = StreamOutput::deserialize(content).ok()?;
            Some(RemoteEvent::OutputAppend {
                id,
                output: Output::Stream(stream),
            })
        }
        "error" => Some(RemoteEvent::OutputAppend {
            id,
            output: Output::Error(error_text(content)?),
        }),
        "data" => {
            let data = DataOutput::deserialize(content).ok()?;
            Some(RemoteEvent::OutputAppend {
                id,
                output: Output::Data(data),
            })
        }
        _ => None,
    }
}

/// Tracebacks come either joined or as a list of lines.
fn error_text(content: &Value) -> Option<String> {
    match content {
        Value::String(s) => Some(s.clone()),
        Value::Array(lines) => Some(
            lines
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join("\n"),
        ),
        _ => None,
    }
}

/// Normalize an id that may be an integer or a string.
pub fn wire_id(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

/// A stored message as returned by the session directory.
#[derive(Debug, Clone, Deserialize)]
pub struct WireMessage {
    pub id: Value,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub output: Vec<Output>,
    #[serde(default)]
    pub execution_status: Option<String>,
}

impl WireMessage {
    /// Convert into an acknowledged domain message.
    ///
    /// Returns `None` when the id is neither a number nor a string. An
    /// unknown execution status falls back to `done`: a stored cell is no
    /// longer running.
    pub fn into_message(self) -> Option<Message> {
        let id = wire_id(Some(&self.id))?;
        let author = self.author.unwrap_or_else(|| match self.kind {
            MessageKind::Llm => "assistant".to_string(),
            _ => "user".to_string(),
        });
        let message = Message::confirmed(id, author, self.kind, self.content);
        if self.kind != MessageKind::Code {
            return Some(message);
        }
        let status = self
            .execution_status
            .as_deref()
            .and_then(ExecutionStatus::from_wire)
            .unwrap_or(ExecutionStatus::Done);
        Some(message.with_execution(status, self.output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notebook_domain::{MimeType, StreamName};
    use serde_json::json;

    #[test]
    fn test_created() {
        let event = decode_envelope(&json!({"result": "created", "tmpID": "abc", "id": 42}));
        assert_eq!(
            event,
            RemoteEvent::Confirmation {
                tmp_id: "abc".into(),
                assigned_id: "42".into()
            }
        );
    }

    #[test]
    fn test_status() {
        let event = decode_envelope(&json!({
            "result": "code execution", "id": 42, "type": "status", "content": "busy"
        }));
        assert_eq!(
            event,
            RemoteEvent::StatusChange {
                id: "42".into(),
                status: "busy".into()
            }
        );
    }

    #[test]
    fn test_stream_output() {
        let event = decode_envelope(&json!({
            "result": "code execution", "id": 42, "type": "stream",
            "content": {"name": "stderr", "text": "oops\n"}
        }));
        let RemoteEvent::OutputAppend { id, output } = event else {
            panic!("expected output append");
        };
        assert_eq!(id, "42");
        assert_eq!(
            output,
            Output::Stream(StreamOutput {
                name: StreamName::Stderr,
                text: "oops\n".into()
            })
        );
    }

    #[test]
    fn test_error_output() {
        let event = decode_envelope(&json!({
            "result": "code execution", "id": 1, "type": "error",
            "content": "Traceback\nNameError"
        }));
        assert_eq!(
            event,
            RemoteEvent::OutputAppend {
                id: "1".into(),
                output: Output::error("Traceback\nNameError")
            }
        );

        let event = decode_envelope(&json!({
            "result": "code execution", "id": 1, "type": "error",
            "content": ["Traceback", "NameError"]
        }));
        assert_eq!(
            event,
            RemoteEvent::OutputAppend {
                id: "1".into(),
                output: Output::error("Traceback\nNameError")
            }
        );
    }

    #[test]
    fn test_data_output() {
        let event = decode_envelope(&json!({
            "result": "code execution", "id": 1, "type": "data",
            "content": {"type": "image/png", "data": "iVBOR"}
        }));
        assert_eq!(
            event,
            RemoteEvent::OutputAppend {
                id: "1".into(),
                output: Output::data(MimeType::ImagePng, "iVBOR")
            }
        );
    }

    #[test]
    fn test_unknown_mime_is_unrecognized() {
        let event = decode_envelope(&json!({
            "result": "code execution", "id": 1, "type": "data",
            "content": {"type": "application/pdf", "data": "x"}
        }));
        assert!(matches!(
            event,
            RemoteEvent::Unrecognized { tag: Some(ref t), .. } if t == "code execution"
        ));
    }

    #[test]
    fn test_generation_events() {
        assert_eq!(
            decode_envelope(&json!({"result": "generation success", "id": "7", "content": "The "})),
            RemoteEvent::ContentAppend {
                id: "7".into(),
                delta: "The ".into()
            }
        );
        assert_eq!(
            decode_envelope(&json!({"result": "generation failed", "id": 7})),
            RemoteEvent::GenerationFailed { id: "7".into() }
        );
        assert_eq!(
            decode_envelope(&json!({"result": "not found", "id": 8})),
            RemoteEvent::NotFound { id: "8".into() }
        );
    }

    #[test]
    fn test_unknown_and_missing_tags() {
        let event = decode_envelope(&json!({"result": "edited", "id": 1}));
        assert!(matches!(
            event,
            RemoteEvent::Unrecognized { tag: Some(ref t), .. } if t == "edited"
        ));

        let event = decode_envelope(&json!({"id": 1}));
        let RemoteEvent::Unrecognized { tag, raw } = event else {
            panic!("expected unrecognized");
        };
        assert!(tag.is_none());
        assert_eq!(raw, r#"{"id":1}"#);
    }

    #[test]
    fn test_created_missing_tmp_id() {
        let event = decode_envelope(&json!({"result": "created", "id": 1}));
        assert!(matches!(event, RemoteEvent::Unrecognized { .. }));
    }

    #[test]
    fn test_wire_message_hydration() {
        let code: WireMessage = serde_json::from_value(json!({
            "id": 3, "type": "code", "content": "print(1)",
            "output": [{"type": "stream", "content": {"name": "stdout", "text": "1\n"}}],
            "execution_status": "done"
        }))
        .unwrap();
        let msg = code.into_message().unwrap();
        assert_eq!(msg.id().as_str(), "3");
        assert!(msg.acknowledged());
        assert_eq!(msg.author(), "user");
        assert_eq!(msg.execution_status(), Some(ExecutionStatus::Done));
        assert_eq!(msg.output().unwrap(), &[Output::stdout("1\n")]);

        let llm: WireMessage =
            serde_json::from_value(json!({"id": 4, "type": "llm", "content": "Hi"})).unwrap();
        assert_eq!(llm.into_message().unwrap().author(), "assistant");

        let bad: WireMessage =
            serde_json::from_value(json!({"id": null, "type": "text", "content": ""})).unwrap();
        assert!(bad.into_message().is_none());
    }
}
