//! Code cell outputs
//!
//! Wire shape (adjacently tagged on `type` / `content`):
//!
//! ```json
//! {"type": "stream", "content": {"name": "stdout", "text": "1\n"}}
//! {"type": "error",  "content": "Traceback ..."}
//! {"type": "data",   "content": {"type": "image/png", "data": "iVBOR..."}}
//! ```

use serde::{Deserialize, Serialize};

/// Name of the stream a fragment was written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamName {
    Stdout,
    Stderr,
}

/// MIME types the client knows how to display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MimeType {
    #[serde(rename = "image/png")]
    ImagePng,
    #[serde(rename = "text/html")]
    TextHtml,
    #[serde(rename = "text/plain")]
    TextPlain,
}

impl MimeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MimeType::ImagePng => "image/png",
            MimeType::TextHtml => "text/html",
            MimeType::TextPlain => "text/plain",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamOutput {
    pub name: StreamName,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataOutput {
    #[serde(rename = "type")]
    pub mime: MimeType,
    /// Encoded payload (base64 for images, raw text otherwise).
    pub data: String,
}

/// One output record of a code message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "lowercase")]
pub enum Output {
    Stream(StreamOutput),
    /// Raw diagnostic text, may contain ANSI escapes.
    Error(String),
    Data(DataOutput),
}

impl Output {
    pub fn stdout(text: impl Into<String>) -> Self {
        Output::Stream(StreamOutput {
            name: StreamName::Stdout,
            text: text.into(),
        })
    }

    pub fn stderr(text: impl Into<String>) -> Self {
        Output::Stream(StreamOutput {
            name: StreamName::Stderr,
            text: text.into(),
        })
    }

    pub fn error(text: impl Into<String>) -> Self {
        Output::Error(text.into())
    }

    pub fn data(mime: MimeType, data: impl Into<String>) -> Self {
        Output::Data(DataOutput {
            mime,
            data: data.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stream_wire_shape() {
        let value = serde_json::to_value(Output::stdout("1\n")).unwrap();
        assert_eq!(
            value,
            json!({"type": "stream", "content": {"name": "stdout", "text": "1\n"}})
        );
    }

    #[test]
    fn data_decodes_mime() {
        let out: Output = serde_json::from_value(json!({
            "type": "data",
            "content": {"type": "image/png", "data": "AAAA"}
        }))
        .unwrap();
        assert_eq!(out, Output::data(MimeType::ImagePng, "AAAA"));
    }

    #[test]
    fn unknown_mime_is_rejected() {
        let out: Result<Output, _> = serde_json::from_value(json!({
            "type": "data",
            "content": {"type": "application/pdf", "data": "AAAA"}
        }));
        assert!(out.is_err());
    }
}
