//! Console formatter for notebook transcripts
//!
//! Rendering is a pure mapping from a transcript snapshot to text. Each
//! message gets a header line (author, kind, status badge) followed by its
//! content and, for code, its outputs.

use colored::Colorize;
use notebook_domain::{
    DataOutput, ExecutionStatus, Message, MessageKind, MimeType, Output, StreamName,
};
use regex::Regex;
use std::sync::LazyLock;

static ANSI_ESCAPE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;?]*[ -/]*[@-~]").ok());

/// Remove ANSI escape sequences (tracebacks from the kernel are colored).
pub fn strip_ansi(text: &str) -> String {
    match ANSI_ESCAPE.as_ref() {
        Some(re) => re.replace_all(text, "").into_owned(),
        None => text.to_string(),
    }
}

/// Status badge for a message.
///
/// Code shows its execution state (`P` pending, `S` started, nothing once
/// done). Other kinds show `!!` until the session acknowledges them.
pub fn status_badge(message: &Message) -> &'static str {
    match message.execution_status() {
        Some(ExecutionStatus::Pending) => "P",
        Some(ExecutionStatus::Started) => "S",
        Some(ExecutionStatus::Done) => "",
        None if message.acknowledged() => "",
        None => "!!",
    }
}

/// Formats transcript messages for console display
pub struct TranscriptFormatter;

impl TranscriptFormatter {
    /// Format every message of a transcript snapshot.
    pub fn format_transcript(messages: &[Message]) -> String {
        if messages.is_empty() {
            return format!("{}\n", "(empty session)".dimmed());
        }
        messages
            .iter()
            .map(Self::format_message)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn format_message(message: &Message) -> String {
        let mut output = Self::header(message);
        output.push('\n');

        match message.kind() {
            MessageKind::Code => {
                for line in message.content().lines() {
                    output.push_str(&format!("  {} {}\n", "│".dimmed(), line));
                }
                for out in message.output().unwrap_or_default() {
                    output.push_str(&Self::format_output(out));
                }
            }
            MessageKind::Llm if message.content().is_empty() => {
                output.push_str(&format!("  {}\n", "…".dimmed()));
            }
            _ => {
                for line in message.content().lines() {
                    output.push_str(&format!("  {}\n", line));
                }
            }
        }

        output
    }

    fn header(message: &Message) -> String {
        let author = match message.kind() {
            MessageKind::Llm => message.author().magenta().bold(),
            _ => message.author().cyan().bold(),
        };
        let kind = format!("[{}]", message.kind()).dimmed();
        let badge = match status_badge(message) {
            "" => String::new(),
            "!!" => format!(" {}", "!!".red().bold()),
            other => format!(" {}", other.yellow().bold()),
        };
        format!(
            "{} {} {}{}",
            format!("#{}", message.id()).dimmed(),
            author,
            kind,
            badge
        )
    }

    /// Format one code output record.
    pub fn format_output(output: &Output) -> String {
        match output {
            Output::Stream(stream) => {
                let prefix = match stream.name {
                    StreamName::Stdout => String::new(),
                    StreamName::Stderr => "(stderr) ".to_string(),
                };
                let text = format!("{}{}", prefix, stream.text);
                let text = match stream.name {
                    StreamName::Stdout => text.normal(),
                    StreamName::Stderr => text.yellow(),
                };
                Self::ensure_newline(text.to_string())
            }
            Output::Error(trace) => Self::ensure_newline(strip_ansi(trace).red().to_string()),
            Output::Data(data) => Self::format_data(data),
        }
    }

    fn format_data(data: &DataOutput) -> String {
        match data.mime {
            MimeType::TextPlain | MimeType::TextHtml => Self::ensure_newline(data.data.clone()),
            MimeType::ImagePng => format!(
                "{}\n",
                format!("[image/png, {} bytes encoded]", data.data.len()).dimmed()
            ),
        }
    }

    fn ensure_newline(mut text: String) -> String {
        if !text.ends_with('\n') {
            text.push('\n');
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_badges_follow_status() {
        let pending = Message::local("user", MessageKind::Code, "x");
        assert_eq!(status_badge(&pending), "P");

        let started = Message::confirmed("1", "user", MessageKind::Code, "x")
            .with_execution(ExecutionStatus::Started, Vec::new());
        assert_eq!(status_badge(&started), "S");

        let done = Message::confirmed("1", "user", MessageKind::Code, "x")
            .with_execution(ExecutionStatus::Done, Vec::new());
        assert_eq!(status_badge(&done), "");
    }

    #[test]
    fn test_other_kinds_flag_unacknowledged() {
        let local = Message::local("user", MessageKind::Text, "hi");
        assert_eq!(status_badge(&local), "!!");
        let placeholder = Message::llm_placeholder();
        assert_eq!(status_badge(&placeholder), "!!");

        let confirmed = Message::confirmed("2", "user", MessageKind::Query, "why");
        assert_eq!(status_badge(&confirmed), "");
    }

    #[test]
    fn test_strip_ansi() {
        let colored = "\x1b[0;31mNameError\x1b[0m: name 'x' is not defined";
        assert_eq!(strip_ansi(colored), "NameError: name 'x' is not defined");
    }

    #[test]
    fn test_stream_outputs() {
        let out = strip_ansi(&TranscriptFormatter::format_output(&Output::stdout("1")));
        assert_eq!(out, "1\n");
        let err = strip_ansi(&TranscriptFormatter::format_output(&Output::stderr("warn\n")));
        assert_eq!(err, "(stderr) warn\n");
    }

    #[test]
    fn test_error_output_is_stripped() {
        let out = TranscriptFormatter::format_output(&Output::error("\x1b[31mBoom\x1b[0m"));
        assert!(strip_ansi(&out).contains("Boom"));
        assert!(!strip_ansi(&out).contains("[31m"));
    }

    #[test]
    fn test_data_outputs() {
        let html = TranscriptFormatter::format_output(&Output::data(MimeType::TextHtml, "<b>x</b>"));
        assert_eq!(html, "<b>x</b>\n");

        let png = strip_ansi(&TranscriptFormatter::format_output(&Output::data(
            MimeType::ImagePng,
            "iVBORw0KGgo=",
        )));
        assert!(png.contains("image/png"));
        assert!(png.contains("12 bytes"));
    }

    #[test]
    fn test_format_message_includes_header_and_body() {
        let msg = Message::confirmed("42", "user", MessageKind::Code, "print(1)")
            .with_execution(ExecutionStatus::Started, vec![Output::stdout("1\n")]);
        let text = strip_ansi(&TranscriptFormatter::format_message(&msg));
        assert!(text.starts_with("#42 user [code] S"));
        assert!(text.contains("print(1)"));
        assert!(text.contains("\n1\n"));
    }

    #[test]
    fn test_empty_transcript() {
        let text = strip_ansi(&TranscriptFormatter::format_transcript(&[]));
        assert_eq!(text, "(empty session)\n");
    }
}
