//! Slash-command parsing for the notebook REPL

use notebook_domain::{EditorPosition, MessageKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Submit `content`; `kind` overrides the composing kind for this entry.
    Submit {
        kind: Option<MessageKind>,
        content: String,
    },
    SetKind(MessageKind),
    CycleKind,
    Show,
    /// Append a line to the draft code cell.
    DraftLine(String),
    ShowDraft,
    ClearDraft,
    /// Submit the draft code cell.
    Run,
    Complete(EditorPosition),
    Hover(EditorPosition),
    Help,
    Quit,
    Usage(&'static str),
    Unknown(String),
}

/// Parse `LINE:COLUMN` (both 1-based).
pub fn parse_position(arg: &str) -> Option<EditorPosition> {
    let (line, column) = arg.trim().split_once(':')?;
    let line: u32 = line.trim().parse().ok()?;
    let column: u32 = column.trim().parse().ok()?;
    if line == 0 || column == 0 {
        return None;
    }
    Some(EditorPosition::new(line, column))
}

pub fn parse_command(line: &str) -> ReplCommand {
    let Some(rest) = line.strip_prefix('/') else {
        return ReplCommand::Submit {
            kind: None,
            content: line.to_string(),
        };
    };
    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    match name {
        "text" | "code" | "query" => {
            let kind = name.parse().unwrap_or(MessageKind::Text);
            if arg.is_empty() {
                ReplCommand::SetKind(kind)
            } else {
                ReplCommand::Submit {
                    kind: Some(kind),
                    content: arg.to_string(),
                }
            }
        }
        "kind" | "k" => ReplCommand::CycleKind,
        "show" | "s" => ReplCommand::Show,
        "draft" | "d" if arg.is_empty() => ReplCommand::ShowDraft,
        "draft" | "d" => ReplCommand::DraftLine(arg.to_string()),
        "clear" => ReplCommand::ClearDraft,
        "run" | "r" => ReplCommand::Run,
        "complete" | "c" => match parse_position(arg) {
            Some(pos) => ReplCommand::Complete(pos),
            None => ReplCommand::Usage("/complete LINE:COLUMN"),
        },
        "hover" => match parse_position(arg) {
            Some(pos) => ReplCommand::Hover(pos),
            None => ReplCommand::Usage("/hover LINE:COLUMN"),
        },
        "help" | "h" | "?" => ReplCommand::Help,
        "quit" | "exit" | "q" => ReplCommand::Quit,
        _ => ReplCommand::Unknown(line.to_string()),
    }
}
