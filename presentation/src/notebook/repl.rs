//! Interactive notebook REPL
//!
//! Line editing runs on a dedicated thread (reedline is blocking) and hands
//! each line to the async loop, which also consumes remote session events.
//! The editing thread only prompts again once the previous line has been
//! handled, so output never interleaves with a half-typed prompt.

use crate::config::ReplConfig;
use crate::notebook::command::{ReplCommand, parse_command};
use crate::notebook::editor::ReplEditorHost;
use crate::output::transcript::TranscriptFormatter;
use colored::Colorize;
use notebook_application::{LanguageBridge, SessionReconciler, SessionTransportError, SubmitError};
use notebook_domain::{EditorPosition, MessageKind, ReconcileError, RemoteEvent, draft_cell_uri};
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc as std_mpsc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

const HISTORY_CAPACITY: usize = 1000;

enum InputEvent {
    Line(String),
    Interrupted,
    Eof,
    Failed(String),
}

/// Result of handling one command.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Continue(String),
    Quit,
}

/// Interactive REPL over one session
pub struct NotebookRepl {
    reconciler: SessionReconciler,
    events: Option<mpsc::UnboundedReceiver<RemoteEvent>>,
    bridge: Option<Arc<LanguageBridge>>,
    host: Arc<ReplEditorHost>,
    config: ReplConfig,
    kind: MessageKind,
    draft: Vec<String>,
}

impl NotebookRepl {
    pub fn new(
        reconciler: SessionReconciler,
        events: mpsc::UnboundedReceiver<RemoteEvent>,
        config: ReplConfig,
    ) -> Self {
        Self {
            reconciler,
            events: Some(events),
            bridge: None,
            host: Arc::new(ReplEditorHost::new()),
            kind: config.default_kind,
            config,
            draft: Vec::new(),
        }
    }

    /// Attach language intelligence. The bridge must have been built over
    /// this REPL's [`editor_host`](Self::editor_host); the REPL owns it, the
    /// host only holds it weakly.
    pub fn with_language(mut self, bridge: Arc<LanguageBridge>) -> Self {
        self.bridge = Some(bridge);
        self
    }

    pub fn editor_host(&self) -> Arc<ReplEditorHost> {
        self.host.clone()
    }

    pub fn draft_uri(&self) -> String {
        draft_cell_uri(self.reconciler.session_id())
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn reconciler(&self) -> &SessionReconciler {
        &self.reconciler
    }

    /// Run the interactive REPL until `/quit`, Ctrl-D or input failure.
    pub async fn run(&mut self) {
        let (line_tx, mut line_rx) = mpsc::unbounded_channel();
        let (resume_tx, resume_rx) = std_mpsc::channel();
        let input = spawn_input(self.config.history_path(), line_tx, resume_rx);

        self.print_welcome();
        let _ = resume_tx.send(Some(self.prompt_label()));

        loop {
            tokio::select! {
                input = line_rx.recv() => {
                    let quit = match input {
                        Some(InputEvent::Line(line)) => {
                            let line = line.trim();
                            if line.is_empty() {
                                false
                            } else {
                                match self.execute(parse_command(line)).await {
                                    Outcome::Continue(text) => {
                                        print!("{}", text);
                                        false
                                    }
                                    Outcome::Quit => true,
                                }
                            }
                        }
                        Some(InputEvent::Interrupted) => {
                            println!("^C");
                            false
                        }
                        Some(InputEvent::Failed(e)) => {
                            eprintln!("Error: {}", e);
                            true
                        }
                        Some(InputEvent::Eof) | None => true,
                    };
                    if quit {
                        println!("Bye!");
                        break;
                    }
                    let _ = resume_tx.send(Some(self.prompt_label()));
                }
                event = next_event(&mut self.events) => {
                    match event {
                        Some(event) => {
                            let text = self.on_event(event);
                            if !text.is_empty() {
                                print!("{}", text);
                                let _ = std::io::stdout().flush();
                            }
                        }
                        None => {
                            self.events = None;
                            eprintln!("\n{}", "Session channel closed; new entries will not be sent.".yellow());
                        }
                    }
                }
            }
        }

        let _ = resume_tx.send(None);
        // A prompt may still be waiting for a line; the thread exits on its
        // next read.
        drop(input);
    }

    /// Handle one parsed command.
    pub async fn execute(&mut self, command: ReplCommand) -> Outcome {
        let text = match command {
            ReplCommand::Submit { kind, content } => {
                self.submit(content, kind.unwrap_or(self.kind)).await
            }
            ReplCommand::SetKind(kind) => {
                self.kind = kind;
                format!("Composing {} entries\n", kind)
            }
            ReplCommand::CycleKind => {
                self.kind = self.kind.cycle();
                format!("Composing {} entries\n", self.kind)
            }
            ReplCommand::Show => {
                TranscriptFormatter::format_transcript(self.reconciler.transcript().messages())
            }
            ReplCommand::DraftLine(line) => {
                self.draft.push(line);
                self.sync_draft().await;
                format!("{} draft line(s)\n", self.draft.len())
            }
            ReplCommand::ShowDraft => self.format_draft(),
            ReplCommand::ClearDraft => {
                self.draft.clear();
                self.sync_draft().await;
                "Draft cleared\n".to_string()
            }
            ReplCommand::Run => {
                if self.draft.is_empty() {
                    "Draft is empty; add lines with /draft\n".to_string()
                } else {
                    let code = self.draft.join("\n");
                    let text = self.submit(code, MessageKind::Code).await;
                    self.draft.clear();
                    self.sync_draft().await;
                    text
                }
            }
            ReplCommand::Complete(position) => self.complete(position).await,
            ReplCommand::Hover(position) => self.hover(position).await,
            ReplCommand::Help => help_text(),
            ReplCommand::Quit => return Outcome::Quit,
            ReplCommand::Usage(usage) => format!("Usage: {}\n", usage),
            ReplCommand::Unknown(cmd) => format!(
                "Unknown command: {}\nType /help for available commands\n",
                cmd
            ),
        };
        Outcome::Continue(text)
    }

    async fn submit(&mut self, content: String, kind: MessageKind) -> String {
        match self.reconciler.submit(content, kind).await {
            Ok(ids) => {
                let transcript = self.reconciler.transcript();
                std::iter::once(&ids.message)
                    .chain(ids.placeholder.as_ref())
                    .filter_map(|id| transcript.get(id.as_str()))
                    .map(TranscriptFormatter::format_message)
                    .collect()
            }
            Err(SubmitError::Transport(SessionTransportError::NotOpen(state))) => format!(
                "{}\n",
                format!("Session channel is {}; nothing was sent", state).red()
            ),
            Err(e) => format!("{}\n", format!("Error: {}", e).red()),
        }
    }

    /// Merge a remote event and render what changed.
    pub fn on_event(&mut self, event: RemoteEvent) -> String {
        let delta = match &event {
            RemoteEvent::ContentAppend { delta, .. } => Some(delta.clone()),
            _ => None,
        };

        match self.reconciler.apply_remote(event) {
            // Generated text is streamed fragment by fragment.
            Ok(position) => match delta {
                Some(delta) => delta,
                None => self
                    .reconciler
                    .transcript()
                    .messages()
                    .get(position)
                    .map(|m| format!("\n{}", TranscriptFormatter::format_message(m)))
                    .unwrap_or_default(),
            },
            Err(e) if e.is_lookup_miss() => String::new(),
            Err(e @ (ReconcileError::GenerationFailed(_) | ReconcileError::RemoteNotFound(_))) => {
                format!("\n{}\n", e.to_string().yellow())
            }
            Err(e) => {
                debug!("Dropped event: {}", e);
                String::new()
            }
        }
    }

    async fn sync_draft(&self) {
        let Some(bridge) = &self.bridge else {
            return;
        };
        let text = self.draft.join("\n");
        if let Err(e) = bridge.did_change(&self.draft_uri(), &text).await {
            warn!("Draft sync failed: {}", e);
        }
    }

    async fn complete(&self, position: EditorPosition) -> String {
        let Some(provider) = self.host.provider(&self.config.language_id) else {
            return "Language intelligence is not available\n".to_string();
        };
        let items = provider.provide_completion(&self.draft_uri(), position).await;
        if items.is_empty() {
            return format!("{}\n", "(no suggestions)".dimmed());
        }
        items
            .iter()
            .map(|s| match &s.kind {
                Some(kind) => format!("  {} {}\n", s.label, format!("({})", kind).dimmed()),
                None => format!("  {}\n", s.label),
            })
            .collect()
    }

    async fn hover(&self, position: EditorPosition) -> String {
        let Some(provider) = self.host.provider(&self.config.language_id) else {
            return "Language intelligence is not available\n".to_string();
        };
        match provider.provide_hover(&self.draft_uri(), position).await {
            Some(hover) => hover
                .contents
                .iter()
                .map(|c| format!("{}\n", c.value))
                .collect(),
            None => format!("{}\n", "(nothing to show)".dimmed()),
        }
    }

    fn format_draft(&self) -> String {
        if self.draft.is_empty() {
            return format!("{}\n", "(empty draft)".dimmed());
        }
        self.draft
            .iter()
            .enumerate()
            .map(|(i, line)| format!("{:>3} {} {}\n", i + 1, "│".dimmed(), line))
            .collect()
    }

    fn prompt_label(&self) -> String {
        format!("{} [{}]", self.reconciler.session_id(), self.kind)
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│              Notebook Client                │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("Session: {}", self.reconciler.session_id());
        print!(
            "{}",
            TranscriptFormatter::format_transcript(self.reconciler.transcript().messages())
        );
        println!();
        println!("Type /help for available commands");
        println!();
    }
}

fn help_text() -> String {
    [
        "",
        "Commands:",
        "  <text>                 - Submit using the current kind",
        "  /text|/code|/query [x] - Submit x as that kind, or switch kind",
        "  /kind, /k              - Cycle text -> query -> code",
        "  /show, /s              - Show the transcript",
        "  /draft, /d [line]      - Append a line to the draft cell, or show it",
        "  /clear                 - Clear the draft cell",
        "  /run, /r               - Submit the draft cell as code",
        "  /complete L:C          - Completions at line L, column C of the draft",
        "  /hover L:C             - Hover information in the draft",
        "  /help, /h, /?          - Show this help",
        "  /quit, /exit, /q       - Exit",
        "",
    ]
    .join("\n")
}

async fn next_event(events: &mut Option<mpsc::UnboundedReceiver<RemoteEvent>>) -> Option<RemoteEvent> {
    match events {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

fn spawn_input(
    history: Option<PathBuf>,
    lines: mpsc::UnboundedSender<InputEvent>,
    resume: std_mpsc::Receiver<Option<String>>,
) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        let mut editor = Reedline::create();
        if let Some(path) = history {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            match FileBackedHistory::with_file(HISTORY_CAPACITY, path) {
                Ok(history) => editor = editor.with_history(Box::new(history)),
                Err(e) => debug!("History unavailable: {}", e),
            }
        }

        while let Ok(Some(label)) = resume.recv() {
            let prompt = DefaultPrompt::new(
                DefaultPromptSegment::Basic(label),
                DefaultPromptSegment::Empty,
            );
            let event = match editor.read_line(&prompt) {
                Ok(Signal::Success(line)) => InputEvent::Line(line),
                Ok(Signal::CtrlC) => InputEvent::Interrupted,
                Ok(Signal::CtrlD) => InputEvent::Eof,
                Err(e) => InputEvent::Failed(e.to_string()),
            };
            if lines.send(event).is_err() {
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use notebook_application::{
        EditorHost, LanguageClient, LanguageClientError, SessionTransport,
    };
    use notebook_domain::{CreateRequest, Output};
    use serde_json::{Value, json};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[derive(Default)]
    struct FakeTransport {
        closed: AtomicBool,
        sent: Mutex<Vec<CreateRequest>>,
    }

    #[async_trait]
    impl SessionTransport for FakeTransport {
        fn is_open(&self) -> bool {
            !self.closed.load(Ordering::SeqCst)
        }

        async fn send_create(&self, request: &CreateRequest) -> Result<(), SessionTransportError> {
            self.sent.lock().unwrap().push(request.clone());
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeLanguage {
        notes: Mutex<Vec<(String, Value)>>,
    }

    #[async_trait]
    impl LanguageClient for FakeLanguage {
        async fn call(&self, method: &str, _params: Value) -> Result<Option<Value>, LanguageClientError> {
            match method {
                "textDocument/completion" => Ok(Some(json!([
                    { "label": "append", "kind": 2 },
                    { "label": "abs" }
                ]))),
                "textDocument/hover" => Ok(Some(json!({
                    "contents": { "kind": "markdown", "value": "list.append(x)" }
                }))),
                _ => Ok(None),
            }
        }

        async fn notify(&self, method: &str, params: Value) -> Result<(), LanguageClientError> {
            self.notes.lock().unwrap().push((method.to_string(), params));
            Ok(())
        }

        fn close(&self) {}
    }

    fn repl(transport: Arc<FakeTransport>) -> (NotebookRepl, mpsc::UnboundedSender<RemoteEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let reconciler = SessionReconciler::new("s1", transport);
        (NotebookRepl::new(reconciler, rx, ReplConfig::default()), tx)
    }

    fn text(outcome: Outcome) -> String {
        match outcome {
            Outcome::Continue(text) => colored_free(&text),
            Outcome::Quit => panic!("unexpected quit"),
        }
    }

    fn colored_free(text: &str) -> String {
        crate::output::transcript::strip_ansi(text)
    }

    #[tokio::test]
    async fn test_plain_line_submits_with_current_kind() {
        let transport = Arc::new(FakeTransport::default());
        let (mut repl, _tx) = repl(transport.clone());

        repl.execute(ReplCommand::SetKind(MessageKind::Query)).await;
        let out = text(repl.execute(parse_command("why is the sky blue?")).await);

        assert!(out.contains("[query]"));
        assert!(out.contains("[llm]"));
        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].kind(), MessageKind::Query);
        assert_eq!(repl.reconciler().transcript().len(), 2);
    }

    #[tokio::test]
    async fn test_closed_channel_reports_and_sends_nothing() {
        let transport = Arc::new(FakeTransport::default());
        transport.closed.store(true, Ordering::SeqCst);
        let (mut repl, _tx) = repl(transport.clone());

        let out = text(repl.execute(parse_command("hello")).await);
        assert!(out.contains("nothing was sent"));
        assert!(transport.sent.lock().unwrap().is_empty());
        assert_eq!(repl.reconciler().transcript().len(), 0);
    }

    #[tokio::test]
    async fn test_confirmation_and_output_events_render() {
        let transport = Arc::new(FakeTransport::default());
        let (mut repl, _tx) = repl(transport.clone());

        repl.execute(parse_command("/code print(1)")).await;
        let tmp_id = transport.sent.lock().unwrap()[0].id().to_string();

        let out = colored_free(&repl.on_event(RemoteEvent::Confirmation {
            tmp_id,
            assigned_id: "42".into(),
        }));
        assert!(out.contains("#42 user [code] P"));

        let out = colored_free(&repl.on_event(RemoteEvent::OutputAppend {
            id: "42".into(),
            output: Output::stdout("1\n"),
        }));
        assert!(out.contains("\n1\n"));

        let miss = repl.on_event(RemoteEvent::StatusChange {
            id: "999".into(),
            status: "done".into(),
        });
        assert!(miss.is_empty());
    }

    #[tokio::test]
    async fn test_generation_fragments_stream_raw() {
        let transport = Arc::new(FakeTransport::default());
        let (mut repl, _tx) = repl(transport.clone());

        repl.execute(parse_command("/query hi")).await;
        let placeholder = transport.sent.lock().unwrap()[0]
            .response_id()
            .map(str::to_string)
            .unwrap();
        repl.on_event(RemoteEvent::Confirmation {
            tmp_id: placeholder,
            assigned_id: "8".into(),
        });

        let out = repl.on_event(RemoteEvent::ContentAppend {
            id: "8".into(),
            delta: "Hel".into(),
        });
        assert_eq!(out, "Hel");

        let out = colored_free(&repl.on_event(RemoteEvent::GenerationFailed { id: "8".into() }));
        assert!(out.contains("Generation failed"));
    }

    #[tokio::test]
    async fn test_run_submits_draft_as_code_and_clears_it() {
        let transport = Arc::new(FakeTransport::default());
        let (mut repl, _tx) = repl(transport.clone());

        let out = text(repl.execute(ReplCommand::Run).await);
        assert!(out.contains("Draft is empty"));

        repl.execute(parse_command("/draft x = 1")).await;
        repl.execute(parse_command("/draft print(x)")).await;
        repl.execute(ReplCommand::Run).await;

        let sent = transport.sent.lock().unwrap();
        assert_eq!(sent[0].kind(), MessageKind::Code);
        assert_eq!(sent[0].content(), "x = 1\nprint(x)");
        drop(sent);
        assert!(text(repl.execute(ReplCommand::ShowDraft).await).contains("(empty draft)"));
    }

    #[tokio::test]
    async fn test_language_commands_use_installed_provider() {
        let transport = Arc::new(FakeTransport::default());
        let (repl, _tx) = repl(transport);
        let host = repl.editor_host();
        let bridge = Arc::new(LanguageBridge::new(host.clone() as Arc<dyn EditorHost>));
        let language = Arc::new(FakeLanguage::default());
        bridge.register("python", &repl.draft_uri(), language.clone());
        let mut repl = repl.with_language(bridge);

        repl.execute(parse_command("/draft [].ap")).await;
        {
            let notes = language.notes.lock().unwrap();
            assert_eq!(notes[0].0, "textDocument/didChange");
            assert_eq!(notes[0].1["textDocument"]["uri"], "s1_pending");
            assert_eq!(notes[0].1["contentChanges"][0]["text"], "[].ap");
        }

        let out = text(repl.execute(parse_command("/complete 1:6")).await);
        assert!(out.contains("append"));
        assert!(out.contains("abs"));

        let out = text(repl.execute(parse_command("/hover 1:5")).await);
        assert!(out.contains("list.append(x)"));
    }

    #[tokio::test]
    async fn test_language_commands_without_provider() {
        let (mut repl, _tx) = repl(Arc::new(FakeTransport::default()));
        let out = text(repl.execute(parse_command("/complete 1:1")).await);
        assert!(out.contains("not available"));
    }

    #[tokio::test]
    async fn test_kind_cycle_and_quit() {
        let (mut repl, _tx) = repl(Arc::new(FakeTransport::default()));
        assert_eq!(repl.kind(), MessageKind::Text);
        repl.execute(ReplCommand::CycleKind).await;
        assert_eq!(repl.kind(), MessageKind::Query);
        repl.execute(ReplCommand::CycleKind).await;
        assert_eq!(repl.kind(), MessageKind::Code);
        assert_eq!(repl.execute(ReplCommand::Quit).await, Outcome::Quit);
    }
}
