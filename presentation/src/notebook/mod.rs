//! Interactive notebook session

pub mod command;
pub mod editor;
pub mod repl;

pub use command::{ReplCommand, parse_command, parse_position};
pub use editor::ReplEditorHost;
pub use repl::{NotebookRepl, Outcome};
