//! Presentation layer for notebook-client
//!
//! This crate contains CLI definitions, the transcript formatter and the
//! interactive notebook REPL.

pub mod cli;
pub mod config;
pub mod notebook;
pub mod output;

// Re-export commonly used types
pub use cli::commands::Cli;
pub use config::ReplConfig;
pub use notebook::{NotebookRepl, ReplEditorHost};
pub use output::transcript::{TranscriptFormatter, strip_ansi};
