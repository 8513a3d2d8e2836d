//! Structured session logging.
//!
//! Provides [`JsonlSessionLogger`], a JSONL file writer that implements
//! the [`SessionLogger`](notebook_application::SessionLogger) port.

mod session_log;

pub use session_log::JsonlSessionLogger;
