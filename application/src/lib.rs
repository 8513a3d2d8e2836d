//! Application layer for notebook-client
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::BehaviorConfig;
pub use ports::{
    editor_host::{EditorHost, LanguageProvider, NoEditorHost},
    language_client::{LanguageClient, LanguageClientError},
    session_directory::{DirectoryError, SessionDirectory},
    session_logger::{NoSessionLogger, SessionLogEvent, SessionLogger},
    session_transport::{SessionTransport, SessionTransportError},
};
pub use use_cases::language_bridge::LanguageBridge;
pub use use_cases::reconcile_session::{CreatedIds, SessionReconciler, SubmitError};
