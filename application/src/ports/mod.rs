//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod editor_host;
pub mod language_client;
pub mod session_directory;
pub mod session_logger;
pub mod session_transport;
