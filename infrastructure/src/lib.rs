//! Infrastructure layer for notebook-client
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: WebSocket channels, JSON-RPC correlation,
//! the session envelope codec, the HTTP session directory, JSONL session
//! logging and configuration file loading.

pub mod config;
pub mod endpoint;
pub mod error;
pub mod language;
pub mod logging;
pub mod rpc;
pub mod session;
pub mod transport;

// Re-export commonly used types
pub use config::{ConfigLoader, ConfigValidationError, FileConfig};
pub use endpoint::{language_endpoint, session_endpoint};
pub use error::{CorrelatorError, Result, TransportError};
pub use language::LanguageChannel;
pub use logging::JsonlSessionLogger;
pub use rpc::RequestCorrelator;
pub use session::{HttpSessionDirectory, SessionChannel, decode_envelope};
pub use transport::{ConnectionState, EnvelopeHandler, EnvelopeSink, WsTransport};
