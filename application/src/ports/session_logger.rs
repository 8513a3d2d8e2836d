//! Port for structured session logging.
//!
//! Defines the [`SessionLogger`] trait for recording session activity
//! (outbound creates, applied remote events, dropped-event diagnostics) to a
//! structured log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostic messages, while this port captures the session
//! traffic in a machine-readable format (JSONL).

use serde_json::Value;

/// A structured session event for logging.
pub struct SessionLogEvent {
    /// Event type identifier (e.g., "create_sent", "remote_event", "diagnostic").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl SessionLogEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging session events to a structured log.
///
/// The `log` method is synchronous and non-fallible; logging failures never
/// disturb the session.
pub trait SessionLogger: Send + Sync {
    fn log(&self, event: SessionLogEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoSessionLogger;

impl SessionLogger for NoSessionLogger {
    fn log(&self, _event: SessionLogEvent) {}
}
