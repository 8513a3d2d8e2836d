//! Duplex message channels

pub mod websocket;

pub use websocket::{ConnectionState, EnvelopeHandler, EnvelopeSink, WsTransport};
