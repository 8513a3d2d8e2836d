//! JSON-RPC plumbing for the language-intelligence channel

pub mod classify;
pub mod correlator;
pub mod protocol;

pub use correlator::RequestCorrelator;
