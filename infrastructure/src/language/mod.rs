//! Language-intelligence adapters

pub mod channel;

pub use channel::LanguageChannel;
