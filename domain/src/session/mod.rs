//! Remote session domain.
//!
//! - [`entities::Session`] : a session identifier with its ordered messages

pub mod entities;
