//! Notebook transcript domain.
//!
//! - [`entities::Message`]: one transcript entry (text, code, query, llm)
//! - [`output::Output`]: code cell output records
//! - [`transcript::Transcript`]: ordered, append-only message log with id index
//! - [`event::RemoteEvent`]: remote state changes applied to a transcript
//! - [`request::CreateRequest`]: outbound creation envelope

pub mod entities;
pub mod event;
pub mod output;
pub mod request;
pub mod transcript;
