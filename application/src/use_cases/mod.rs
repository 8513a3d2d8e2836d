//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod language_bridge;
pub mod reconcile_session;
