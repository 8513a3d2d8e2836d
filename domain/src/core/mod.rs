//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`] : precondition violations
//! - [`error::ReconcileError`] : reasons a remote event was dropped

pub mod error;
