//! Language-intelligence value types.
//!
//! - [`position`]: editor (1-based) and protocol (0-based) positions, cell URIs
//! - [`completion`]: completion items and editor suggestions
//! - [`hover`]: hover normalization

pub mod completion;
pub mod hover;
pub mod position;
