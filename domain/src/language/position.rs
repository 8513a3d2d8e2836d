//! Cursor positions and document URIs.
//!
//! Editors count lines and columns from 1; the language protocol counts
//! both from 0.

use serde::{Deserialize, Serialize};

/// Position as reported by the editing surface (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorPosition {
    pub line_number: u32,
    pub column: u32,
}

impl EditorPosition {
    pub fn new(line_number: u32, column: u32) -> Self {
        Self {
            line_number,
            column,
        }
    }

    /// Convert to the protocol convention. A 0 coordinate clamps to 0.
    pub fn to_protocol(self) -> ProtocolPosition {
        ProtocolPosition {
            line: self.line_number.saturating_sub(1),
            character: self.column.saturating_sub(1),
        }
    }
}

/// `{ line, character }` as sent on the wire (0-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolPosition {
    pub line: u32,
    pub character: u32,
}

/// Document URI of a submitted code cell.
pub fn cell_uri(session_id: &str, cell_id: &str) -> String {
    format!("{}_{}", session_id, cell_id)
}

/// Document URI of the cell currently being composed.
pub fn draft_cell_uri(session_id: &str) -> String {
    format!("{}_pending", session_id)
}
