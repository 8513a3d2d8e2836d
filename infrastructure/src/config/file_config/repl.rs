//! REPL configuration from TOML (`[repl]` section)

use notebook_domain::MessageKind;
use serde::{Deserialize, Serialize};

/// Raw REPL configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReplConfig {
    /// Path to history file
    pub history_file: Option<String>,
    /// Kind a new entry is composed as
    pub default_kind: MessageKind,
}

impl Default for FileReplConfig {
    fn default() -> Self {
        Self {
            history_file: None,
            default_kind: MessageKind::Text,
        }
    }
}
