//! Presentation-level configuration
//!
//! What the REPL needs from the merged file configuration.

use notebook_domain::MessageKind;
use std::path::PathBuf;

/// REPL configuration for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplConfig {
    /// Path to history file; `None` uses the per-user data directory
    pub history_file: Option<PathBuf>,
    /// Kind a plain input line is submitted as
    pub default_kind: MessageKind,
    /// Language whose provider serves `/complete` and `/hover`
    pub language_id: String,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            history_file: None,
            default_kind: MessageKind::Text,
            language_id: "python".to_string(),
        }
    }
}

impl ReplConfig {
    /// Resolve the history file, falling back to
    /// `<data_dir>/notebook-client/history.txt`.
    pub fn history_path(&self) -> Option<PathBuf> {
        self.history_file.clone().or_else(|| {
            dirs::data_dir().map(|p| p.join("notebook-client").join("history.txt"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_history_file_wins() {
        let config = ReplConfig {
            history_file: Some(PathBuf::from("/tmp/nb-history")),
            ..Default::default()
        };
        assert_eq!(config.history_path(), Some(PathBuf::from("/tmp/nb-history")));
    }

    #[test]
    fn test_defaults() {
        let config = ReplConfig::default();
        assert_eq!(config.default_kind, MessageKind::Text);
        assert_eq!(config.language_id, "python");
        if let Some(path) = config.history_path() {
            assert!(path.ends_with("notebook-client/history.txt"));
        }
    }
}
