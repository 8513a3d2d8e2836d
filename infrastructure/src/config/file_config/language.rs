//! Language intelligence configuration from TOML (`[language]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLanguageConfig {
    /// Connect the language-intelligence channel
    pub enabled: bool,
    /// Language identifier the completion and hover provider is installed for
    pub language_id: String,
}

impl Default for FileLanguageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            language_id: "python".to_string(),
        }
    }
}
