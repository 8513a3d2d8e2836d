//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod language;
mod logging;
mod output;
mod repl;
mod server;

pub use language::FileLanguageConfig;
pub use logging::FileLoggingConfig;
pub use output::FileOutputConfig;
pub use repl::FileReplConfig;
pub use server::FileServerConfig;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("server.base_url is empty")]
    EmptyBaseUrl,

    #[error("server.base_url must start with http:// or https:// (got '{0}')")]
    UnsupportedScheme(String),

    #[error("server.request_timeout_seconds must be greater than zero")]
    ZeroTimeout,

    #[error("repl.default_kind cannot be '{0}'")]
    InvalidDefaultKind(String),

    #[error("language.language_id is empty")]
    EmptyLanguageId,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Notebook server settings
    pub server: FileServerConfig,
    /// Language intelligence settings
    pub language: FileLanguageConfig,
    /// Session log settings
    pub logging: FileLoggingConfig,
    /// REPL settings
    pub repl: FileReplConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the configuration, returning every problem found.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut issues = Vec::new();

        let base = self.server.base_url.trim();
        if base.is_empty() {
            issues.push(ConfigValidationError::EmptyBaseUrl);
        } else if !(base.starts_with("http://") || base.starts_with("https://")) {
            issues.push(ConfigValidationError::UnsupportedScheme(base.to_string()));
        }

        if self.server.request_timeout_seconds == Some(0) {
            issues.push(ConfigValidationError::ZeroTimeout);
        }

        if !self.repl.default_kind.is_manual() {
            issues.push(ConfigValidationError::InvalidDefaultKind(
                self.repl.default_kind.to_string(),
            ));
        }

        if self.language.enabled && self.language.language_id.trim().is_empty() {
            issues.push(ConfigValidationError::EmptyLanguageId);
        }

        issues
    }
}
