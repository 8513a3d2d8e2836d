//! Configuration file loading for notebook-client
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `NOTEBOOK_` environment variables (`NOTEBOOK_SERVER__BASE_URL`, ...)
//! 2. `--config <path>` specified file
//! 3. Project root: `./notebook.toml` or `./.notebook.toml`
//! 4. Global: `$XDG_CONFIG_HOME/notebook-client/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileLanguageConfig, FileLoggingConfig, FileOutputConfig,
    FileReplConfig, FileServerConfig,
};
pub use loader::ConfigLoader;
