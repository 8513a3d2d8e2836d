//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for notebook-client
#[derive(Parser, Debug)]
#[command(name = "notebook-client")]
#[command(author, version, about = "Terminal client for notebook sessions")]
#[command(long_about = r#"
Notebook client connects to a notebook server session and lets you add text,
code cells and LLM queries from the terminal. Code runs on the server; its
status and output stream back into the transcript as they arrive.

Configuration files are loaded from (in priority order):
1. NOTEBOOK_* environment variables
2. --config <path>     Explicit config file
3. ./notebook.toml     Project-level config
4. ~/.config/notebook-client/config.toml   Global config

Example:
  notebook-client --new
  notebook-client --session 3f2a9c
  notebook-client --server https://nb.example.com --recent
"#)]
pub struct Cli {
    /// Notebook server base URL (overrides server.base_url)
    #[arg(short, long, value_name = "URL")]
    pub server: Option<String>,

    /// Open an existing session
    #[arg(long, value_name = "ID", conflicts_with = "new")]
    pub session: Option<String>,

    /// Create a new session
    #[arg(short, long)]
    pub new: bool,

    /// List recently used sessions and exit
    #[arg(long)]
    pub recent: bool,

    /// Do not connect the language-intelligence channel
    #[arg(long)]
    pub no_language: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Write diagnostics to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_session_and_verbosity() {
        let cli = Cli::parse_from(["notebook-client", "--session", "abc", "-vv"]);
        assert_eq!(cli.session.as_deref(), Some("abc"));
        assert_eq!(cli.verbose, 2);
        assert!(!cli.new);
    }

    #[test]
    fn test_session_conflicts_with_new() {
        let result = Cli::try_parse_from(["notebook-client", "--session", "abc", "--new"]);
        assert!(result.is_err());
    }
}
