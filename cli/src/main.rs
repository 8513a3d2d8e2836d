//! CLI entrypoint for notebook-client
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use notebook_application::{
    BehaviorConfig, EditorHost, LanguageBridge, LanguageClient, SessionDirectory,
    SessionReconciler,
};
use notebook_domain::{Session, draft_cell_uri};
use notebook_infrastructure::{
    ConfigLoader, FileConfig, HttpSessionDirectory, JsonlSessionLogger, LanguageChannel,
    SessionChannel, language_endpoint, session_endpoint,
};
use notebook_presentation::{Cli, NotebookRepl, ReplConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging(&cli)?;

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };
    let issues = config.validate();
    if !issues.is_empty() {
        for issue in &issues {
            eprintln!("config: {}", issue);
        }
        bail!("Invalid configuration ({} issue(s))", issues.len());
    }

    if !config.output.color {
        colored::control::set_override(false);
    }

    let base_url = cli
        .server
        .clone()
        .unwrap_or_else(|| config.server.base_url.clone());
    info!("Starting notebook-client against {}", base_url);

    // === Dependency Injection ===
    let directory = HttpSessionDirectory::new(base_url.clone());

    if cli.recent {
        let ids = directory.recent_sessions().await?;
        if ids.is_empty() {
            println!("No recent sessions");
        }
        for id in ids {
            println!("{}", id);
        }
        return Ok(());
    }

    let session = open_session(&cli, &directory).await?;
    let session_id = session.id().to_string();

    let (channel, events) = SessionChannel::connect(&session_endpoint(&base_url, &session_id))
        .await
        .with_context(|| format!("Failed to connect to session {}", session_id))?;
    let channel = Arc::new(channel);

    let mut reconciler = SessionReconciler::from_session(session, channel.clone());
    if let Some(path) = &config.logging.session_log
        && let Some(logger) = JsonlSessionLogger::open(path)
    {
        reconciler = reconciler.with_session_logger(Arc::new(logger));
    }

    let repl_config = repl_config(&config);
    let mut repl = NotebookRepl::new(reconciler, events, repl_config);

    let mut language = None;
    if config.language.enabled && !cli.no_language {
        match LanguageChannel::connect(&language_endpoint(&base_url, &session_id)).await {
            Ok(client) => {
                let client = Arc::new(client);
                let host: Arc<dyn EditorHost> = repl.editor_host();
                let bridge = Arc::new(LanguageBridge::new(host).with_behavior(
                    BehaviorConfig::from_timeout_seconds(config.server.request_timeout_seconds),
                ));
                bridge.register(
                    &config.language.language_id,
                    &draft_cell_uri(&session_id),
                    client.clone(),
                );
                repl = repl.with_language(bridge);
                language = Some(client);
            }
            Err(e) => warn!("Language intelligence unavailable: {}", e),
        }
    }

    repl.run().await;

    channel.close();
    if let Some(client) = language {
        client.close();
    }

    Ok(())
}

async fn open_session(cli: &Cli, directory: &HttpSessionDirectory) -> Result<Session> {
    match &cli.session {
        Some(id) => directory
            .fetch_session(id)
            .await
            .with_context(|| format!("Failed to open session {}", id)),
        _ => {
            let session = directory
                .create_session()
                .await
                .context("Failed to create session")?;
            info!("Created session {}", session.id());
            Ok(session)
        }
    }
}

fn repl_config(config: &FileConfig) -> ReplConfig {
    ReplConfig {
        history_file: config.repl.history_file.as_ref().map(PathBuf::from),
        default_kind: config.repl.default_kind,
        language_id: config.language.language_id.clone(),
    }
}

/// Initialize logging based on verbosity level. `RUST_LOG` wins when set.
fn init_logging(cli: &Cli) -> Result<Option<WorkerGuard>> {
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let Some(path) = &cli.log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
        return Ok(None);
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let Some(file_name) = path.file_name() else {
        bail!("Invalid log file path: {}", path.display());
    };
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(writer)
        .init();
    Ok(Some(guard))
}
