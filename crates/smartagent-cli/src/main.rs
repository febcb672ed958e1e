use anyhow::{Context, Result};
use clap::Parser;
use smartagent_core::{FileSnapshotStore, MemorySnapshotStore, Settings, SnapshotStore};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

mod app;
mod commands;
mod notifier;
mod theme;

#[derive(Parser)]
#[command(name = "smartagent")]
#[command(about = "Smart Agent - chat with your reminder assistant")]
#[command(version)]
struct Cli {
    /// Send a single message, print the reply and exit
    #[arg(short, long)]
    prompt: Option<String>,

    /// Check for due reminders once and exit
    #[arg(long, conflicts_with = "prompt")]
    check_reminders: bool,

    /// Agent backend base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Directory for the saved conversation
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Keep the conversation in memory only
    #[arg(long)]
    ephemeral: bool,

    /// Never show reminder notifications
    #[arg(long)]
    no_notify: bool,

    /// Config file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Color theme (dark, tokyo-night, dracula)
    #[arg(long, default_value = "dark")]
    theme: String,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn is_interactive(&self) -> bool {
        self.prompt.is_none() && !self.check_reminders
    }
}

fn init_logging(cli: &Cli) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    if let Some(path) = &cli.log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else if !cli.is_interactive() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
    // Without a log file the chat view logs nothing: it owns the terminal.
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let mut settings = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };
    settings.apply_env();

    if let Some(ref url) = cli.base_url {
        settings.backend.base_url = url.clone();
    }
    if let Some(ref dir) = cli.data_dir {
        settings.storage.data_dir = Some(dir.clone());
    }
    if cli.no_notify {
        settings.notifications.enabled = false;
    }

    let store: Arc<dyn SnapshotStore> = if cli.ephemeral {
        Arc::new(MemorySnapshotStore::new())
    } else {
        Arc::new(FileSnapshotStore::with_dir(settings.data_dir())?)
    };

    if let Some(prompt) = cli.prompt.as_deref() {
        app::run_single_prompt(&settings, store, prompt).await?;
    } else if cli.check_reminders {
        app::run_reminder_check(&settings, store).await?;
    } else {
        app::run_tui(settings, store, &cli.theme).await?;
    }

    Ok(())
}
