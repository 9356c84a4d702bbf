//! quakeboard - live earthquake dashboard.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use quakeboard::app::{Dashboard, TerminalGuard, run_dashboard};
use quakeboard::cli::{Cli, Command, run_fetch, show_path};
use quakeboard::config::Config;
use quakeboard::history::paths::default_log_path;

const DEFAULT_FILTER: &str = "quakeboard=info";

/// Log to stderr for headless commands.
fn init_stderr_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Log to a file while the dashboard owns the terminal.
fn init_file_tracing(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = cli.apply(Config::from_env()?);

    match cli.command() {
        Command::Dashboard => {
            if let Err(e) = init_file_tracing(&default_log_path()) {
                eprintln!("warning: file logging disabled: {}", e);
            }
            tracing::info!(
                "Starting dashboard, feed {}, history {}",
                config.feed_url,
                config.history_path.display()
            );

            // Release builds abort on panic, so Drop never restores the terminal.
            let default_hook = std::panic::take_hook();
            std::panic::set_hook(Box::new(move |info| {
                TerminalGuard::restore();
                default_hook(info);
            }));

            run_dashboard(Dashboard::new(&config)).await
        }
        Command::Fetch => {
            init_stderr_tracing();
            run_fetch(&config).await
        }
        Command::Path => show_path(&config.history_path),
    }
}
