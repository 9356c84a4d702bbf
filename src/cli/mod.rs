//! Command-line interface.

mod history;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;

pub use history::{print_table, run_fetch, show_path};

#[derive(Parser, Debug)]
#[command(name = "quakeboard", version, about = "Live earthquake dashboard")]
pub struct Cli {
    /// GeoJSON feed to fetch from
    #[arg(long, global = true, env = "QUAKEBOARD_FEED_URL")]
    pub feed_url: Option<String>,

    /// Maximum number of events kept from one fetch
    #[arg(long, global = true, env = "QUAKEBOARD_LIMIT")]
    pub limit: Option<usize>,

    /// History file location (defaults to the per-user data directory)
    #[arg(long, global = true, env = "QUAKEBOARD_HISTORY_FILE")]
    pub history_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open the interactive dashboard (default)
    Dashboard,

    /// Fetch once, merge into history and print the table
    Fetch,

    /// Show the history file path
    Path,
}

impl Cli {
    /// Apply command-line overrides on top of an env-derived config.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(url) = &self.feed_url {
            config.feed_url = url.clone();
        }
        if let Some(limit) = self.limit.filter(|n| *n > 0) {
            config.limit = limit;
        }
        if let Some(path) = &self.history_file {
            config.history_path = path.clone();
        }
        config
    }

    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Dashboard)
    }
}
