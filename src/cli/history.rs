//! Headless commands: one-shot fetch and history path.

use std::io::Write;
use std::path::Path;

use chrono::{DateTime, TimeDelta, Utc};

use crate::app::Dashboard;
use crate::config::Config;
use crate::history::HistoryStore;
use crate::render::{DashboardView, TableRow};
use crate::render::terminal::StatusLevel;

/// Fetch once, merge, save, and print the table to stdout.
pub async fn run_fetch(config: &Config) -> anyhow::Result<()> {
    let mut dashboard = Dashboard::new(config);
    dashboard.refresh().await;

    let mut stdout = std::io::stdout().lock();
    print_table(&mut stdout, dashboard.view())?;
    writeln!(stdout)?;

    let status = dashboard.status();
    match status.level {
        StatusLevel::Error => anyhow::bail!("{}", status.text),
        StatusLevel::Warning => eprintln!("warning: {}", status.text),
        StatusLevel::Info => {}
    }

    let merge = dashboard.last_merge().unwrap_or_default();
    writeln!(
        stdout,
        "{} new, {} updated, {} events in history ({})",
        merge.inserted,
        merge.updated,
        merge.total,
        Utc::now().format("%H:%M:%S UTC")
    )?;
    Ok(())
}

/// Write the event table as plain text.
pub fn print_table<W: Write>(out: &mut W, view: &DashboardView) -> std::io::Result<()> {
    writeln!(out, "{}", TableRow::header())?;
    for row in &view.table {
        writeln!(out, "{}", row)?;
    }
    Ok(())
}

/// Print where the history lives and what it currently holds.
pub fn show_path(path: &Path) -> anyhow::Result<()> {
    describe_history(&mut std::io::stdout().lock(), path, Utc::now())?;
    Ok(())
}

fn describe_history<W: Write>(out: &mut W, path: &Path, now: DateTime<Utc>) -> std::io::Result<()> {
    writeln!(out, "{}", path.display())?;

    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(_) => return writeln!(out, "  (no history saved yet)"),
    };

    let store = HistoryStore::load(path);
    writeln!(out, "  Events: {} ({} bytes)", store.len(), metadata.len())?;

    if let Ok(modified) = metadata.modified() {
        let saved_at = DateTime::<Utc>::from(modified);
        let age = now.signed_duration_since(saved_at).max(TimeDelta::zero());
        writeln!(
            out,
            "  Saved: {} UTC ({} min ago)",
            saved_at.format("%Y-%m-%d %H:%M:%S"),
            age.num_minutes()
        )?;
    }

    if let Some(latest) = store.events().map(|e| e.time).max() {
        writeln!(out, "  Latest event: {} UTC", latest.format("%Y-%m-%d %H:%M:%S"))?;
    }
    Ok(())
}
