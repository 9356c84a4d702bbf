//! Dashboard controller.
//!
//! [`Dashboard`] owns the history store and the current view. Fetch results
//! are applied here, on the single controlling task, so the store is never
//! shared across threads.

mod event_loop;

pub use event_loop::{Action, TerminalGuard, key_action, run_dashboard};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use crate::config::Config;
use crate::error::FetchError;
use crate::feed::{EarthquakeEvent, FeedClient, FeedConfig};
use crate::history::{HistoryStore, MergeReport};
use crate::render::terminal::StatusLine;
use crate::render::{DashboardView, RenderConfig};

/// Result of one background fetch, posted back to the UI loop.
pub type FetchOutcome = Result<Vec<EarthquakeEvent>, FetchError>;

/// State behind the dashboard: history, latest view, status message.
pub struct Dashboard {
    store: HistoryStore,
    client: FeedClient,
    limit: usize,
    render: RenderConfig,
    view: DashboardView,
    status: StatusLine,
    fetching: bool,
    last_merge: Option<MergeReport>,
}

impl Dashboard {
    /// Load history from the configured path and build the initial view.
    pub fn new(config: &Config) -> Self {
        Self::with_parts(
            HistoryStore::load(&config.history_path),
            FeedClient::new(FeedConfig::from(config)),
            config.limit,
            RenderConfig::default(),
        )
    }

    pub fn with_parts(
        store: HistoryStore,
        client: FeedClient,
        limit: usize,
        render: RenderConfig,
    ) -> Self {
        let view = DashboardView::build(store.events(), &render);
        Self {
            store,
            client,
            limit,
            render,
            view,
            status: StatusLine::info("Loading…"),
            fetching: false,
            last_merge: None,
        }
    }

    pub fn view(&self) -> &DashboardView {
        &self.view
    }

    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    pub fn store(&self) -> &HistoryStore {
        &self.store
    }

    pub fn is_fetching(&self) -> bool {
        self.fetching
    }

    pub fn last_merge(&self) -> Option<MergeReport> {
        self.last_merge
    }

    /// Spawn a background fetch whose outcome is sent on `tx`.
    ///
    /// Returns `false` without doing anything while a fetch is in flight.
    pub fn request_refresh(&mut self, tx: &mpsc::Sender<FetchOutcome>) -> bool {
        if self.fetching {
            tracing::debug!("Refresh ignored, fetch already in flight");
            return false;
        }

        self.fetching = true;
        self.status = StatusLine::info("Fetching…");

        let client = self.client.clone();
        let limit = self.limit;
        let tx = tx.clone();
        tokio::spawn(async move {
            let outcome = client.fetch(limit).await;
            if tx.send(outcome).await.is_err() {
                tracing::debug!("Dashboard closed before fetch completed");
            }
        });
        true
    }

    /// Fetch in the current task and apply the result.
    pub async fn refresh(&mut self) {
        self.fetching = true;
        let outcome = self.client.fetch(self.limit).await;
        self.apply_fetch(outcome, Utc::now());
    }

    /// Merge a fetch outcome into history, persist it and rebuild the view.
    ///
    /// A failed fetch leaves the store untouched. A failed save is reported
    /// as a warning; the in-memory history stays usable.
    pub fn apply_fetch(&mut self, outcome: FetchOutcome, now: DateTime<Utc>) {
        self.fetching = false;

        let events = match outcome {
            Ok(events) => events,
            Err(e) => {
                tracing::warn!("Fetch failed: {}", e);
                self.status = StatusLine::error(format!("Failed to fetch data: {}", e));
                return;
            }
        };

        let report = self.store.merge(events);
        self.last_merge = Some(report);
        self.view = DashboardView::build(self.store.events(), &self.render);

        let updated = format!("Last updated: {} UTC", now.format("%H:%M:%S"));
        self.status = match self.store.save() {
            Ok(()) => StatusLine::info(format!("{} (+{} new)", updated, report.inserted)),
            Err(e) => {
                tracing::warn!("Failed to save history: {}", e);
                StatusLine::warning(format!("{}, history not saved: {}", updated, e))
            }
        };
    }
}
