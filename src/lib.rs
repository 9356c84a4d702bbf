//! Earthquake dashboard.
//!
//! Fetches recent events from a GeoJSON feed, merges them into a local
//! history file, and renders a table plus magnitude and energy charts in the
//! terminal.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod feed;
pub mod history;
pub mod render;

pub use config::Config;
pub use error::{ConfigError, FetchError, HistoryError};
pub use feed::{Coordinates, EarthquakeEvent, FeedClient};
pub use history::{HistoryStore, MergeReport};
pub use render::{DashboardView, RenderConfig};
