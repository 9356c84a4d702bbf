//! History persistence layer.
//!
//! Keeps every event seen so far in a flat JSON file keyed by event id, so
//! the charts accumulate across runs. The file is a best-effort cache: a
//! missing or corrupt file simply starts an empty history.

pub mod paths;
mod store;

pub use store::{HistoryStore, MergeReport};
