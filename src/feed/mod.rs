//! Earthquake feed access.
//!
//! Fetches a GeoJSON `FeatureCollection` from the configured endpoint and
//! turns its features into [`EarthquakeEvent`]s.

mod client;
mod types;

pub use client::{FeedClient, FeedConfig};
pub use types::{Coordinates, EarthquakeEvent, parse_feed};
