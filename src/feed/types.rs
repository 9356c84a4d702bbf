//! Event model and GeoJSON decoding.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FetchError;

const UNKNOWN_LOCATION: &str = "Unknown location";

/// One observed seismic event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarthquakeEvent {
    pub id: String,
    pub time: DateTime<Utc>,
    #[serde(default)]
    pub magnitude: Option<f64>,
    pub location: String,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
}

/// Epicenter position. Depth is in kilometres when the feed reports it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub depth_km: Option<f64>,
}

impl EarthquakeEvent {
    /// Relative seismic energy, `10^(1.5 * magnitude)`.
    ///
    /// This is an index for comparing events, not an absolute value in joules.
    pub fn energy(&self) -> Option<f64> {
        self.magnitude.map(|m| 10f64.powf(1.5 * m))
    }

    pub fn depth_km(&self) -> Option<f64> {
        self.coordinates.and_then(|c| c.depth_km)
    }
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    /// Kept raw so one unreadable feature does not sink the whole body.
    features: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    id: Option<String>,
    /// GeoJSON allows `"properties": null`.
    #[serde(default)]
    properties: Option<Properties>,
    #[serde(default)]
    geometry: Option<Geometry>,
}

#[derive(Debug, Default, Deserialize)]
struct Properties {
    #[serde(default)]
    mag: Option<f64>,
    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    time: Option<i64>,
    #[serde(default)]
    place: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    /// `[longitude, latitude, depth]`, any of which may be null.
    #[serde(default)]
    coordinates: Vec<Option<f64>>,
}

impl Feature {
    fn into_event(self) -> Option<EarthquakeEvent> {
        let id = match self.id.filter(|id| !id.is_empty()) {
            Some(id) => id,
            None => {
                tracing::debug!("Skipping feature without an id");
                return None;
            }
        };

        let properties = self.properties.unwrap_or_default();

        let Some(time) = properties
            .time
            .and_then(DateTime::<Utc>::from_timestamp_millis)
        else {
            tracing::debug!(id = %id, "Skipping feature without a usable time");
            return None;
        };

        let coordinates = self.geometry.and_then(|g| match g.coordinates.as_slice() {
            [Some(lon), Some(lat), rest @ ..] => Some(Coordinates {
                latitude: *lat,
                longitude: *lon,
                depth_km: rest.first().copied().flatten(),
            }),
            _ => None,
        });

        let location = properties
            .place
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_LOCATION.to_string());

        Some(EarthquakeEvent {
            id,
            time,
            magnitude: properties.mag,
            location,
            coordinates,
        })
    }
}

/// Decode a GeoJSON feed body into events, most recent first.
///
/// Features without an id or a timestamp, or with fields of the wrong type,
/// are skipped. A body that is not a feature collection is an error.
pub fn parse_feed(body: &str) -> Result<Vec<EarthquakeEvent>, FetchError> {
    let collection: FeatureCollection = serde_json::from_str(body)?;
    let total = collection.features.len();

    let mut events: Vec<EarthquakeEvent> = collection
        .features
        .into_iter()
        .filter_map(|raw| match serde_json::from_value::<Feature>(raw) {
            Ok(feature) => feature.into_event(),
            Err(e) => {
                tracing::debug!("Skipping unreadable feature: {}", e);
                None
            }
        })
        .collect();
    events.sort_by(|a, b| b.time.cmp(&a.time));

    if events.len() < total {
        tracing::debug!(
            "Decoded {} of {} features ({} skipped)",
            events.len(),
            total,
            total - events.len()
        );
    }

    Ok(events)
}
