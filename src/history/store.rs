//! JSON-file store for previously seen events.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::HistoryError;
use crate::feed::EarthquakeEvent;

/// Outcome of merging a batch of fetched events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Ids that were not in the store before.
    pub inserted: usize,
    /// Ids that were present and got overwritten with the fresher record.
    pub updated: usize,
    /// Size of the store after the merge.
    pub total: usize,
}

/// Mapping from event id to event, persisted as a single JSON object.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
    events: BTreeMap<String, EarthquakeEvent>,
}

impl HistoryStore {
    /// Create an empty store that will persist to `path`.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            events: BTreeMap::new(),
        }
    }

    /// Load the store from disk.
    ///
    /// Never fails: a missing file, an unreadable file, or invalid JSON all
    /// produce an empty store.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        let data = match std::fs::read_to_string(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No history file at {}, starting empty", path.display());
                return Self::empty(path);
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to read history file {}: {}, starting empty",
                    path.display(),
                    e
                );
                return Self::empty(path);
            }
        };

        match serde_json::from_str::<BTreeMap<String, EarthquakeEvent>>(&data) {
            Ok(stored) => {
                // Keys in a hand-edited file may not match the records.
                let events: BTreeMap<String, EarthquakeEvent> = stored
                    .into_values()
                    .map(|event| (event.id.clone(), event))
                    .collect();
                tracing::info!(
                    "Loaded {} events from {}",
                    events.len(),
                    path.display()
                );
                Self { path, events }
            }
            Err(e) => {
                tracing::warn!(
                    "Ignoring corrupt history file {}: {}",
                    path.display(),
                    e
                );
                Self::empty(path)
            }
        }
    }

    /// Merge fetched events into the store, last write wins.
    ///
    /// An id already present is overwritten so revised magnitudes replace
    /// earlier estimates. Merging the same batch twice leaves the store
    /// unchanged in size.
    pub fn merge<I>(&mut self, events: I) -> MergeReport
    where
        I: IntoIterator<Item = EarthquakeEvent>,
    {
        let mut report = MergeReport::default();

        for event in events {
            match self.events.insert(event.id.clone(), event) {
                Some(_) => report.updated += 1,
                None => report.inserted += 1,
            }
        }

        report.total = self.events.len();
        tracing::debug!(
            inserted = report.inserted,
            updated = report.updated,
            total = report.total,
            "Merged fetched events into history"
        );
        report
    }

    /// Write the full store back to its file, replacing previous content.
    pub fn save(&self) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| HistoryError::Io {
                path: parent.display().to_string(),
                source,
            })?;
        }

        let json = serde_json::to_string_pretty(&self.events)?;
        std::fs::write(&self.path, json).map_err(|source| HistoryError::Io {
            path: self.path.display().to_string(),
            source,
        })?;

        tracing::debug!(
            "Saved {} events to {}",
            self.events.len(),
            self.path.display()
        );
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All retained events, ordered by id.
    pub fn events(&self) -> impl Iterator<Item = &EarthquakeEvent> {
        self.events.values()
    }

    pub fn get(&self, id: &str) -> Option<&EarthquakeEvent> {
        self.events.get(id)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn event(id: &str, mag: Option<f64>, millis: i64) -> EarthquakeEvent {
        EarthquakeEvent {
            id: id.to_string(),
            time: DateTime::<Utc>::from_timestamp_millis(millis).unwrap(),
            magnitude: mag,
            location: format!("near {}", id),
            coordinates: None,
        }
    }

    fn ids(store: &HistoryStore) -> Vec<String> {
        store.events().map(|e| e.id.clone()).collect()
    }

    #[test]
    fn test_merge_is_idempotent_by_id() {
        let mut store = HistoryStore::empty("unused.json");
        let batch = vec![event("a", Some(4.5), 1_000), event("b", Some(2.0), 2_000)];

        let first = store.merge(batch.clone());
        assert_eq!(first, MergeReport { inserted: 2, updated: 0, total: 2 });

        let second = store.merge(batch);
        assert_eq!(second, MergeReport { inserted: 0, updated: 2, total: 2 });
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_refetch_does_not_duplicate() {
        let mut store = HistoryStore::empty("unused.json");
        store.merge(vec![event("a", Some(4.5), 1_000), event("b", Some(2.0), 2_000)]);
        assert_eq!(ids(&store), vec!["a", "b"]);

        store.merge(vec![event("a", Some(4.5), 1_000)]);
        assert_eq!(ids(&store), vec!["a", "b"]);
    }

    #[test]
    fn test_merge_last_write_wins() {
        let mut store = HistoryStore::empty("unused.json");
        store.merge(vec![event("a", Some(4.5), 1_000)]);
        store.merge(vec![event("a", Some(4.7), 1_000)]);

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("a").unwrap().magnitude, Some(4.7));
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("history.json");

        let mut store = HistoryStore::empty(&path);
        let mut with_coords = event("a", Some(4.5), 1_700_000_000_000);
        with_coords.coordinates = Some(crate::feed::Coordinates {
            latitude: 36.1,
            longitude: -120.5,
            depth_km: Some(8.2),
        });
        store.merge(vec![with_coords, event("b", None, 1_700_000_100_000)]);
        store.save().unwrap();

        let loaded = HistoryStore::load(&path);
        let before: Vec<_> = store
            .events()
            .map(|e| (e.id.clone(), e.magnitude, e.time, e.location.clone()))
            .collect();
        let after: Vec<_> = loaded
            .events()
            .map(|e| (e.id.clone(), e.magnitude, e.time, e.location.clone()))
            .collect();
        assert_eq!(before, after);
        assert_eq!(loaded.get("a").unwrap().depth_km(), Some(8.2));
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = HistoryStore::load(dir.path().join("nope.json"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_invalid_json_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(&path, "{ this is not json").unwrap();

        let store = HistoryStore::load(&path);
        assert!(store.is_empty());
        assert_eq!(store.path(), path.as_path());
    }

    #[test]
    fn test_load_rekeys_by_event_id() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(
            &path,
            r#"{"stale-key": {"id": "a", "time": "2023-11-14T22:13:20Z", "magnitude": 4.5, "location": "Alpha"}}"#,
        )
        .unwrap();

        let mut store = HistoryStore::load(&path);
        assert_eq!(ids(&store), vec!["a"]);
        assert!(store.get("stale-key").is_none());

        let report = store.merge(vec![event("a", Some(4.6), 1_700_000_000_000)]);
        assert_eq!(report, MergeReport { inserted: 0, updated: 1, total: 1 });
    }

    #[test]
    fn test_load_wrong_shape_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(&path, r#"[1, 2, 3]"#).unwrap();

        assert!(HistoryStore::load(&path).is_empty());
    }

    #[test]
    fn test_save_overwrites_previous_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");
        std::fs::write(&path, "garbage that is much longer than an empty object").unwrap();

        let store = HistoryStore::load(&path);
        store.save().unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn test_save_failure_surfaces_error() {
        let dir = tempdir().unwrap();
        // A directory where the file should be makes the write fail.
        let path = dir.path().join("history.json");
        std::fs::create_dir(&path).unwrap();

        let mut store = HistoryStore::empty(&path);
        store.merge(vec![event("a", Some(1.0), 1_000)]);
        assert!(matches!(store.save(), Err(HistoryError::Io { .. })));
        // In-memory state stays usable.
        assert_eq!(store.len(), 1);
    }
}
