//! Dashboard rendering.
//!
//! [`DashboardView::build`] derives everything the screen shows from the
//! merged history: the table of the most recent events, the magnitude series,
//! and the log-binned energy histogram. The view is rebuilt from scratch on
//! every refresh. [`terminal::Painter`] draws it.

pub mod chart;
pub mod terminal;

use std::fmt;

use chrono::{DateTime, Utc};

use crate::feed::EarthquakeEvent;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const MISSING: &str = "-";

/// Rendering knobs.
#[derive(Debug, Clone, Copy)]
pub struct RenderConfig {
    /// Maximum rows in the event table.
    pub max_table_rows: usize,
    /// Number of log-spaced bins in the energy histogram.
    pub energy_bins: usize,
    /// Place names longer than this are cut.
    pub place_width: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_table_rows: 50,
            energy_bins: 30,
            place_width: 40,
        }
    }
}

/// One formatted row of the event table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub time: String,
    pub magnitude: String,
    pub depth: String,
    pub place: String,
}

impl TableRow {
    /// Column titles, aligned like the rows.
    pub fn header() -> String {
        row_line("Time (UTC)", "Mag", "Depth", "Place")
    }
}

impl fmt::Display for TableRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&row_line(&self.time, &self.magnitude, &self.depth, &self.place))
    }
}

fn row_line(time: &str, magnitude: &str, depth: &str, place: &str) -> String {
    format!("{:<19} {:>4} {:>7} {}", time, magnitude, depth, place)
}

/// A histogram bin over `[lower, upper)` energy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Energy distribution with logarithmically spaced bins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnergyHistogram {
    pub bins: Vec<HistogramBin>,
}

impl EnergyHistogram {
    /// Bin magnitudes by energy `10^(1.5 * m)`.
    ///
    /// Binning happens on `log10(energy)`, which is `1.5 * m`, so large
    /// magnitudes never overflow. Equal energies collapse into one bin.
    pub fn from_magnitudes(magnitudes: &[f64], bin_count: usize) -> Self {
        let log_energies: Vec<f64> = magnitudes
            .iter()
            .filter(|m| m.is_finite())
            .map(|m| 1.5 * m)
            .collect();

        if log_energies.is_empty() || bin_count == 0 {
            return Self::default();
        }

        let lo = log_energies.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = log_energies
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);

        if hi - lo <= f64::EPSILON {
            return Self {
                bins: vec![HistogramBin {
                    lower: 10f64.powf(lo),
                    upper: 10f64.powf(hi),
                    count: log_energies.len(),
                }],
            };
        }

        let width = (hi - lo) / bin_count as f64;
        let mut bins: Vec<HistogramBin> = (0..bin_count)
            .map(|i| HistogramBin {
                lower: 10f64.powf(lo + i as f64 * width),
                upper: 10f64.powf(lo + (i + 1) as f64 * width),
                count: 0,
            })
            .collect();

        for le in log_energies {
            let idx = (((le - lo) / width).floor() as usize).min(bin_count - 1);
            bins[idx].count += 1;
        }

        Self { bins }
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }

    pub fn counts(&self) -> Vec<usize> {
        self.bins.iter().map(|b| b.count).collect()
    }

    /// Energy range covered, `(min, max)`.
    pub fn range(&self) -> Option<(f64, f64)> {
        Some((self.bins.first()?.lower, self.bins.last()?.upper))
    }
}

/// Everything the dashboard draws, derived from the retained history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardView {
    /// Most recent events, newest first.
    pub table: Vec<TableRow>,
    /// `(time, magnitude)` across all history, oldest first.
    pub magnitudes: Vec<(DateTime<Utc>, f64)>,
    /// Energy distribution across all history.
    pub energy: EnergyHistogram,
    /// Number of events retained.
    pub total_events: usize,
}

impl DashboardView {
    pub fn build<'a, I>(events: I, config: &RenderConfig) -> Self
    where
        I: IntoIterator<Item = &'a EarthquakeEvent>,
    {
        let mut events: Vec<&EarthquakeEvent> = events.into_iter().collect();
        events.sort_by(|a, b| b.time.cmp(&a.time).then_with(|| a.id.cmp(&b.id)));

        let table = events
            .iter()
            .take(config.max_table_rows)
            .map(|e| table_row(e, config.place_width))
            .collect();

        let mut magnitudes: Vec<(DateTime<Utc>, f64)> = events
            .iter()
            .filter_map(|e| e.magnitude.map(|m| (e.time, m)))
            .collect();
        magnitudes.reverse();

        let mags: Vec<f64> = magnitudes.iter().map(|(_, m)| *m).collect();
        let energy = EnergyHistogram::from_magnitudes(&mags, config.energy_bins);

        Self {
            table,
            magnitudes,
            energy,
            total_events: events.len(),
        }
    }

    /// Largest magnitude in the retained history.
    pub fn max_magnitude(&self) -> Option<f64> {
        self.magnitudes
            .iter()
            .map(|(_, m)| *m)
            .fold(None, |acc: Option<f64>, m| Some(acc.map_or(m, |a| a.max(m))))
    }
}

fn table_row(event: &EarthquakeEvent, place_width: usize) -> TableRow {
    TableRow {
        time: event.time.format(TIME_FORMAT).to_string(),
        magnitude: event
            .magnitude
            .map(|m| format!("{:.1}", m))
            .unwrap_or_else(|| MISSING.to_string()),
        depth: event
            .depth_km()
            .map(|d| format!("{:.1}", d))
            .unwrap_or_else(|| MISSING.to_string()),
        place: event.location.chars().take(place_width).collect(),
    }
}
