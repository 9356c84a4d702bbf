//! Text rasterizers for the two dashboard charts.
//!
//! Both functions return exactly `height` lines of exactly `width` characters
//! so the painter can place them without further measuring.

use chrono::{DateTime, Utc};

const POINT: char = '•';
const BAR: char = '█';

/// Plot `(time, magnitude)` points on a `width` x `height` grid.
///
/// Time runs left to right and magnitude bottom to top, both scaled to the
/// data's own range. A single point, or a flat range, lands mid-axis.
pub fn scatter_lines(points: &[(DateTime<Utc>, f64)], width: usize, height: usize) -> Vec<String> {
    let mut grid = vec![vec![' '; width]; height];
    if width == 0 || height == 0 || points.is_empty() {
        return into_lines(grid);
    }

    let t_min = points.iter().map(|(t, _)| t.timestamp_millis()).min().unwrap_or(0);
    let t_max = points.iter().map(|(t, _)| t.timestamp_millis()).max().unwrap_or(0);
    let m_min = points.iter().map(|(_, m)| *m).fold(f64::INFINITY, f64::min);
    let m_max = points.iter().map(|(_, m)| *m).fold(f64::NEG_INFINITY, f64::max);

    for (time, mag) in points {
        let x = scale(
            (time.timestamp_millis() - t_min) as f64,
            (t_max - t_min) as f64,
            width,
        );
        let y = scale(mag - m_min, m_max - m_min, height);
        grid[height - 1 - y][x] = POINT;
    }

    into_lines(grid)
}

/// Draw one vertical bar per bin, stretched or squeezed to `width` columns.
///
/// Bars are scaled to the tallest bin. A non-empty bin always shows at
/// least one cell.
pub fn histogram_lines(counts: &[usize], width: usize, height: usize) -> Vec<String> {
    let mut grid = vec![vec![' '; width]; height];
    let max = counts.iter().copied().max().unwrap_or(0);
    if width == 0 || height == 0 || max == 0 {
        return into_lines(grid);
    }

    for col in 0..width {
        let bin = col * counts.len() / width;
        let count = counts[bin];
        if count == 0 {
            continue;
        }
        let bar = ((count as f64 / max as f64) * height as f64).round() as usize;
        let bar = bar.clamp(1, height);
        for row in grid.iter_mut().skip(height - bar) {
            row[col] = BAR;
        }
    }

    into_lines(grid)
}

/// Map `value` in `[0, span]` to a cell index in `[0, cells)`.
fn scale(value: f64, span: f64, cells: usize) -> usize {
    if span <= 0.0 {
        return cells / 2;
    }
    let idx = (value / span * (cells - 1) as f64).round() as usize;
    idx.min(cells - 1)
}

fn into_lines(grid: Vec<Vec<char>>) -> Vec<String> {
    grid.into_iter().map(|row| row.into_iter().collect()).collect()
}
