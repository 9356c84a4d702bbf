//! Full-screen terminal painter.
//!
//! Redraws the whole dashboard on every call: status bar on top, event table
//! on the left, magnitude scatter and energy histogram stacked on the right.

use std::io::{self, Write};

use crossterm::{
    QueueableCommand,
    cursor::MoveTo,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{Clear, ClearType},
};

use crate::render::{DashboardView, TableRow, chart};

const TITLE: &str = "Live Earthquake Dashboard";
const KEY_HINTS: &str = "[r] refresh  [q] quit";
const MIN_WIDTH: u16 = 60;
const MIN_HEIGHT: u16 = 14;
const TABLE_MAX_WIDTH: u16 = 76;
const Y_GUTTER: u16 = 7;
const HEADER_ROWS: u16 = 3;

/// Severity of the status bar message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// Message shown at the top right of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub level: StatusLevel,
}

impl StatusLine {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: StatusLevel::Info,
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: StatusLevel::Warning,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: StatusLevel::Error,
        }
    }

    fn color(&self) -> Color {
        match self.level {
            StatusLevel::Info => Color::Green,
            StatusLevel::Warning => Color::Yellow,
            StatusLevel::Error => Color::Red,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

/// Screen regions for a given terminal size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub table: Rect,
    pub magnitude: Rect,
    pub energy: Rect,
}

impl Layout {
    /// Split the screen, or `None` if it is too small to draw anything useful.
    pub fn compute(width: u16, height: u16) -> Option<Self> {
        if width < MIN_WIDTH || height < MIN_HEIGHT {
            return None;
        }

        let body_y = HEADER_ROWS;
        let body_height = height - HEADER_ROWS;
        let table_width = (width / 2).min(TABLE_MAX_WIDTH);
        let chart_x = table_width + 2;
        let chart_width = width - chart_x;
        let upper = body_height / 2;

        Some(Self {
            table: Rect {
                x: 0,
                y: body_y,
                width: table_width,
                height: body_height,
            },
            magnitude: Rect {
                x: chart_x,
                y: body_y,
                width: chart_width,
                height: upper,
            },
            energy: Rect {
                x: chart_x,
                y: body_y + upper,
                width: chart_width,
                height: body_height - upper,
            },
        })
    }
}

/// Draws [`DashboardView`]s onto any crossterm-capable writer.
#[derive(Debug, Default)]
pub struct Painter;

impl Painter {
    pub fn new() -> Self {
        Self
    }

    /// Paint the full screen and flush.
    pub fn draw<W: Write>(
        &self,
        out: &mut W,
        view: &DashboardView,
        status: &StatusLine,
        size: (u16, u16),
    ) -> io::Result<()> {
        let (width, height) = size;
        out.queue(Clear(ClearType::All))?;

        let Some(layout) = Layout::compute(width, height) else {
            out.queue(MoveTo(0, 0))?
                .queue(Print(clip("Terminal too small for the dashboard", width)))?;
            return out.flush();
        };

        self.draw_header(out, view, status, width)?;
        self.draw_table(out, view, layout.table)?;
        self.draw_magnitude(out, view, layout.magnitude)?;
        self.draw_energy(out, view, layout.energy)?;

        out.queue(ResetColor)?;
        out.flush()
    }

    fn draw_header<W: Write>(
        &self,
        out: &mut W,
        view: &DashboardView,
        status: &StatusLine,
        width: u16,
    ) -> io::Result<()> {
        out.queue(MoveTo(0, 0))?
            .queue(SetAttribute(Attribute::Bold))?
            .queue(Print(TITLE))?
            .queue(SetAttribute(Attribute::Reset))?;

        let status_text = clip(&status.text, width.saturating_sub(TITLE.len() as u16 + 2));
        let status_x = width.saturating_sub(status_text.chars().count() as u16);
        out.queue(MoveTo(status_x, 0))?
            .queue(SetForegroundColor(status.color()))?
            .queue(Print(status_text))?
            .queue(ResetColor)?;

        let summary = match view.max_magnitude() {
            Some(max) => format!(
                "{}   {} events in history, strongest M{:.1}",
                KEY_HINTS, view.total_events, max
            ),
            None => format!("{}   {} events in history", KEY_HINTS, view.total_events),
        };
        out.queue(MoveTo(0, 1))?
            .queue(SetForegroundColor(Color::DarkGrey))?
            .queue(Print(clip(&summary, width)))?
            .queue(MoveTo(0, 2))?
            .queue(Print("─".repeat(width as usize)))?
            .queue(ResetColor)?;
        Ok(())
    }

    fn draw_table<W: Write>(&self, out: &mut W, view: &DashboardView, area: Rect) -> io::Result<()> {
        let header = TableRow::header();
        out.queue(MoveTo(area.x, area.y))?
            .queue(SetAttribute(Attribute::Bold))?
            .queue(Print(clip(&header, area.width)))?
            .queue(SetAttribute(Attribute::Reset))?;

        let visible = area.height.saturating_sub(1) as usize;
        for (i, row) in view.table.iter().take(visible).enumerate() {
            let line = row.to_string();
            out.queue(MoveTo(area.x, area.y + 1 + i as u16))?
                .queue(Print(clip(&line, area.width)))?;
        }

        if view.table.is_empty() {
            out.queue(MoveTo(area.x, area.y + 1))?
                .queue(SetForegroundColor(Color::DarkGrey))?
                .queue(Print(clip("No events yet", area.width)))?
                .queue(ResetColor)?;
        }
        Ok(())
    }

    fn draw_magnitude<W: Write>(
        &self,
        out: &mut W,
        view: &DashboardView,
        area: Rect,
    ) -> io::Result<()> {
        self.draw_title(out, "Magnitude vs Time (UTC)", area)?;

        let (plot_w, plot_h) = plot_size(area);
        if plot_h == 0 || view.magnitudes.is_empty() {
            return self.draw_no_data(out, area);
        }

        let lo = view.magnitudes.iter().map(|(_, m)| *m).fold(f64::INFINITY, f64::min);
        let hi = view.max_magnitude().unwrap_or(lo);
        let lines = chart::scatter_lines(&view.magnitudes, plot_w as usize, plot_h as usize);
        self.draw_plot(out, &lines, area, &format!("{:>5.1}", hi), &format!("{:>5.1}", lo))?;

        if let (Some((first, _)), Some((last, _))) = (view.magnitudes.first(), view.magnitudes.last()) {
            let left = first.format("%m-%d %H:%M").to_string();
            let right = last.format("%m-%d %H:%M").to_string();
            self.draw_x_labels(out, area, &left, &right)?;
        }
        Ok(())
    }

    fn draw_energy<W: Write>(&self, out: &mut W, view: &DashboardView, area: Rect) -> io::Result<()> {
        self.draw_title(out, "Energy Distribution (Log Scale)", area)?;

        let (plot_w, plot_h) = plot_size(area);
        let Some((lo, hi)) = view.energy.range().filter(|_| plot_h > 0) else {
            return self.draw_no_data(out, area);
        };

        let counts = view.energy.counts();
        let peak = counts.iter().copied().max().unwrap_or(0);
        let lines = chart::histogram_lines(&counts, plot_w as usize, plot_h as usize);
        self.draw_plot(out, &lines, area, &format!("{:>5}", peak), &format!("{:>5}", 0))?;
        self.draw_x_labels(out, area, &format!("{:.1e}", lo), &format!("{:.1e}", hi))
    }

    fn draw_title<W: Write>(&self, out: &mut W, title: &str, area: Rect) -> io::Result<()> {
        out.queue(MoveTo(area.x, area.y))?
            .queue(SetAttribute(Attribute::Bold))?
            .queue(Print(clip(title, area.width)))?
            .queue(SetAttribute(Attribute::Reset))?;
        Ok(())
    }

    fn draw_no_data<W: Write>(&self, out: &mut W, area: Rect) -> io::Result<()> {
        out.queue(MoveTo(area.x, area.y + 1))?
            .queue(SetForegroundColor(Color::DarkGrey))?
            .queue(Print(clip("(No Data)", area.width)))?
            .queue(ResetColor)?;
        Ok(())
    }

    fn draw_plot<W: Write>(
        &self,
        out: &mut W,
        lines: &[String],
        area: Rect,
        top_label: &str,
        bottom_label: &str,
    ) -> io::Result<()> {
        let last = lines.len().saturating_sub(1);
        for (i, line) in lines.iter().enumerate() {
            let label = match i {
                0 => top_label,
                i if i == last => bottom_label,
                _ => "",
            };
            out.queue(MoveTo(area.x, area.y + 1 + i as u16))?
                .queue(SetForegroundColor(Color::DarkGrey))?
                .queue(Print(format!("{:>5} │", label)))?
                .queue(SetForegroundColor(Color::Cyan))?
                .queue(Print(line))?
                .queue(ResetColor)?;
        }
        Ok(())
    }

    fn draw_x_labels<W: Write>(&self, out: &mut W, area: Rect, left: &str, right: &str) -> io::Result<()> {
        let y = area.y + area.height.saturating_sub(1);
        let (plot_w, _) = plot_size(area);
        let right_x = area.x + Y_GUTTER + plot_w.saturating_sub(right.chars().count() as u16);
        out.queue(SetForegroundColor(Color::DarkGrey))?
            .queue(MoveTo(area.x + Y_GUTTER, y))?
            .queue(Print(clip(left, plot_w)))?
            .queue(MoveTo(right_x, y))?
            .queue(Print(clip(right, plot_w)))?
            .queue(ResetColor)?;
        Ok(())
    }
}

/// Plot area inside a chart region: one row for the title, one for x labels.
fn plot_size(area: Rect) -> (u16, u16) {
    (
        area.width.saturating_sub(Y_GUTTER),
        area.height.saturating_sub(2),
    )
}

fn clip(text: &str, width: u16) -> String {
    text.chars().take(width as usize).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::EarthquakeEvent;
    use crate::render::RenderConfig;
    use chrono::{DateTime, Utc};

    fn sample_view() -> DashboardView {
        let events: Vec<EarthquakeEvent> = (0..10)
            .map(|i| EarthquakeEvent {
                id: format!("ev{}", i),
                time: DateTime::<Utc>::from_timestamp(1_700_000_000 + i * 600, 0).unwrap(),
                magnitude: Some(2.5 + i as f64 * 0.3),
                location: format!("{} km SW of Testville", i),
                coordinates: None,
            })
            .collect();
        DashboardView::build(&events, &RenderConfig::default())
    }

    #[test]
    fn test_layout_fits_screen() {
        let layout = Layout::compute(120, 40).unwrap();
        assert_eq!(layout.table.width, 60);
        assert_eq!(layout.magnitude.x, 62);
        assert_eq!(layout.magnitude.x + layout.magnitude.width, 120);
        assert_eq!(layout.energy.y + layout.energy.height, 40);
        assert_eq!(layout.magnitude.y + layout.magnitude.height, layout.energy.y);
    }

    #[test]
    fn test_layout_caps_table_width() {
        let layout = Layout::compute(240, 60).unwrap();
        assert_eq!(layout.table.width, TABLE_MAX_WIDTH);
    }

    #[test]
    fn test_layout_too_small() {
        assert!(Layout::compute(40, 40).is_none());
        assert!(Layout::compute(120, 10).is_none());
    }

    #[test]
    fn test_draw_full_dashboard() {
        let mut out = Vec::new();
        Painter::new()
            .draw(&mut out, &sample_view(), &StatusLine::info("Last updated: 12:00:00 UTC"), (120, 40))
            .unwrap();

        let text = String::from_utf8_lossy(&out);
        assert!(text.contains(TITLE));
        assert!(text.contains("Magnitude vs Time (UTC)"));
        assert!(text.contains("Energy Distribution (Log Scale)"));
        assert!(text.contains("9 km SW of Testville"));
        assert!(text.contains("Last updated: 12:00:00 UTC"));
        assert!(text.contains("10 events in history"));
    }

    #[test]
    fn test_draw_empty_view_shows_no_data() {
        let mut out = Vec::new();
        Painter::new()
            .draw(&mut out, &DashboardView::default(), &StatusLine::info("Loading…"), (100, 30))
            .unwrap();

        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("No events yet"));
        assert!(text.contains("(No Data)"));
    }

    #[test]
    fn test_draw_too_small() {
        let mut out = Vec::new();
        Painter::new()
            .draw(&mut out, &sample_view(), &StatusLine::error("x"), (20, 5))
            .unwrap();
        assert!(String::from_utf8_lossy(&out).contains("Terminal too small"));
    }
}
