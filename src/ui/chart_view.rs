//! Chart pane rendering
//!
//! Renders a validated chart payload into a terminal pane. Bars are drawn
//! as proportional block runs, line series as sparkline bands, pies as a
//! segmented ratio bar with a legend, and the 3D kinds as block-density
//! grids. Panes filled with demo data are tagged in the pane title.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, ChartSource};
use crate::charts::{ChartData, Series};
use crate::data::ChartKind;
use crate::ui::overview::format_value;
use crate::ui::widgets::RatioBar;

/// Block characters for sparkline bands (8 levels)
const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Block characters for scatter density (4 levels)
const DENSITY: [char; 4] = ['░', '▒', '▓', '█'];

/// Heat gradient for surface cells, coldest to hottest
const HEAT: [Color; 6] = [
    Color::Blue,
    Color::Cyan,
    Color::Green,
    Color::Yellow,
    Color::LightRed,
    Color::Red,
];

/// Longest label column width in bar charts
const MAX_LABEL_WIDTH: usize = 16;

/// Renders the chart pane for a kind
pub fn render(frame: &mut Frame, app: &App, kind: ChartKind, area: Rect) {
    let Some(slot) = app.chart(kind) else {
        let placeholder = Paragraph::new("loading…")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL).title(format!(" {} ", kind.title())));
        frame.render_widget(placeholder, area);
        return;
    };

    let title = match slot.source {
        ChartSource::Backend => format!(" {} ", kind.title()),
        ChartSource::Fallback => format!(" {} (demo data) ", kind.title()),
    };
    let border_color = match slot.source {
        ChartSource::Backend => Color::DarkGray,
        ChartSource::Fallback => Color::Yellow,
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.width == 0 || inner.height == 0 {
        return;
    }

    match &slot.data {
        ChartData::Bar {
            labels,
            values,
            colors,
        } => render_bar(frame, inner, labels, values, colors),
        ChartData::Line { labels, series } => render_line(frame, inner, labels, series),
        ChartData::Pie {
            labels,
            values,
            colors,
        } => render_pie(frame, inner, labels, values, colors),
        ChartData::Scatter3d { x, y, z } => render_scatter(frame, inner, x, y, z),
        ChartData::Surface { z } => render_surface(frame, inner, z),
    }
}

/// Renders horizontal bars: label, proportional block run, value
fn render_bar(frame: &mut Frame, area: Rect, labels: &[String], values: &[f64], colors: &[Color]) {
    let max = values.iter().cloned().fold(0.0_f64, f64::max);
    let label_width = labels
        .iter()
        .map(|label| label.chars().count())
        .max()
        .unwrap_or(0)
        .min(MAX_LABEL_WIDTH);
    let value_strings: Vec<String> = values.iter().map(|v| format_value(*v)).collect();
    let value_width = value_strings.iter().map(String::len).max().unwrap_or(0);
    let bar_space = (area.width as usize).saturating_sub(label_width + value_width + 3);

    let mut lines = Vec::with_capacity(labels.len());
    for (i, label) in labels.iter().enumerate() {
        let fraction = if max > 0.0 {
            (values[i] / max).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let bar_len = (fraction * bar_space as f64).round() as usize;
        lines.push(Line::from(vec![
            Span::styled(
                format!("{label:>label_width$.label_width$} "),
                Style::default().fg(Color::Gray),
            ),
            Span::styled(
                "█".repeat(bar_len),
                Style::default().fg(colors[i % colors.len()]),
            ),
            Span::raw(format!(" {}", value_strings[i])),
        ]));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

/// Renders each line series as a sparkline band with a header
fn render_line(frame: &mut Frame, area: Rect, labels: &[String], series: &[Series]) {
    let width = area.width as usize;
    let mut lines = Vec::new();

    for (i, s) in series.iter().enumerate() {
        let color = series_color(i);
        let min = s.values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = s.values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        lines.push(Line::from(vec![
            Span::styled(
                format!("{} ", s.name),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("({} – {})", format_value(min), format_value(max)),
                Style::default().fg(Color::Gray),
            ),
        ]));
        lines.push(Line::from(Span::styled(
            sparkline_string(&s.values, width),
            Style::default().fg(color),
        )));
        lines.push(Line::from(""));
    }

    // X axis: first label left, last label right
    if let (Some(first), Some(last)) = (labels.first(), labels.last()) {
        let gap = width.saturating_sub(first.chars().count() + last.chars().count());
        lines.push(Line::from(Span::styled(
            format!("{}{}{}", first, " ".repeat(gap), last),
            Style::default().fg(Color::DarkGray),
        )));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

/// Renders a pie as a segmented ratio bar plus a legend with percentages
fn render_pie(frame: &mut Frame, area: Rect, labels: &[String], values: &[f64], colors: &[Color]) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

    frame.render_widget(RatioBar::new(values, colors), chunks[0]);

    let total: f64 = values.iter().filter(|v| **v > 0.0).sum();
    let legend: Vec<Line> = labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let share = if total > 0.0 && values[i] > 0.0 {
                values[i] / total * 100.0
            } else {
                0.0
            };
            Line::from(vec![
                Span::styled("■ ", Style::default().fg(colors[i % colors.len()])),
                Span::raw(format!("{label}  ")),
                Span::styled(
                    format!("{share:.1}%"),
                    Style::default().fg(Color::Gray),
                ),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(legend), chunks[2]);
}

/// Renders 3D scatter points projected onto the x/y plane, encoding z as
/// block density
fn render_scatter(frame: &mut Frame, area: Rect, x: &[f64], y: &[f64], z: &[f64]) {
    let cols = area.width as usize;
    let rows = area.height as usize;
    if cols == 0 || rows == 0 {
        return;
    }

    let (x_min, x_max) = bounds(x);
    let (y_min, y_max) = bounds(y);
    let (z_min, z_max) = bounds(z);

    let mut grid = vec![vec![' '; cols]; rows];
    for i in 0..x.len() {
        let col = project(x[i], x_min, x_max, cols);
        // Larger y is up, so the row index is inverted.
        let row = rows - 1 - project(y[i], y_min, y_max, rows);
        let level = project(z[i], z_min, z_max, DENSITY.len());
        grid[row][col] = DENSITY[level];
    }

    let lines: Vec<Line> = grid
        .into_iter()
        .map(|row| {
            Line::from(Span::styled(
                row.into_iter().collect::<String>(),
                Style::default().fg(Color::Cyan),
            ))
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), area);
}

/// Renders a surface matrix as a heat-colored cell grid
fn render_surface(frame: &mut Frame, area: Rect, z: &[Vec<f64>]) {
    // Two terminal cells per matrix cell keeps the grid roughly square.
    let cols = ((area.width / 2) as usize).min(z[0].len()).max(1);
    let rows = (area.height as usize).min(z.len()).max(1);

    let flat_min = z
        .iter()
        .flatten()
        .cloned()
        .fold(f64::INFINITY, f64::min);
    let flat_max = z
        .iter()
        .flatten()
        .cloned()
        .fold(f64::NEG_INFINITY, f64::max);

    let mut lines = Vec::with_capacity(rows);
    for row_index in 0..rows {
        let source_row = &z[row_index * z.len() / rows];
        let mut spans = Vec::with_capacity(cols);
        for col_index in 0..cols {
            let value = source_row[col_index * source_row.len() / cols];
            let level = project(value, flat_min, flat_max, HEAT.len());
            spans.push(Span::styled("██", Style::default().fg(HEAT[level])));
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

/// Builds a sparkline string for a series, resampled to the given width
fn sparkline_string(values: &[f64], width: usize) -> String {
    let sampled = resample(values, width);
    let min = sampled.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = sampled.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    sampled
        .iter()
        .map(|value| {
            if max > min {
                let normalized = (value - min) / (max - min);
                BLOCKS[((normalized * 7.0).round() as usize).min(7)]
            } else {
                BLOCKS[3]
            }
        })
        .collect()
}

/// Downsamples a series to at most `width` points
fn resample(values: &[f64], width: usize) -> Vec<f64> {
    if values.is_empty() || width == 0 {
        return Vec::new();
    }
    if values.len() <= width {
        return values.to_vec();
    }
    (0..width).map(|i| values[i * values.len() / width]).collect()
}

/// Maps a value in `[min, max]` to a bucket index in `[0, buckets)`
fn project(value: f64, min: f64, max: f64, buckets: usize) -> usize {
    if buckets == 0 {
        return 0;
    }
    if max <= min {
        return 0;
    }
    let normalized = ((value - min) / (max - min)).clamp(0.0, 1.0);
    ((normalized * (buckets - 1) as f64).round() as usize).min(buckets - 1)
}

/// Returns `(min, max)` of a slice
fn bounds(values: &[f64]) -> (f64, f64) {
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    (min, max)
}

/// Series color by index, cycling the sparkline palette
fn series_color(index: usize) -> Color {
    const SERIES_COLORS: [Color; 6] = [
        Color::Cyan,
        Color::Yellow,
        Color::Green,
        Color::Magenta,
        Color::LightRed,
        Color::Blue,
    ];
    SERIES_COLORS[index % SERIES_COLORS.len()]
}
