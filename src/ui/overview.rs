//! Overview screen rendering
//!
//! Renders the summary metric tiles and the recent-alerts panel. Metric
//! tiles show the current value, unit, and delta; values patched by the
//! live channel appear here on the next frame.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::Metric;
use crate::ui::alert_color;

/// Metric tiles per row
const TILES_PER_ROW: usize = 4;

/// Height of a metric tile row in terminal cells
const TILE_HEIGHT: u16 = 4;

/// Renders the overview: metric tiles on top, alerts below
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(7)])
        .split(area);

    render_metrics(frame, app, chunks[0]);
    render_alerts(frame, app, chunks[1]);
}

/// Renders the summary metric tiles, or a placeholder when no summary loaded
fn render_metrics(frame: &mut Frame, app: &App, area: Rect) {
    let Some(summary) = &app.summary else {
        let placeholder = Paragraph::new("summary unavailable (press r to retry)")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(" Summary "));
        frame.render_widget(placeholder, area);
        return;
    };

    let block = Block::default().borders(Borders::ALL).title(" Summary ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let row_count = summary.metrics.len().div_ceil(TILES_PER_ROW);
    if row_count == 0 {
        return;
    }

    let row_constraints: Vec<Constraint> =
        (0..row_count).map(|_| Constraint::Length(TILE_HEIGHT)).collect();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(row_constraints)
        .split(inner);

    for (row_index, row_metrics) in summary.metrics.chunks(TILES_PER_ROW).enumerate() {
        if row_index >= rows.len() {
            break;
        }
        let column_constraints: Vec<Constraint> = (0..TILES_PER_ROW)
            .map(|_| Constraint::Percentage(100 / TILES_PER_ROW as u16))
            .collect();
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(column_constraints)
            .split(rows[row_index]);

        for (column_index, metric) in row_metrics.iter().enumerate() {
            render_tile(frame, metric, columns[column_index]);
        }
    }
}

/// Renders a single metric tile
fn render_tile(frame: &mut Frame, metric: &Metric, area: Rect) {
    let value_text = match &metric.unit {
        Some(unit) => format!("{} {}", format_value(metric.value), unit),
        None => format_value(metric.value),
    };

    let lines = vec![
        Line::from(Span::styled(
            value_text,
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        delta_line(metric.delta),
    ];

    let tile = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", metric.display_label()))
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(tile, area);
}

/// Builds the delta line for a tile
fn delta_line(delta: Option<f64>) -> Line<'static> {
    match delta {
        Some(d) if d > 0.0 => Line::from(Span::styled(
            format!("▲ {}", format_value(d)),
            Style::default().fg(Color::Green),
        )),
        Some(d) if d < 0.0 => Line::from(Span::styled(
            format!("▼ {}", format_value(d.abs())),
            Style::default().fg(Color::Red),
        )),
        Some(_) => Line::from(Span::styled("—", Style::default().fg(Color::Gray))),
        None => Line::from(""),
    }
}

/// Renders the recent-alerts panel
fn render_alerts(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Alerts (x to dismiss) ");

    let lines: Vec<Line> = if app.alerts.is_empty() {
        vec![Line::from(Span::styled(
            "no alerts",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        app.alerts
            .iter()
            .map(|alert| {
                Line::from(vec![
                    Span::styled("● ", Style::default().fg(alert_color(alert.level))),
                    Span::styled(
                        format!("{} ", alert.received_at.format("%H:%M:%S")),
                        Style::default().fg(Color::Gray),
                    ),
                    Span::raw(alert.message.clone()),
                ])
            })
            .collect()
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Formats a metric value for display
///
/// Whole numbers drop the fraction; everything else keeps one decimal.
pub(crate) fn format_value(value: f64) -> String {
    if value.fract().abs() < 1e-9 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}
