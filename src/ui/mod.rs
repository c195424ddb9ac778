//! UI rendering module for dashtop
//!
//! This module contains all the rendering logic for the terminal user
//! interface, using the ratatui library for TUI components. The dashboard
//! frame is a tab bar, a body pane dispatched by category, a status line,
//! and a footer with connection and cache details.

pub mod chart_view;
pub mod help_overlay;
pub mod overview;
pub mod widgets;

pub use help_overlay::render as render_help_overlay;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, LiveIndicator};
use crate::data::{Category, HealthState};
use crate::live::AlertLevel;

/// Renders the dashboard view: tabs, body, status line, footer
pub fn render_dashboard(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_tabs(frame, app, chunks[0]);

    match app.category {
        Category::Overview => overview::render(frame, app, chunks[1]),
        Category::Chart(kind) => chart_view::render(frame, app, kind, chunks[1]),
    }

    render_status_line(frame, app, chunks[2]);
    render_footer(frame, app, chunks[3]);
}

/// Renders the category tab bar
fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles = Category::ALL.iter().map(|category| category.title());
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" dashtop ")
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .select(app.category_index())
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}

/// Renders the status line: latest alert, or the current status message
fn render_status_line(frame: &mut Frame, app: &App, area: Rect) {
    let line = if let Some(alert) = app.alerts.last() {
        Line::from(vec![
            Span::styled("● ", Style::default().fg(alert_color(alert.level))),
            Span::styled(
                format!(
                    "{} ({})",
                    alert.message,
                    alert.received_at.format("%H:%M:%S")
                ),
                Style::default().fg(Color::White),
            ),
        ])
    } else if let Some(status) = &app.status {
        Line::from(Span::styled(
            status.clone(),
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from("")
    };

    frame.render_widget(Paragraph::new(line), area);
}

/// Renders the footer: mode, health, live channel, refresh time, cache size
fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let separator = Span::styled(" │ ", Style::default().fg(Color::DarkGray));

    let mode = if app.is_live_mode() {
        Span::styled("live", Style::default().fg(Color::Cyan))
    } else {
        Span::styled("static", Style::default().fg(Color::Magenta))
    };

    let (health_text, health_color) = match app.health.as_ref().map(|h| h.state) {
        Some(HealthState::Ok) => ("health: ok", Color::Green),
        Some(HealthState::Degraded) => ("health: degraded", Color::Yellow),
        Some(HealthState::Down) => ("health: down", Color::Red),
        Some(HealthState::Unknown) => ("health: unknown", Color::Gray),
        None => ("health: —", Color::DarkGray),
    };

    let (live_text, live_color) = match app.live_indicator {
        LiveIndicator::Disabled => ("updates: off", Color::DarkGray),
        LiveIndicator::Connecting => ("updates: connecting", Color::Yellow),
        LiveIndicator::Connected => ("updates: live", Color::Green),
        LiveIndicator::Reconnecting => ("updates: reconnecting", Color::Yellow),
    };

    let refreshed = match &app.last_refresh {
        Some(at) => format!("refreshed {}", at.format("%H:%M:%S")),
        None => "never refreshed".to_string(),
    };

    let spans = vec![
        mode,
        separator.clone(),
        Span::styled(health_text, Style::default().fg(health_color)),
        separator.clone(),
        Span::styled(live_text, Style::default().fg(live_color)),
        separator.clone(),
        Span::styled(refreshed, Style::default().fg(Color::Gray)),
        separator.clone(),
        Span::styled(
            format!("cache: {}", app.cache_len()),
            Style::default().fg(Color::Gray),
        ),
        separator,
        Span::styled("? help", Style::default().fg(Color::DarkGray)),
    ];

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Color for an alert level
pub(crate) fn alert_color(level: AlertLevel) -> Color {
    match level {
        AlertLevel::Info => Color::Cyan,
        AlertLevel::Warning => Color::Yellow,
        AlertLevel::Critical => Color::Red,
    }
}
