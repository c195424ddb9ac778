//! Application state management for dashtop
//!
//! This module contains the main application state, handling keyboard input,
//! data loading, tab navigation, and application of live update events.

use std::collections::HashMap;

use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent};
use serde_json::Value;

use crate::charts::{self, ChartData};
use crate::cli::StartupConfig;
use crate::data::{ApiClient, ApiError, Category, ChartKind, DashboardSummary, Health};
use crate::live::{AlertLevel, LiveEvent, LiveMessage, LiveStatus};

/// Maximum number of alerts retained for display
const MAX_ALERTS: usize = 5;

/// Application state enum representing the current view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppState {
    /// Initial loading state while fetching data
    Loading,
    /// The dashboard with its category tabs
    Dashboard,
}

/// Where the data in a chart pane came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartSource {
    /// Fetched from the configured data source and validated
    Backend,
    /// Demo data substituted because nothing else was available
    Fallback,
}

/// A chart pane: validated data plus its provenance
#[derive(Debug, Clone)]
pub struct ChartSlot {
    pub data: ChartData,
    pub source: ChartSource,
}

/// An alert received over the live channel
#[derive(Debug, Clone)]
pub struct AlertNotice {
    pub level: AlertLevel,
    pub message: String,
    pub received_at: DateTime<Local>,
}

/// Connection state of the live channel as shown in the footer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveIndicator {
    /// No live channel (static mode or --no-live)
    Disabled,
    Connecting,
    Connected,
    Reconnecting,
}

/// Main application struct managing state and data
pub struct App {
    /// Current application state/view
    pub state: AppState,
    /// Currently selected category tab
    pub category: Category,
    /// Dashboard summary, if loaded
    pub summary: Option<DashboardSummary>,
    /// Chart panes keyed by chart kind
    pub charts: HashMap<ChartKind, ChartSlot>,
    /// Backend health, if loaded
    pub health: Option<Health>,
    /// Recent alerts from the live channel, oldest first
    pub alerts: Vec<AlertNotice>,
    /// Live channel state for the footer
    pub live_indicator: LiveIndicator,
    /// Status line message, if any
    pub status: Option<String>,
    /// Timestamp of last data refresh
    pub last_refresh: Option<DateTime<Local>>,
    /// Flag indicating a refresh has been requested
    pub refresh_requested: bool,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// API client
    client: ApiClient,
}

impl App {
    /// Creates a new App instance from the startup configuration
    pub fn new(config: StartupConfig) -> Self {
        let live_indicator = if config.live_enabled {
            LiveIndicator::Connecting
        } else {
            LiveIndicator::Disabled
        };
        let client = ApiClient::new(config.mode).with_ttl(config.ttl);

        Self {
            state: AppState::Loading,
            category: config.initial_category,
            summary: None,
            charts: HashMap::new(),
            health: None,
            alerts: Vec::new(),
            live_indicator,
            status: None,
            last_refresh: None,
            refresh_requested: false,
            show_help: false,
            should_quit: false,
            client,
        }
    }

    /// Returns true when fetching from a live backend
    pub fn is_live_mode(&self) -> bool {
        self.client.resolver().is_live()
    }

    /// Returns the WebSocket URL for the live channel, if the data source
    /// has one and the channel is not disabled
    pub fn live_socket(&self) -> Option<String> {
        if self.live_indicator == LiveIndicator::Disabled {
            return None;
        }
        self.client.resolver().live_socket()
    }

    /// Returns the number of live cache entries, for the footer
    pub fn cache_len(&self) -> usize {
        self.client.cache_len()
    }

    /// Returns the chart pane for a kind, if one has been filled
    pub fn chart(&self, kind: ChartKind) -> Option<&ChartSlot> {
        self.charts.get(&kind)
    }

    /// Index of the selected category in tab order
    pub fn category_index(&self) -> usize {
        Category::ALL
            .iter()
            .position(|category| *category == self.category)
            .unwrap_or(0)
    }

    /// Loads summary, charts, and health concurrently
    ///
    /// Transitions to the Dashboard state when complete; individual failures
    /// degrade the affected pane rather than aborting the load.
    pub async fn load_all_data(&mut self) {
        let charts = futures::future::join_all(
            ChartKind::ALL
                .iter()
                .map(|kind| self.client.fetch_chart(*kind)),
        );
        let (summary_result, health_result, chart_results) =
            futures::future::join3(self.client.fetch_summary(), self.client.fetch_health(), charts)
                .await;

        match summary_result {
            Ok(summary) => self.summary = Some(summary),
            Err(err) => self.note_failure("summary", &err),
        }

        match health_result {
            Ok(health) => self.health = Some(health),
            Err(err) => self.note_failure("health", &err),
        }

        for (kind, result) in ChartKind::ALL.iter().zip(chart_results) {
            self.apply_chart_payload(*kind, result);
        }

        self.last_refresh = Some(Local::now());
        self.state = AppState::Dashboard;
    }

    /// Clears the response cache and refetches everything
    pub async fn reload(&mut self) {
        self.client.clear_cache();
        self.status = None;
        self.load_all_data().await;
    }

    /// Applies a fetched chart payload to its pane
    ///
    /// A payload that fetched and validated replaces the pane. On fetch or
    /// validation failure the previously displayed chart is kept untouched;
    /// a pane that has never been filled falls back to demo data so the tab
    /// is not blank.
    pub fn apply_chart_payload(&mut self, kind: ChartKind, payload: Result<Value, ApiError>) {
        match payload {
            Ok(value) => match ChartData::from_value(kind, &value) {
                Ok(data) => {
                    self.charts.insert(
                        kind,
                        ChartSlot {
                            data,
                            source: ChartSource::Backend,
                        },
                    );
                    return;
                }
                Err(err) => {
                    self.status = Some(format!("{} chart: {}", kind.title(), err));
                }
            },
            Err(err) => self.note_failure(kind.resource(), &err),
        }

        self.charts.entry(kind).or_insert_with(|| ChartSlot {
            data: charts::fallback(kind),
            source: ChartSource::Fallback,
        });
    }

    /// Applies an event from the live channel
    pub fn apply_live_event(&mut self, event: LiveEvent) {
        match event {
            LiveEvent::Status(status) => {
                self.live_indicator = match status {
                    LiveStatus::Connecting => LiveIndicator::Connecting,
                    LiveStatus::Connected => LiveIndicator::Connected,
                    LiveStatus::Reconnecting => LiveIndicator::Reconnecting,
                };
            }
            LiveEvent::Message(LiveMessage::MetricsUpdate { metrics }) => {
                if let Some(summary) = &mut self.summary {
                    for (name, value) in metrics {
                        // Names without a matching tile are ignored.
                        summary.patch(&name, value);
                    }
                }
            }
            LiveEvent::Message(LiveMessage::Alert { level, message }) => {
                self.alerts.push(AlertNotice {
                    level,
                    message,
                    received_at: Local::now(),
                });
                if self.alerts.len() > MAX_ALERTS {
                    let excess = self.alerts.len() - MAX_ALERTS;
                    self.alerts.drain(..excess);
                }
            }
        }
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `q` or `Esc`: Quit (Esc closes the help overlay first)
    /// - `Tab`/`l`/`→`: Next category tab
    /// - `BackTab`/`h`/`←`: Previous category tab
    /// - `1`-`6`: Jump to a tab
    /// - `r`: Refresh (clears the cache and refetches)
    /// - `x`: Dismiss alerts
    /// - `?`: Toggle help overlay
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        // Help overlay intercepts all keys when shown
        if self.show_help {
            match key_event.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                    self.show_help = false;
                }
                _ => {}
            }
            return;
        }

        match self.state {
            AppState::Loading => {
                // Only quit is allowed during loading
                if key_event.code == KeyCode::Char('q') {
                    self.should_quit = true;
                }
            }
            AppState::Dashboard => match key_event.code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.should_quit = true;
                }
                KeyCode::Tab | KeyCode::Char('l') | KeyCode::Right => {
                    self.next_category();
                }
                KeyCode::BackTab | KeyCode::Char('h') | KeyCode::Left => {
                    self.prev_category();
                }
                KeyCode::Char(c @ '1'..='6') => {
                    let index = (c as usize) - ('1' as usize);
                    self.category = Category::ALL[index];
                }
                KeyCode::Char('r') => {
                    self.refresh_requested = true;
                }
                KeyCode::Char('x') => {
                    self.alerts.clear();
                }
                KeyCode::Char('?') => {
                    self.show_help = true;
                }
                _ => {}
            },
        }
    }

    /// Moves to the next category tab, wrapping at the end
    fn next_category(&mut self) {
        let index = self.category_index();
        self.category = Category::ALL[(index + 1) % Category::ALL.len()];
    }

    /// Moves to the previous category tab, wrapping at the start
    fn prev_category(&mut self) {
        let index = self.category_index();
        self.category = Category::ALL[(index + Category::ALL.len() - 1) % Category::ALL.len()];
    }

    /// Records a fetch failure in the status line
    ///
    /// Transient failures read as degradation; everything else surfaces the
    /// error itself.
    fn note_failure(&mut self, what: &str, err: &ApiError) {
        if err.is_transient() {
            self.status = Some(format!(
                "backend unavailable for {what}; showing last-known data"
            ));
        } else {
            self.status = Some(format!("{what}: {err}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use serde_json::json;
    use std::path::PathBuf;

    use crate::data::Metric;
    use crate::endpoint::DataMode;

    /// Helper to create a KeyEvent for testing
    fn key_event(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn test_app() -> App {
        App::new(StartupConfig::default())
    }

    fn dashboard_app() -> App {
        let mut app = test_app();
        app.state = AppState::Dashboard;
        app
    }

    fn sample_summary() -> DashboardSummary {
        DashboardSummary {
            metrics: vec![Metric {
                name: "requests".to_string(),
                label: None,
                value: 100.0,
                unit: None,
                delta: None,
            }],
            generated_at: None,
        }
    }

    // ========================================================================
    // Initial State Tests
    // ========================================================================

    #[test]
    fn test_initial_state_is_loading() {
        let app = test_app();
        assert_eq!(app.state, AppState::Loading);
        assert_eq!(app.category, Category::Overview);
        assert!(!app.should_quit);
        assert!(app.summary.is_none());
        assert!(app.charts.is_empty());
        assert!(app.alerts.is_empty());
    }

    #[test]
    fn test_initial_category_from_config() {
        let config = StartupConfig {
            initial_category: Category::Chart(ChartKind::Pie),
            ..StartupConfig::default()
        };
        let app = App::new(config);
        assert_eq!(app.category, Category::Chart(ChartKind::Pie));
    }

    #[test]
    fn test_live_indicator_disabled_without_live_channel() {
        let config = StartupConfig {
            live_enabled: false,
            ..StartupConfig::default()
        };
        let app = App::new(config);
        assert_eq!(app.live_indicator, LiveIndicator::Disabled);
        assert!(app.live_socket().is_none());
    }

    #[test]
    fn test_live_socket_derived_from_base_url() {
        let app = test_app();
        assert_eq!(
            app.live_socket(),
            Some("ws://127.0.0.1:8080/ws/live".to_string())
        );
    }

    #[test]
    fn test_static_mode_reported() {
        let config = StartupConfig {
            mode: DataMode::Static {
                data_dir: PathBuf::from("/srv/dash/data"),
            },
            live_enabled: false,
            ..StartupConfig::default()
        };
        let app = App::new(config);
        assert!(!app.is_live_mode());
    }

    // ========================================================================
    // Key Handling Tests
    // ========================================================================

    #[test]
    fn test_q_quits_from_dashboard() {
        let mut app = dashboard_app();
        assert!(!app.should_quit);

        app.handle_key(key_event(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_esc_quits_from_dashboard() {
        let mut app = dashboard_app();

        app.handle_key(key_event(KeyCode::Esc));
        assert!(app.should_quit);
    }

    #[test]
    fn test_keys_ignored_during_loading() {
        let mut app = test_app();
        assert_eq!(app.state, AppState::Loading);

        app.handle_key(key_event(KeyCode::Tab));
        assert_eq!(app.category, Category::Overview);

        // But q should still work
        app.handle_key(key_event(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_tab_advances_category() {
        let mut app = dashboard_app();
        assert_eq!(app.category, Category::Overview);

        app.handle_key(key_event(KeyCode::Tab));
        assert_eq!(app.category, Category::Chart(ChartKind::Bar));

        app.handle_key(key_event(KeyCode::Char('l')));
        assert_eq!(app.category, Category::Chart(ChartKind::Line));

        app.handle_key(key_event(KeyCode::Right));
        assert_eq!(app.category, Category::Chart(ChartKind::Pie));
    }

    #[test]
    fn test_back_tab_goes_to_previous_category() {
        let mut app = dashboard_app();
        app.category = Category::Chart(ChartKind::Line);

        app.handle_key(key_event(KeyCode::BackTab));
        assert_eq!(app.category, Category::Chart(ChartKind::Bar));

        app.handle_key(key_event(KeyCode::Char('h')));
        assert_eq!(app.category, Category::Overview);
    }

    #[test]
    fn test_category_navigation_wraps() {
        let mut app = dashboard_app();
        app.category = Category::Chart(ChartKind::Surface);

        app.handle_key(key_event(KeyCode::Tab));
        assert_eq!(app.category, Category::Overview, "Should wrap to first tab");

        app.handle_key(key_event(KeyCode::BackTab));
        assert_eq!(
            app.category,
            Category::Chart(ChartKind::Surface),
            "Should wrap to last tab"
        );
    }

    #[test]
    fn test_number_keys_jump_to_tabs() {
        let mut app = dashboard_app();

        app.handle_key(key_event(KeyCode::Char('1')));
        assert_eq!(app.category, Category::Overview);

        app.handle_key(key_event(KeyCode::Char('2')));
        assert_eq!(app.category, Category::Chart(ChartKind::Bar));

        app.handle_key(key_event(KeyCode::Char('6')));
        assert_eq!(app.category, Category::Chart(ChartKind::Surface));
    }

    #[test]
    fn test_r_requests_refresh() {
        let mut app = dashboard_app();
        assert!(!app.refresh_requested);

        app.handle_key(key_event(KeyCode::Char('r')));
        assert!(app.refresh_requested);
    }

    #[test]
    fn test_x_dismisses_alerts() {
        let mut app = dashboard_app();
        app.apply_live_event(LiveEvent::Message(LiveMessage::Alert {
            level: AlertLevel::Info,
            message: "deploy finished".to_string(),
        }));
        assert_eq!(app.alerts.len(), 1);

        app.handle_key(key_event(KeyCode::Char('x')));
        assert!(app.alerts.is_empty());
    }

    #[test]
    fn test_help_overlay_toggles() {
        let mut app = dashboard_app();
        assert!(!app.show_help);

        app.handle_key(key_event(KeyCode::Char('?')));
        assert!(app.show_help);

        app.handle_key(key_event(KeyCode::Char('?')));
        assert!(!app.show_help);
    }

    #[test]
    fn test_help_overlay_intercepts_keys() {
        let mut app = dashboard_app();
        app.show_help = true;

        // Navigation keys do nothing while help is shown
        app.handle_key(key_event(KeyCode::Tab));
        assert_eq!(app.category, Category::Overview);
        assert!(app.show_help);

        // Esc closes help without quitting
        app.handle_key(key_event(KeyCode::Esc));
        assert!(!app.show_help);
        assert!(!app.should_quit);
    }

    // ========================================================================
    // Chart Payload Tests
    // ========================================================================

    #[test]
    fn test_valid_chart_payload_fills_pane() {
        let mut app = dashboard_app();
        let payload = json!({"labels": ["a"], "values": [1.0]});

        app.apply_chart_payload(ChartKind::Bar, Ok(payload));

        let slot = app.chart(ChartKind::Bar).expect("pane should be filled");
        assert_eq!(slot.source, ChartSource::Backend);
    }

    #[test]
    fn test_invalid_chart_payload_falls_back_on_empty_pane() {
        let mut app = dashboard_app();
        let payload = json!({"values": [1.0]});

        app.apply_chart_payload(ChartKind::Bar, Ok(payload));

        let slot = app.chart(ChartKind::Bar).expect("pane should be filled");
        assert_eq!(slot.source, ChartSource::Fallback);
        assert!(app.status.is_some());
    }

    #[test]
    fn test_invalid_chart_payload_keeps_previous_chart() {
        let mut app = dashboard_app();
        let valid = json!({"labels": ["a"], "values": [7.0]});
        app.apply_chart_payload(ChartKind::Bar, Ok(valid));

        let invalid = json!({"labels": ["a"]});
        app.apply_chart_payload(ChartKind::Bar, Ok(invalid));

        // The pane is untouched by the rejected payload.
        let slot = app.chart(ChartKind::Bar).expect("pane should be filled");
        assert_eq!(slot.source, ChartSource::Backend);
        match &slot.data {
            ChartData::Bar { values, .. } => assert_eq!(values, &vec![7.0]),
            _ => panic!("Expected bar chart"),
        }
    }

    #[test]
    fn test_fetch_error_falls_back_on_empty_pane() {
        let mut app = dashboard_app();
        let err = ApiError::Status {
            status: reqwest::StatusCode::BAD_GATEWAY,
            url: "http://dash.example/api/chart/bar".to_string(),
        };

        app.apply_chart_payload(ChartKind::Bar, Err(err));

        let slot = app.chart(ChartKind::Bar).expect("pane should be filled");
        assert_eq!(slot.source, ChartSource::Fallback);
    }

    #[test]
    fn test_transient_failure_reads_as_degradation() {
        let mut app = dashboard_app();
        let err = ApiError::Status {
            status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
            url: "http://dash.example/api/chart/bar".to_string(),
        };

        app.apply_chart_payload(ChartKind::Bar, Err(err));

        let status = app.status.as_deref().expect("status should be set");
        assert!(status.contains("backend unavailable"));
    }

    // ========================================================================
    // Live Event Tests
    // ========================================================================

    #[test]
    fn test_metrics_update_patches_summary() {
        let mut app = dashboard_app();
        app.summary = Some(sample_summary());

        let mut metrics = HashMap::new();
        metrics.insert("requests".to_string(), 130.0);
        app.apply_live_event(LiveEvent::Message(LiveMessage::MetricsUpdate { metrics }));

        let summary = app.summary.as_ref().unwrap();
        assert!((summary.metrics[0].value - 130.0).abs() < f64::EPSILON);
        assert_eq!(summary.metrics[0].delta, Some(30.0));
    }

    #[test]
    fn test_metrics_update_without_summary_is_ignored() {
        let mut app = dashboard_app();
        let mut metrics = HashMap::new();
        metrics.insert("requests".to_string(), 130.0);

        app.apply_live_event(LiveEvent::Message(LiveMessage::MetricsUpdate { metrics }));

        assert!(app.summary.is_none());
    }

    #[test]
    fn test_alerts_are_capped() {
        let mut app = dashboard_app();
        for i in 0..(MAX_ALERTS + 3) {
            app.apply_live_event(LiveEvent::Message(LiveMessage::Alert {
                level: AlertLevel::Warning,
                message: format!("alert {i}"),
            }));
        }

        assert_eq!(app.alerts.len(), MAX_ALERTS);
        // Oldest alerts are dropped first.
        assert_eq!(app.alerts[0].message, "alert 3");
    }

    #[test]
    fn test_status_events_move_live_indicator() {
        let mut app = dashboard_app();

        app.apply_live_event(LiveEvent::Status(LiveStatus::Connected));
        assert_eq!(app.live_indicator, LiveIndicator::Connected);

        app.apply_live_event(LiveEvent::Status(LiveStatus::Reconnecting));
        assert_eq!(app.live_indicator, LiveIndicator::Reconnecting);

        app.apply_live_event(LiveEvent::Status(LiveStatus::Connecting));
        assert_eq!(app.live_indicator, LiveIndicator::Connecting);
    }

    #[test]
    fn test_disconnect_keeps_last_known_values() {
        let mut app = dashboard_app();
        app.summary = Some(sample_summary());

        app.apply_live_event(LiveEvent::Status(LiveStatus::Reconnecting));

        // Display keeps showing the last-known data.
        let summary = app.summary.as_ref().unwrap();
        assert!((summary.metrics[0].value - 100.0).abs() < f64::EPSILON);
    }

    // ========================================================================
    // Category Index Tests
    // ========================================================================

    #[test]
    fn test_category_index_matches_tab_order() {
        let mut app = dashboard_app();
        assert_eq!(app.category_index(), 0);

        app.category = Category::Chart(ChartKind::Surface);
        assert_eq!(app.category_index(), Category::ALL.len() - 1);
    }
}
