//! Core data models for dashtop
//!
//! This module contains the data types used throughout the application for
//! representing dashboard summaries, backend health, and chart categories.

pub mod client;

pub use client::{ApiClient, ApiError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single named metric on the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    /// Stable identifier, used to address the metric in live updates
    pub name: String,
    /// Human-readable label; falls back to `name` when absent
    #[serde(default)]
    pub label: Option<String>,
    /// Current value
    pub value: f64,
    /// Display unit, e.g. "ms" or "req/s"
    #[serde(default)]
    pub unit: Option<String>,
    /// Change since the previous observation, if the backend reports one
    #[serde(default)]
    pub delta: Option<f64>,
}

impl Metric {
    /// Returns the label to display for this metric
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

/// The dashboard summary payload: the top-level metric tiles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// Metrics in display order
    pub metrics: Vec<Metric>,
    /// When the backend generated this snapshot
    #[serde(default)]
    pub generated_at: Option<DateTime<Utc>>,
}

impl DashboardSummary {
    /// Patches the named metric in place with a pushed value
    ///
    /// The delta is recomputed against the previously displayed value.
    /// Returns whether the metric was present; unknown names are ignored by
    /// callers, mirroring a patch against a DOM node that does not exist.
    pub fn patch(&mut self, name: &str, value: f64) -> bool {
        match self.metrics.iter_mut().find(|metric| metric.name == name) {
            Some(metric) => {
                metric.delta = Some(value - metric.value);
                metric.value = value;
                true
            }
            None => false,
        }
    }
}

/// Backend health classified from the wire status string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthState {
    /// Backend reports itself healthy
    Ok,
    /// Backend is up but impaired
    Degraded,
    /// Backend reports itself down
    Down,
    /// Status string was not recognized
    Unknown,
}

impl HealthState {
    /// Classifies a health endpoint status string
    ///
    /// Classification happens here, at the source, rather than by matching
    /// message substrings downstream.
    pub fn from_wire(status: &str) -> Self {
        match status.to_ascii_lowercase().as_str() {
            "ok" | "healthy" | "up" | "green" => HealthState::Ok,
            "degraded" | "warn" | "warning" | "yellow" => HealthState::Degraded,
            "down" | "error" | "critical" | "red" => HealthState::Down,
            _ => HealthState::Unknown,
        }
    }
}

/// Health endpoint result
#[derive(Debug, Clone, PartialEq)]
pub struct Health {
    /// Classified health state
    pub state: HealthState,
    /// Backend version string, if reported
    pub version: Option<String>,
    /// Backend uptime in seconds, if reported
    pub uptime_seconds: Option<u64>,
}

/// The chart types the dashboard can display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
    Scatter3d,
    Surface,
}

impl ChartKind {
    /// All chart kinds in tab order
    pub const ALL: [ChartKind; 5] = [
        ChartKind::Bar,
        ChartKind::Line,
        ChartKind::Pie,
        ChartKind::Scatter3d,
        ChartKind::Surface,
    ];

    /// Logical resource name of this chart's payload
    pub fn resource(&self) -> &'static str {
        match self {
            ChartKind::Bar => "chart/bar",
            ChartKind::Line => "chart/line",
            ChartKind::Pie => "chart/pie",
            ChartKind::Scatter3d => "chart/scatter3d",
            ChartKind::Surface => "chart/surface",
        }
    }

    /// Tab title for this chart kind
    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::Bar => "Bar",
            ChartKind::Line => "Line",
            ChartKind::Pie => "Pie",
            ChartKind::Scatter3d => "Scatter 3D",
            ChartKind::Surface => "Surface",
        }
    }

    /// Parses a chart kind from a user-supplied string
    pub fn from_str(s: &str) -> Option<ChartKind> {
        match s.to_ascii_lowercase().as_str() {
            "bar" => Some(ChartKind::Bar),
            "line" => Some(ChartKind::Line),
            "pie" => Some(ChartKind::Pie),
            "scatter3d" | "scatter" | "3d" => Some(ChartKind::Scatter3d),
            "surface" | "heatmap" => Some(ChartKind::Surface),
            _ => None,
        }
    }
}

/// Dashboard categories shown as tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Summary tiles, alerts, and backend health
    Overview,
    /// A single chart pane
    Chart(ChartKind),
}

impl Category {
    /// All categories in tab order
    pub const ALL: [Category; 6] = [
        Category::Overview,
        Category::Chart(ChartKind::Bar),
        Category::Chart(ChartKind::Line),
        Category::Chart(ChartKind::Pie),
        Category::Chart(ChartKind::Scatter3d),
        Category::Chart(ChartKind::Surface),
    ];

    /// Tab title for this category
    pub fn title(&self) -> &'static str {
        match self {
            Category::Overview => "Overview",
            Category::Chart(kind) => kind.title(),
        }
    }

    /// Parses a category from a user-supplied string
    pub fn from_str(s: &str) -> Option<Category> {
        match s.to_ascii_lowercase().as_str() {
            "overview" | "summary" => Some(Category::Overview),
            other => ChartKind::from_str(other).map(Category::Chart),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_summary() -> DashboardSummary {
        DashboardSummary {
            metrics: vec![
                Metric {
                    name: "requests".to_string(),
                    label: Some("Requests".to_string()),
                    value: 120.0,
                    unit: Some("req/s".to_string()),
                    delta: Some(4.0),
                },
                Metric {
                    name: "latency_p99".to_string(),
                    label: None,
                    value: 250.0,
                    unit: Some("ms".to_string()),
                    delta: None,
                },
            ],
            generated_at: None,
        }
    }

    #[test]
    fn test_metric_display_label_prefers_label() {
        let summary = sample_summary();
        assert_eq!(summary.metrics[0].display_label(), "Requests");
        assert_eq!(summary.metrics[1].display_label(), "latency_p99");
    }

    #[test]
    fn test_summary_deserializes_with_optional_fields_absent() {
        let json = r#"{"metrics": [{"name": "cpu", "value": 0.42}]}"#;
        let summary: DashboardSummary =
            serde_json::from_str(json).expect("Failed to deserialize summary");

        assert_eq!(summary.metrics.len(), 1);
        assert_eq!(summary.metrics[0].name, "cpu");
        assert!(summary.metrics[0].label.is_none());
        assert!(summary.metrics[0].unit.is_none());
        assert!(summary.metrics[0].delta.is_none());
        assert!(summary.generated_at.is_none());
    }

    #[test]
    fn test_summary_rejects_missing_required_fields() {
        // A metric without a value is malformed.
        let json = r#"{"metrics": [{"name": "cpu"}]}"#;
        let result: Result<DashboardSummary, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_patch_updates_value_and_recomputes_delta() {
        let mut summary = sample_summary();

        assert!(summary.patch("requests", 150.0));

        assert!((summary.metrics[0].value - 150.0).abs() < f64::EPSILON);
        assert_eq!(summary.metrics[0].delta, Some(30.0));
    }

    #[test]
    fn test_patch_ignores_unknown_metric() {
        let mut summary = sample_summary();

        assert!(!summary.patch("unknown", 1.0));

        // Existing metrics untouched
        assert!((summary.metrics[0].value - 120.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_health_state_classification() {
        assert_eq!(HealthState::from_wire("ok"), HealthState::Ok);
        assert_eq!(HealthState::from_wire("Healthy"), HealthState::Ok);
        assert_eq!(HealthState::from_wire("UP"), HealthState::Ok);
        assert_eq!(HealthState::from_wire("degraded"), HealthState::Degraded);
        assert_eq!(HealthState::from_wire("warning"), HealthState::Degraded);
        assert_eq!(HealthState::from_wire("down"), HealthState::Down);
        assert_eq!(HealthState::from_wire("critical"), HealthState::Down);
        assert_eq!(HealthState::from_wire("purple"), HealthState::Unknown);
        assert_eq!(HealthState::from_wire(""), HealthState::Unknown);
    }

    #[test]
    fn test_chart_kind_resources_are_distinct() {
        for (i, a) in ChartKind::ALL.iter().enumerate() {
            for (j, b) in ChartKind::ALL.iter().enumerate() {
                if i != j {
                    assert_ne!(a.resource(), b.resource());
                    assert_ne!(a.title(), b.title());
                }
            }
        }
    }

    #[test]
    fn test_chart_kind_from_str_aliases() {
        assert_eq!(ChartKind::from_str("bar"), Some(ChartKind::Bar));
        assert_eq!(ChartKind::from_str("LINE"), Some(ChartKind::Line));
        assert_eq!(ChartKind::from_str("pie"), Some(ChartKind::Pie));
        assert_eq!(ChartKind::from_str("scatter3d"), Some(ChartKind::Scatter3d));
        assert_eq!(ChartKind::from_str("3d"), Some(ChartKind::Scatter3d));
        assert_eq!(ChartKind::from_str("surface"), Some(ChartKind::Surface));
        assert_eq!(ChartKind::from_str("heatmap"), Some(ChartKind::Surface));
        assert_eq!(ChartKind::from_str("donut"), None);
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!(Category::from_str("overview"), Some(Category::Overview));
        assert_eq!(Category::from_str("summary"), Some(Category::Overview));
        assert_eq!(
            Category::from_str("bar"),
            Some(Category::Chart(ChartKind::Bar))
        );
        assert_eq!(Category::from_str("bogus"), None);
    }

    #[test]
    fn test_category_tab_order_starts_with_overview() {
        assert_eq!(Category::ALL[0], Category::Overview);
        assert_eq!(Category::ALL.len(), ChartKind::ALL.len() + 1);
    }
}
