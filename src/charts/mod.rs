//! Chart payload validation and chart models
//!
//! This module is the adapter between raw JSON chart payloads and the data
//! the renderers consume. `ChartData::from_value` validates that the fields
//! a chart kind requires are present and consistently sized; a payload that
//! fails validation yields a typed error and the caller keeps whatever was
//! previously displayed. `fallback` supplies deterministic demo data so an
//! empty pane can degrade gracefully instead of going blank.

use ratatui::style::Color;
use serde_json::Value;
use thiserror::Error;

use crate::data::ChartKind;

/// Default series colors, cycled when a payload carries none
const PALETTE: [Color; 8] = [
    Color::Cyan,
    Color::Yellow,
    Color::Green,
    Color::Magenta,
    Color::Blue,
    Color::LightRed,
    Color::LightGreen,
    Color::Gray,
];

/// Errors produced by chart payload validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChartError {
    /// A required field is absent
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// A field is present but not an array of the expected type
    #[error("field `{0}` is not an array of the expected type")]
    BadField(&'static str),

    /// Parallel arrays disagree on length
    #[error("field `{field}` has {actual} entries, expected {expected}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The payload validates structurally but carries no data points
    #[error("chart payload has no data points")]
    Empty,
}

/// A named series in a line chart
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
}

/// Validated chart payload ready for rendering
#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    Bar {
        labels: Vec<String>,
        values: Vec<f64>,
        colors: Vec<Color>,
    },
    Line {
        labels: Vec<String>,
        series: Vec<Series>,
    },
    Pie {
        labels: Vec<String>,
        values: Vec<f64>,
        colors: Vec<Color>,
    },
    Scatter3d {
        x: Vec<f64>,
        y: Vec<f64>,
        z: Vec<f64>,
    },
    Surface {
        z: Vec<Vec<f64>>,
    },
}

impl ChartData {
    /// Validates a raw payload against the requirements of a chart kind
    pub fn from_value(kind: ChartKind, value: &Value) -> Result<ChartData, ChartError> {
        match kind {
            ChartKind::Bar => {
                let (labels, values, colors) = categorical(value)?;
                Ok(ChartData::Bar {
                    labels,
                    values,
                    colors,
                })
            }
            ChartKind::Pie => {
                let (labels, values, colors) = categorical(value)?;
                Ok(ChartData::Pie {
                    labels,
                    values,
                    colors,
                })
            }
            ChartKind::Line => {
                let labels = string_array(value, "labels")?;
                if labels.is_empty() {
                    return Err(ChartError::Empty);
                }
                let raw_series = value
                    .get("series")
                    .ok_or(ChartError::MissingField("series"))?
                    .as_array()
                    .ok_or(ChartError::BadField("series"))?;
                if raw_series.is_empty() {
                    return Err(ChartError::Empty);
                }
                let mut series = Vec::with_capacity(raw_series.len());
                for entry in raw_series {
                    let name = entry
                        .get("name")
                        .and_then(Value::as_str)
                        .ok_or(ChartError::MissingField("name"))?
                        .to_string();
                    let values = number_array(entry, "values")?;
                    if values.len() != labels.len() {
                        return Err(ChartError::LengthMismatch {
                            field: "values",
                            expected: labels.len(),
                            actual: values.len(),
                        });
                    }
                    series.push(Series { name, values });
                }
                Ok(ChartData::Line { labels, series })
            }
            ChartKind::Scatter3d => {
                let x = number_array(value, "x")?;
                let y = number_array(value, "y")?;
                let z = number_array(value, "z")?;
                if x.is_empty() {
                    return Err(ChartError::Empty);
                }
                if y.len() != x.len() {
                    return Err(ChartError::LengthMismatch {
                        field: "y",
                        expected: x.len(),
                        actual: y.len(),
                    });
                }
                if z.len() != x.len() {
                    return Err(ChartError::LengthMismatch {
                        field: "z",
                        expected: x.len(),
                        actual: z.len(),
                    });
                }
                Ok(ChartData::Scatter3d { x, y, z })
            }
            ChartKind::Surface => {
                let raw_rows = value
                    .get("z")
                    .ok_or(ChartError::MissingField("z"))?
                    .as_array()
                    .ok_or(ChartError::BadField("z"))?;
                if raw_rows.is_empty() {
                    return Err(ChartError::Empty);
                }
                let mut rows = Vec::with_capacity(raw_rows.len());
                let mut width = None;
                for raw_row in raw_rows {
                    let row = raw_row
                        .as_array()
                        .ok_or(ChartError::BadField("z"))?
                        .iter()
                        .map(|cell| cell.as_f64().ok_or(ChartError::BadField("z")))
                        .collect::<Result<Vec<f64>, ChartError>>()?;
                    if row.is_empty() {
                        return Err(ChartError::Empty);
                    }
                    match width {
                        None => width = Some(row.len()),
                        Some(expected) if expected != row.len() => {
                            return Err(ChartError::LengthMismatch {
                                field: "z",
                                expected,
                                actual: row.len(),
                            });
                        }
                        Some(_) => {}
                    }
                    rows.push(row);
                }
                Ok(ChartData::Surface { z: rows })
            }
        }
    }

    /// The chart kind this payload renders as
    pub fn kind(&self) -> ChartKind {
        match self {
            ChartData::Bar { .. } => ChartKind::Bar,
            ChartData::Line { .. } => ChartKind::Line,
            ChartData::Pie { .. } => ChartKind::Pie,
            ChartData::Scatter3d { .. } => ChartKind::Scatter3d,
            ChartData::Surface { .. } => ChartKind::Surface,
        }
    }
}

/// Validates the shared labels/values/colors shape of bar and pie payloads
fn categorical(value: &Value) -> Result<(Vec<String>, Vec<f64>, Vec<Color>), ChartError> {
    let labels = string_array(value, "labels")?;
    let values = number_array(value, "values")?;
    if labels.is_empty() {
        return Err(ChartError::Empty);
    }
    if values.len() != labels.len() {
        return Err(ChartError::LengthMismatch {
            field: "values",
            expected: labels.len(),
            actual: values.len(),
        });
    }
    let colors = optional_colors(value, labels.len())?;
    Ok((labels, values, colors))
}

/// Extracts a required array of strings
fn string_array(value: &Value, field: &'static str) -> Result<Vec<String>, ChartError> {
    value
        .get(field)
        .ok_or(ChartError::MissingField(field))?
        .as_array()
        .ok_or(ChartError::BadField(field))?
        .iter()
        .map(|entry| {
            entry
                .as_str()
                .map(str::to_string)
                .ok_or(ChartError::BadField(field))
        })
        .collect()
}

/// Extracts a required array of numbers
fn number_array(value: &Value, field: &'static str) -> Result<Vec<f64>, ChartError> {
    value
        .get(field)
        .ok_or(ChartError::MissingField(field))?
        .as_array()
        .ok_or(ChartError::BadField(field))?
        .iter()
        .map(|entry| entry.as_f64().ok_or(ChartError::BadField(field)))
        .collect()
}

/// Extracts the optional `colors` field, falling back to the palette
///
/// When present, the array must match the label count and every entry must
/// be a `#rrggbb` hex string.
fn optional_colors(value: &Value, len: usize) -> Result<Vec<Color>, ChartError> {
    match value.get("colors") {
        None | Some(Value::Null) => Ok(palette(len)),
        Some(_) => {
            let raw = string_array(value, "colors")?;
            if raw.len() != len {
                return Err(ChartError::LengthMismatch {
                    field: "colors",
                    expected: len,
                    actual: raw.len(),
                });
            }
            raw.iter()
                .map(|entry| parse_hex_color(entry).ok_or(ChartError::BadField("colors")))
                .collect()
        }
    }
}

/// Parses a `#rrggbb` hex string into a terminal color
pub fn parse_hex_color(s: &str) -> Option<Color> {
    let hex = s.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

/// Produces `len` colors by cycling the default palette
fn palette(len: usize) -> Vec<Color> {
    (0..len).map(|i| PALETTE[i % PALETTE.len()]).collect()
}

/// Deterministic demo data for a chart kind
///
/// Substituted by callers when a pane has nothing else to show; panes filled
/// this way are tagged as demo data in the UI.
pub fn fallback(kind: ChartKind) -> ChartData {
    match kind {
        ChartKind::Bar => ChartData::Bar {
            labels: ["api", "web", "worker", "cron"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            values: vec![42.0, 28.0, 17.0, 9.0],
            colors: palette(4),
        },
        ChartKind::Line => ChartData::Line {
            labels: ["00", "04", "08", "12", "16", "20"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            series: vec![
                Series {
                    name: "requests".to_string(),
                    values: vec![120.0, 80.0, 95.0, 160.0, 210.0, 140.0],
                },
                Series {
                    name: "errors".to_string(),
                    values: vec![3.0, 1.0, 2.0, 6.0, 8.0, 4.0],
                },
            ],
        },
        ChartKind::Pie => ChartData::Pie {
            labels: ["2xx", "3xx", "4xx", "5xx"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            values: vec![82.0, 9.0, 6.0, 3.0],
            colors: vec![Color::Green, Color::Cyan, Color::Yellow, Color::Red],
        },
        ChartKind::Scatter3d => {
            let points = 24;
            let mut x = Vec::with_capacity(points);
            let mut y = Vec::with_capacity(points);
            let mut z = Vec::with_capacity(points);
            for i in 0..points {
                let t = i as f64 / points as f64;
                x.push((t * 6.0).cos() * (1.0 + t));
                y.push((t * 6.0).sin() * (1.0 + t));
                z.push(t * 10.0);
            }
            ChartData::Scatter3d { x, y, z }
        }
        ChartKind::Surface => {
            let rows = 8;
            let cols = 16;
            let z = (0..rows)
                .map(|i| {
                    (0..cols)
                        .map(|j| ((i as f64 * 0.7).sin() + (j as f64 * 0.4).cos()) * 5.0)
                        .collect()
                })
                .collect();
            ChartData::Surface { z }
        }
    }
}
