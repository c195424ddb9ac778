//! Segmented ratio bar widget for proportional breakdowns

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Color,
    widgets::Widget,
};

/// A one-row bar split into colored segments proportional to their values
///
/// Non-positive values contribute no segment. Segment boundaries are placed
/// on cumulative fractions so rounding drift never pushes the bar past the
/// area width.
pub struct RatioBar<'a> {
    /// Segment values
    values: &'a [f64],
    /// Segment colors, cycled when shorter than `values`
    colors: &'a [Color],
}

impl<'a> RatioBar<'a> {
    pub fn new(values: &'a [f64], colors: &'a [Color]) -> Self {
        Self { values, colors }
    }

    /// Total of the positive values
    fn total(&self) -> f64 {
        self.values.iter().filter(|value| **value > 0.0).sum()
    }
}

impl Widget for RatioBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let total = self.total();
        if total <= 0.0 || self.colors.is_empty() {
            return;
        }

        let width = area.width as usize;
        let mut start = 0usize;
        let mut cumulative = 0.0;

        for (i, value) in self.values.iter().enumerate() {
            if *value <= 0.0 {
                continue;
            }
            cumulative += *value;
            let end = ((cumulative / total) * width as f64).round() as usize;
            let color = self.colors[i % self.colors.len()];

            for x in start..end.min(width) {
                if let Some(cell) = buf.cell_mut((area.x + x as u16, area.y)) {
                    cell.set_char('█').set_fg(color);
                }
            }
            start = end;
        }
    }
}
