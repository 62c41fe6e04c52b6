//! Chart model shared by the live view and the image exporter.

/// Headroom added above the highest sample so the line never touches the top edge.
const Y_HEADROOM: f64 = 1.1;

/// Smallest y range, so an all-failure series still gets a visible axis.
const MIN_Y_SPAN: f64 = 1.0;

/// Number of labelled ticks on each axis.
pub const AXIS_TICKS: usize = 5;

/// Chart title.
pub const TITLE: &str = "Latency over time";
/// X axis title.
pub const X_TITLE: &str = "Requests";
/// Y axis title.
pub const Y_TITLE: &str = "Time (ms)";
/// Legend entry for the latency line.
pub const SERIES_LABEL: &str = "Latency (ms)";

/// A full redraw of the latency line: every sample as `(index, value)`
/// plus axis bounds fitted to the data.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub points: Vec<(f64, f64)>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

impl ChartData {
    /// Build the chart from samples; index is the 0-based position.
    pub fn from_samples(samples: &[f64]) -> Self {
        let points: Vec<(f64, f64)> =
            samples.iter().enumerate().map(|(i, &v)| (i as f64, v)).collect();

        let x_max = (samples.len().saturating_sub(1) as f64).max(1.0);
        let y_max = samples.iter().copied().fold(0.0_f64, f64::max) * Y_HEADROOM;

        Self {
            points,
            x_bounds: [0.0, x_max],
            y_bounds: [0.0, y_max.max(MIN_Y_SPAN)],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Evenly spaced tick labels for the x axis (request numbers).
    pub fn x_labels(&self) -> Vec<String> {
        tick_values(self.x_bounds).map(|v| format!("{:.0}", v)).collect()
    }

    /// Evenly spaced tick labels for the y axis (milliseconds).
    pub fn y_labels(&self) -> Vec<String> {
        tick_values(self.y_bounds).map(|v| format!("{:.1}", v)).collect()
    }
}

/// Tick positions from `bounds[0]` to `bounds[1]` inclusive.
pub fn tick_values(bounds: [f64; 2]) -> impl Iterator<Item = f64> {
    let step = (bounds[1] - bounds[0]) / (AXIS_TICKS - 1) as f64;
    (0..AXIS_TICKS).map(move |i| bounds[0] + step * i as f64)
}
