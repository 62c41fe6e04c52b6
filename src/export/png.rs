//! PNG export of the latency chart.
//!
//! The chart is rasterized directly into an RGB buffer: title, plot frame,
//! grid at the same ticks as the live view, tick labels, axis titles, the
//! latency line and its legend.

use std::path::Path;

use image::{ImageFormat, Rgb, RgbImage};
use tracing::info;

use super::font::{draw_text, draw_text_up, put_pixel, text_height, text_width};
use super::ExportError;
use crate::data::chart::{tick_values, ChartData, SERIES_LABEL, TITLE, X_TITLE, Y_TITLE};

const MARGIN_LEFT: u32 = 90;
const MARGIN_RIGHT: u32 = 20;
const MARGIN_TOP: u32 = 50;
const MARGIN_BOTTOM: u32 = 64;

/// Glyph scale for tick labels, axis titles and the legend.
const LABEL_SCALE: u32 = 2;
/// Glyph scale for the chart title.
const TITLE_SCALE: u32 = 3;

/// Gap between the plot frame and tick labels.
const LABEL_GAP: f64 = 8.0;
/// Distance from the image's left edge to the rotated y axis title.
const Y_TITLE_LEFT: i64 = 10;

/// Inner padding and line sample length of the legend box.
const LEGEND_PADDING: u32 = 6;
const LEGEND_SWATCH: u32 = 24;

/// Colors used when rasterizing the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageStyle {
    pub background: [u8; 3],
    pub foreground: [u8; 3],
    pub grid: [u8; 3],
    pub line: [u8; 3],
}

impl ImageStyle {
    /// White background with a red line.
    pub fn light() -> Self {
        Self {
            background: [0xff, 0xff, 0xff],
            foreground: [0x00, 0x00, 0x00],
            grid: [0xcc, 0xcc, 0xcc],
            line: [0xff, 0x3b, 0x3b],
        }
    }

    /// Near-black background with a blue line.
    pub fn dark() -> Self {
        Self {
            background: [0x12, 0x12, 0x12],
            foreground: [0xff, 0xff, 0xff],
            grid: [0x44, 0x44, 0x44],
            line: [0x1f, 0x77, 0xb4],
        }
    }
}

/// Size and colors of an exported chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageOptions {
    pub width: u32,
    pub height: u32,
    pub style: ImageStyle,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 480,
            style: ImageStyle::light(),
        }
    }
}

/// Render the chart for `samples` and save it as a PNG at `path`.
pub fn export_image(
    samples: &[f64],
    path: &Path,
    options: &ImageOptions,
) -> Result<(), ExportError> {
    if samples.is_empty() {
        return Err(ExportError::EmptySeries);
    }

    let chart = ChartData::from_samples(samples);
    render_chart(&chart, options).save_with_format(path, ImageFormat::Png)?;

    info!(path = %path.display(), samples = samples.len(), "exported chart image");
    Ok(())
}

/// Maps data coordinates into the plot rectangle.
struct Plot {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

impl Plot {
    fn new(chart: &ChartData, options: &ImageOptions) -> Self {
        Self {
            left: MARGIN_LEFT as f64,
            top: MARGIN_TOP as f64,
            width: options.width.saturating_sub(MARGIN_LEFT + MARGIN_RIGHT).max(1) as f64,
            height: options.height.saturating_sub(MARGIN_TOP + MARGIN_BOTTOM).max(1) as f64,
            x_bounds: chart.x_bounds,
            y_bounds: chart.y_bounds,
        }
    }

    fn x(&self, value: f64) -> f64 {
        let span = self.x_bounds[1] - self.x_bounds[0];
        self.left + (value - self.x_bounds[0]) / span * self.width
    }

    fn y(&self, value: f64) -> f64 {
        let span = self.y_bounds[1] - self.y_bounds[0];
        self.top + self.height - (value - self.y_bounds[0]) / span * self.height
    }

    fn right(&self) -> f64 {
        self.left + self.width
    }

    fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Legend box `(x, y, width, height)` in the top-right corner of the plot.
    fn legend(&self) -> (i64, i64, u32, u32) {
        let width = LEGEND_PADDING * 4 + LEGEND_SWATCH + text_width(SERIES_LABEL, LABEL_SCALE);
        let height = LEGEND_PADDING * 2 + text_height(LABEL_SCALE);
        let x = self.right() as i64 - width as i64 - 10;
        let y = self.top as i64 + 10;
        (x, y, width, height)
    }
}

/// Rasterize a chart into an image of the configured size.
pub fn render_chart(chart: &ChartData, options: &ImageOptions) -> RgbImage {
    let style = options.style;
    let mut img = RgbImage::from_pixel(options.width, options.height, Rgb(style.background));
    let plot = Plot::new(chart, options);
    let label_height = text_height(LABEL_SCALE) as f64;

    // Title
    let title_x = (options.width as f64 - text_width(TITLE, TITLE_SCALE) as f64) / 2.0;
    let title_y = (MARGIN_TOP as f64 - text_height(TITLE_SCALE) as f64) / 2.0;
    draw_text(
        &mut img,
        TITLE,
        title_x as i64,
        title_y as i64,
        TITLE_SCALE,
        style.foreground,
    );

    // Grid and tick labels
    for (value, label) in tick_values(chart.x_bounds).zip(chart.x_labels()) {
        let x = plot.x(value);
        draw_line(&mut img, (x, plot.top), (x, plot.bottom()), style.grid);
        let label_width = text_width(&label, LABEL_SCALE) as f64;
        draw_text(
            &mut img,
            &label,
            (x - label_width / 2.0) as i64,
            (plot.bottom() + LABEL_GAP) as i64,
            LABEL_SCALE,
            style.foreground,
        );
    }
    for (value, label) in tick_values(chart.y_bounds).zip(chart.y_labels()) {
        let y = plot.y(value);
        draw_line(&mut img, (plot.left, y), (plot.right(), y), style.grid);
        let label_width = text_width(&label, LABEL_SCALE) as f64;
        draw_text(
            &mut img,
            &label,
            (plot.left - label_width - LABEL_GAP) as i64,
            (y - label_height / 2.0) as i64,
            LABEL_SCALE,
            style.foreground,
        );
    }

    // Axis titles
    let x_title_width = text_width(X_TITLE, LABEL_SCALE) as f64;
    draw_text(
        &mut img,
        X_TITLE,
        (plot.left + (plot.width - x_title_width) / 2.0) as i64,
        (plot.bottom() + LABEL_GAP * 2.0 + label_height + 4.0) as i64,
        LABEL_SCALE,
        style.foreground,
    );
    let y_title_height = text_width(Y_TITLE, LABEL_SCALE) as f64;
    draw_text_up(
        &mut img,
        Y_TITLE,
        Y_TITLE_LEFT,
        (plot.top + (plot.height + y_title_height) / 2.0) as i64,
        LABEL_SCALE,
        style.foreground,
    );

    // Frame
    let corners = [
        (plot.left, plot.top),
        (plot.right(), plot.top),
        (plot.right(), plot.bottom()),
        (plot.left, plot.bottom()),
    ];
    draw_polygon(&mut img, &corners, style.foreground);

    // Latency line, two pixels thick
    let pixels: Vec<(f64, f64)> = chart
        .points
        .iter()
        .map(|&(x, y)| (plot.x(x), plot.y(y)))
        .collect();
    match pixels.as_slice() {
        [] => {}
        [single] => draw_line(&mut img, *single, *single, style.line),
        _ => {
            for pair in pixels.windows(2) {
                draw_thick_line(&mut img, pair[0], pair[1], style.line);
            }
        }
    }

    draw_legend(&mut img, &plot, &style);
    img
}

/// Opaque legend box with a line sample and the series label.
fn draw_legend(img: &mut RgbImage, plot: &Plot, style: &ImageStyle) {
    let (x, y, width, height) = plot.legend();
    for dy in 0..height as i64 {
        for dx in 0..width as i64 {
            put_pixel(img, x + dx, y + dy, style.background);
        }
    }

    let (left, top) = (x as f64, y as f64);
    let (right, bottom) = (left + width as f64 - 1.0, top + height as f64 - 1.0);
    draw_polygon(
        img,
        &[(left, top), (right, top), (right, bottom), (left, bottom)],
        style.foreground,
    );

    let padding = LEGEND_PADDING as f64;
    let middle = top + height as f64 / 2.0;
    let swatch_start = left + padding;
    let swatch_end = swatch_start + LEGEND_SWATCH as f64;
    draw_thick_line(img, (swatch_start, middle - 1.0), (swatch_end, middle - 1.0), style.line);

    draw_text(
        img,
        SERIES_LABEL,
        (swatch_end + padding) as i64,
        y + LEGEND_PADDING as i64,
        LABEL_SCALE,
        style.foreground,
    );
}

/// Closed outline through `corners`.
fn draw_polygon(img: &mut RgbImage, corners: &[(f64, f64)], color: [u8; 3]) {
    for i in 0..corners.len() {
        draw_line(img, corners[i], corners[(i + 1) % corners.len()], color);
    }
}

/// Two-pixel line: the segment and a copy one pixel below.
fn draw_thick_line(img: &mut RgbImage, from: (f64, f64), to: (f64, f64), color: [u8; 3]) {
    draw_line(img, from, to, color);
    draw_line(img, (from.0, from.1 + 1.0), (to.0, to.1 + 1.0), color);
}

/// Bresenham line between two points; pixels outside the image are clipped.
fn draw_line(img: &mut RgbImage, from: (f64, f64), to: (f64, f64), color: [u8; 3]) {
    let (mut x0, mut y0) = (from.0.round() as i64, from.1.round() as i64);
    let (x1, y1) = (to.0.round() as i64, to.1.round() as i64);

    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        put_pixel(img, x0, y0, color);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn count_color(img: &RgbImage, color: [u8; 3]) -> usize {
        img.pixels().filter(|p| p.0 == color).count()
    }

    #[test]
    fn test_render_dimensions_and_background() {
        let chart = ChartData::from_samples(&[10.0, 20.0, 15.0]);
        let options = ImageOptions {
            width: 320,
            height: 200,
            style: ImageStyle::dark(),
        };
        let img = render_chart(&chart, &options);

        assert_eq!(img.dimensions(), (320, 200));
        assert_eq!(img.get_pixel(0, 0).0, ImageStyle::dark().background);
        assert!(count_color(&img, ImageStyle::dark().line) > 0);
    }

    #[test]
    fn test_failure_drops_line_to_baseline() {
        let options = ImageOptions::default();
        let chart = ChartData::from_samples(&[40.0, 0.0, 40.0]);
        let img = render_chart(&chart, &options);

        // The middle sample sits on the x axis, in the middle of the plot
        let plot_width = options.width - MARGIN_LEFT - MARGIN_RIGHT;
        let x = MARGIN_LEFT + plot_width / 2;
        let y = options.height - MARGIN_BOTTOM;
        assert_eq!(img.get_pixel(x, y).0, options.style.line);
    }

    #[test]
    fn test_export_writes_png() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ping_graph.png");

        export_image(&[12.0, 0.0, 14.5], &path, &ImageOptions::default()).unwrap();

        let loaded = image::open(&path).unwrap();
        assert_eq!(loaded.width(), 800);
        assert_eq!(loaded.height(), 480);
    }

    #[test]
    fn test_empty_series_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.png");

        let err = export_image(&[], &path, &ImageOptions::default()).unwrap_err();
        assert!(matches!(err, ExportError::EmptySeries));
        assert!(!path.exists());
    }

    #[test]
    fn test_unwritable_path() {
        let path = Path::new("/nonexistent/dir/g.png");
        let err = export_image(&[1.0], path, &ImageOptions::default()).unwrap_err();
        assert!(matches!(err, ExportError::Image(_)));
    }

    #[test]
    fn test_title_axis_titles_and_legend_are_drawn() {
        let options = ImageOptions::default();
        let style = options.style;
        let chart = ChartData::from_samples(&[10.0, 20.0, 15.0]);
        let img = render_chart(&chart, &options);

        let ink = |x0: u32, y0: u32, x1: u32, y1: u32, color: [u8; 3]| {
            (y0..y1)
                .flat_map(|y| (x0..x1).map(move |x| (x, y)))
                .filter(|&(x, y)| img.get_pixel(x, y).0 == color)
                .count()
        };

        // Title band above the plot
        assert!(ink(0, 0, options.width, MARGIN_TOP, style.foreground) > 0);
        // X axis title below the tick labels
        let below_labels = options.height - MARGIN_BOTTOM + 20;
        assert!(ink(0, below_labels, options.width, options.height, style.foreground) > 0);
        // Rotated y axis title at the left edge
        assert!(ink(0, 0, 24, options.height, style.foreground) > 0);

        // Legend: line sample and label inside an opaque box
        let plot = Plot::new(&chart, &options);
        let (x, y, width, height) = plot.legend();
        let (x, y) = (x as u32, y as u32);
        let swatch_end = x + LEGEND_PADDING + LEGEND_SWATCH;
        assert!(ink(x, y, swatch_end, y + height, style.line) > 0);
        assert!(ink(swatch_end, y + 1, x + width - 1, y + height - 1, style.foreground) > 0);
    }

    #[test]
    fn test_legend_fits_small_images() {
        let options = ImageOptions {
            width: 320,
            height: 200,
            style: ImageStyle::light(),
        };
        let plot = Plot::new(&ChartData::from_samples(&[1.0]), &options);
        let (x, _, width, _) = plot.legend();
        assert!(x as f64 > plot.left);
        assert!(((x + width as i64) as f64) < plot.right());
    }
}
