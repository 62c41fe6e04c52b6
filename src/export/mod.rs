//! Snapshot exports of the latency series.
//!
//! - [`export_table`]: comma-separated `Index,Latency (ms)` rows
//! - [`export_image`]: the latency chart as a PNG
//!
//! Both refuse an empty series and write nothing in that case.

mod font;
mod png;
mod table;

pub use png::{export_image, render_chart, ImageOptions, ImageStyle};
pub use table::{export_table, read_table, TABLE_HEADER};

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use thiserror::Error;

/// Errors raised while exporting.
#[derive(Debug, Error)]
pub enum ExportError {
    /// There are no samples to export.
    #[error("no data to export")]
    EmptySeries,

    #[error("failed to write file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),

    /// A table being read back contains a row that is not a sample.
    #[error("malformed row {row}: {reason}")]
    Malformed { row: usize, reason: String },
}

/// The two export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Image,
    Table,
}

impl ExportKind {
    pub fn prefix(self) -> &'static str {
        match self {
            ExportKind::Image => "ping_graph",
            ExportKind::Table => "ping_log",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportKind::Image => "png",
            ExportKind::Table => "csv",
        }
    }

    /// Default file name stamped with `now`, e.g. `ping_log_20240131_235959.csv`.
    pub fn default_filename(self, now: &DateTime<Local>) -> String {
        format!(
            "{}_{}.{}",
            self.prefix(),
            now.format("%Y%m%d_%H%M%S"),
            self.extension()
        )
    }

    /// Default-named path inside `dir`, stamped with the current local time.
    pub fn default_path(self, dir: &Path) -> PathBuf {
        dir.join(self.default_filename(&Local::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_default_filenames() {
        let now = Local.with_ymd_and_hms(2024, 1, 31, 23, 59, 58).unwrap();
        assert_eq!(
            ExportKind::Image.default_filename(&now),
            "ping_graph_20240131_235958.png"
        );
        assert_eq!(
            ExportKind::Table.default_filename(&now),
            "ping_log_20240131_235958.csv"
        );
    }

    #[test]
    fn test_default_path_in_directory() {
        let path = ExportKind::Table.default_path(Path::new("/tmp/exports"));
        assert!(path.starts_with("/tmp/exports"));
        let name = path.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("ping_log_"));
        assert!(name.ends_with(".csv"));
        // ping_log_ + YYYYMMDD_HHMMSS + .csv
        assert_eq!(name.len(), "ping_log_".len() + 15 + ".csv".len());
    }
}
