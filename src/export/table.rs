//! CSV export of the series.

use std::path::Path;

use tracing::info;

use super::ExportError;
use crate::data::FAILED_SAMPLE;

/// Header row of exported tables.
pub const TABLE_HEADER: [&str; 2] = ["Index", "Latency (ms)"];

/// Write one `(position + 1, value)` row per sample under [`TABLE_HEADER`].
///
/// Latencies keep a decimal point (`50.0`, `12.5`) and parse back to the
/// same number; failed probes are written as `0`.
pub fn export_table(samples: &[f64], path: &Path) -> Result<(), ExportError> {
    if samples.is_empty() {
        return Err(ExportError::EmptySeries);
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(TABLE_HEADER)?;
    for (i, value) in samples.iter().enumerate() {
        writer.write_record([(i + 1).to_string(), format_value(*value)])?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = samples.len(), "exported table");
    Ok(())
}

/// Read a table written by [`export_table`] back into samples.
pub fn read_table(path: &Path) -> Result<Vec<f64>, ExportError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut samples = Vec::new();

    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let row = i + 1;
        let index: usize = record
            .get(0)
            .and_then(|v| v.trim().parse().ok())
            .ok_or_else(|| malformed(row, "missing or invalid index"))?;
        if index != row {
            return Err(malformed(row, &format!("expected index {}, found {}", row, index)));
        }
        let value: f64 = record
            .get(1)
            .and_then(|v| v.trim().parse().ok())
            .ok_or_else(|| malformed(row, "missing or invalid latency"))?;
        samples.push(value);
    }

    Ok(samples)
}

fn format_value(value: f64) -> String {
    if value == FAILED_SAMPLE {
        "0".to_string()
    } else {
        format!("{:?}", value)
    }
}

fn malformed(row: usize, reason: &str) -> ExportError {
    ExportError::Malformed {
        row,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_export_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ping_log.csv");

        export_table(&[50.0, 0.0, 12.5], &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "Index,Latency (ms)\n1,50.0\n2,0\n3,12.5\n");
    }

    #[test]
    fn test_value_formatting() {
        assert_eq!(format_value(50.0), "50.0");
        assert_eq!(format_value(FAILED_SAMPLE), "0");
        assert_eq!(format_value(0.25), "0.25");
        assert_eq!(format_value(1e16).parse::<f64>().unwrap(), 1e16);
    }

    #[test]
    fn test_round_trip_is_exact() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ping_log.csv");
        let samples = vec![50.0, 0.0, 12.5, 0.1 + 0.2, 123.456789];

        export_table(&samples, &path).unwrap();
        assert_eq!(read_table(&path).unwrap(), samples);
    }

    #[test]
    fn test_empty_series_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.csv");

        let err = export_table(&[], &path).unwrap_err();
        assert!(matches!(err, ExportError::EmptySeries));
        assert!(!path.exists());
    }

    #[test]
    fn test_unwritable_path() {
        let err = export_table(&[1.0], Path::new("/nonexistent/dir/log.csv")).unwrap_err();
        assert!(matches!(err, ExportError::Csv(_) | ExportError::Io(_)));
    }

    #[test]
    fn test_read_rejects_malformed_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "Index,Latency (ms)\n1,10\n2,fast\n").unwrap();

        let err = read_table(&path).unwrap_err();
        assert!(matches!(err, ExportError::Malformed { row: 2, .. }));
    }
}
