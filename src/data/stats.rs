//! Summary statistics over a latency series.

use super::series::FAILED_SAMPLE;

/// Aggregates shown in the header: counts, loss and latency spread.
///
/// Failed samples count towards `failures` and `loss_percent` but are
/// excluded from `min`/`avg`/`max`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesStats {
    pub count: usize,
    pub failures: usize,
    pub loss_percent: f64,
    pub min: Option<f64>,
    pub avg: Option<f64>,
    pub max: Option<f64>,
    pub last: Option<f64>,
}

impl SeriesStats {
    /// Compute statistics for a slice of samples.
    pub fn from_samples(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }

        let replies: Vec<f64> = samples.iter().copied().filter(|&v| v != FAILED_SAMPLE).collect();
        let failures = samples.len() - replies.len();

        let (min, max, avg) = if replies.is_empty() {
            (None, None, None)
        } else {
            let min = replies.iter().copied().fold(f64::INFINITY, f64::min);
            let max = replies.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let avg = replies.iter().sum::<f64>() / replies.len() as f64;
            (Some(min), Some(max), Some(avg))
        };

        Self {
            count: samples.len(),
            failures,
            loss_percent: failures as f64 / samples.len() as f64 * 100.0,
            min,
            avg,
            max,
            last: samples.last().copied(),
        }
    }
}

/// Format an optional latency for display ("-" when absent).
pub fn format_latency(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1}ms", v),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_series() {
        let stats = SeriesStats::from_samples(&[]);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.loss_percent, 0.0);
        assert!(stats.avg.is_none());
    }

    #[test]
    fn test_failures_excluded_from_spread() {
        let stats = SeriesStats::from_samples(&[50.0, 0.0, 12.5, 20.5]);
        assert_eq!(stats.count, 4);
        assert_eq!(stats.failures, 1);
        assert_eq!(stats.loss_percent, 25.0);
        assert_eq!(stats.min, Some(12.5));
        assert_eq!(stats.max, Some(50.0));
        assert_eq!(stats.avg, Some(27.666666666666668));
        assert_eq!(stats.last, Some(20.5));
    }

    #[test]
    fn test_all_failures() {
        let stats = SeriesStats::from_samples(&[0.0, 0.0, 0.0]);
        assert_eq!(stats.failures, 3);
        assert_eq!(stats.loss_percent, 100.0);
        assert!(stats.min.is_none());
        assert_eq!(stats.last, Some(0.0));
    }

    #[test]
    fn test_format_latency() {
        assert_eq!(format_latency(Some(12.345)), "12.3ms");
        assert_eq!(format_latency(None), "-");
    }
}
