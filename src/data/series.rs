//! The shared latency series.

use std::sync::Arc;

use parking_lot::RwLock;

/// Sample value recorded for a failed probe.
pub const FAILED_SAMPLE: f64 = 0.0;

#[derive(Debug, Default)]
struct SeriesState {
    samples: Vec<f64>,
    /// Bumped on every clear so a finished session cannot append to the next one.
    generation: u64,
}

/// Ordered, append-only sequence of latency samples in milliseconds.
///
/// `0` marks a failed probe. The series is a cheap cloneable handle: the
/// sampler appends through one clone while the UI and exporters read
/// snapshots through another.
///
/// # Example
///
/// ```
/// use pingplot::Series;
///
/// let series = Series::new();
/// let generation = series.reset();
/// series.push(generation, 12.5);
/// series.push(generation, 0.0);
/// assert_eq!(series.snapshot(), vec![12.5, 0.0]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Series {
    inner: Arc<RwLock<SeriesState>>,
}

impl Series {
    /// Create an empty series.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a series pre-filled with samples (used for replays and tests).
    pub fn from_samples(samples: Vec<f64>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(SeriesState {
                samples,
                generation: 0,
            })),
        }
    }

    /// Empty the series for a new session and return the session's generation.
    pub fn reset(&self) -> u64 {
        let mut state = self.inner.write();
        state.samples.clear();
        state.generation += 1;
        state.generation
    }

    /// Append a sample for the given session.
    ///
    /// Returns `false` (and appends nothing) if the series has been reset
    /// since `generation` was handed out.
    pub fn push(&self, generation: u64, value: f64) -> bool {
        let mut state = self.inner.write();
        if state.generation != generation {
            return false;
        }
        state.samples.push(value);
        true
    }

    /// Copy of the current samples.
    pub fn snapshot(&self) -> Vec<f64> {
        self.inner.read().samples.clone()
    }

    /// Number of samples recorded in the current session.
    pub fn len(&self) -> usize {
        self.inner.read().samples.len()
    }

    /// Whether no sample has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.inner.read().samples.is_empty()
    }

    /// Current session generation.
    pub fn generation(&self) -> u64 {
        self.inner.read().generation
    }
}
