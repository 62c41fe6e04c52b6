//! Latency data and the models derived from it.
//!
//! ## Submodules
//!
//! - [`series`]: The shared, append-only [`Series`] of samples
//! - [`stats`]: Count, loss and min/avg/max over a series ([`SeriesStats`])
//! - [`chart`]: Points and fitted axis bounds for drawing ([`ChartData`])
//!
//! ## Data Flow
//!
//! ```text
//! Sampler tick ──▶ Series::push()
//!                      │
//!                      ├──▶ ChartData::from_samples()  (live chart, PNG export)
//!                      ├──▶ SeriesStats::from_samples() (header)
//!                      └──▶ export_table()              (CSV export)
//! ```

pub mod chart;
pub mod series;
pub mod stats;

pub use chart::ChartData;
pub use series::{Series, FAILED_SAMPLE};
pub use stats::SeriesStats;
