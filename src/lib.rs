// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # pingplot
//!
//! A terminal UI and library that pings a host at a fixed interval, plots
//! the latency live, and exports the series as a PNG chart or a CSV table.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Application                          │
//! │  ┌─────────┐   ┌──────────┐   ┌─────────┐   ┌──────────┐     │
//! │  │  app    │──▶│   data   │──▶│   ui    │──▶│ Terminal │     │
//! │  │ (state) │   │ (series) │   │ (chart) │   └──────────┘     │
//! │  └────┬────┘   └────▲─────┘   └─────────┘                    │
//! │       │             │ push                                   │
//! │       ▼             │                                        │
//! │  ┌─────────┐   ┌────┴─────┐        ┌──────────┐              │
//! │  │ export  │   │ sampler  │───────▶│  probe   │──▶ `ping`    │
//! │  │ PNG/CSV │   │ (loop)   │        │ (Prober) │              │
//! │  └─────────┘   └──────────┘        └──────────┘              │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`probe`]**: The [`Prober`] trait and [`SystemPing`], which shells out to
//!   the OS `ping` utility and parses the `time=` value
//! - **[`sampler`]**: The background sampling loop with start/stop lifecycle and
//!   consecutive-failure alerts
//! - **[`data`]**: The shared [`Series`], statistics, and chart model
//! - **[`export`]**: PNG and CSV exports of the series
//! - **[`app`]**, **[`events`]**, **[`ui`]**: The interactive terminal front end
//! - **[`config`]**: Layered settings (defaults, file, environment)
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Interactive chart, pinging 1.1.1.1 every half second
//! pingplot --target 1.1.1.1 --interval 0.5 --autostart
//!
//! # Ten samples without a UI, then write both exports
//! pingplot --headless --samples 10 --csv log.csv --png graph.png
//! ```
//!
//! ### As a library
//!
//! ```no_run
//! use std::sync::Arc;
//! use pingplot::{Sampler, SamplerEvent, SamplerOptions, Series, SystemPing};
//!
//! # tokio_test::block_on(async {
//! let series = Series::new();
//! let (mut sampler, mut events) = Sampler::new(
//!     Arc::new(SystemPing::default()),
//!     series.clone(),
//!     SamplerOptions::default(),
//!     tokio::runtime::Handle::current(),
//! );
//!
//! sampler.start("8.8.8.8", "1").unwrap();
//! while let Some(SamplerEvent::Sample { index, value }) = events.recv().await {
//!     println!("#{} {} ms", index + 1, value);
//!     if index == 4 {
//!         break;
//!     }
//! }
//! sampler.shutdown().await;
//! pingplot::export::export_table(&series.snapshot(), "ping_log.csv".as_ref()).unwrap();
//! # });
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod events;
pub mod export;
pub mod probe;
pub mod sampler;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use config::Settings;
pub use data::{ChartData, Series, SeriesStats, FAILED_SAMPLE};
pub use export::{export_image, export_table, ExportError, ExportKind, ImageOptions};
pub use probe::{ProbeError, Prober, SystemPing};
pub use sampler::{
    parse_interval, FailureCounter, Sampler, SamplerEvent, SamplerOptions, SessionError,
    SessionState,
};
