//! Latency probing.
//!
//! A [`Prober`] performs exactly one latency measurement against a target.
//! Retry and alerting policy belong to the sampler, not to probers.

mod system;

pub use system::{parse_latency, SystemPing};

use std::fmt::Debug;

use async_trait::async_trait;
use thiserror::Error;

/// Why a single probe produced no latency.
///
/// The sampler records every variant the same way (a `0` sample); the
/// distinction only shows up in logs.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The ping utility could not be started.
    #[error("failed to run ping: {0}")]
    Spawn(#[from] std::io::Error),

    /// The ping utility did not finish within the probe timeout.
    #[error("ping timed out")]
    Timeout,

    /// The ping utility exited unsuccessfully (unreachable host, bad target...).
    #[error("ping exited with status {0:?}")]
    Unsuccessful(Option<i32>),

    /// The output carried no parseable `time=` value.
    #[error("no latency found in ping output")]
    NoLatency,
}

/// Measures round-trip latency to a target host.
#[async_trait]
pub trait Prober: Send + Sync + Debug {
    /// Issue one echo request and return the round-trip time in milliseconds.
    async fn measure(&self, target: &str) -> Result<f64, ProbeError>;
}
