//! The sampling loop.
//!
//! A [`Sampler`] owns the session lifecycle. `start` validates the interval,
//! clears the [`Series`] and spawns one background task that probes the
//! target once per tick. `stop` raises a stop signal that the task honours
//! between ticks; an in-flight probe is allowed to finish.
//!
//! ```text
//!  start ──▶ reset series ──▶ spawn ──┐
//!                                     ▼
//!            ┌──────────── tick: probe ─▶ push sample ─▶ event ─┐
//!            │                                                  │
//!            └──── sleep(interval) / stop signal ◀──────────────┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::data::{Series, FAILED_SAMPLE};
use crate::probe::Prober;

/// How long `shutdown` waits for background tasks before aborting them.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Shortest accepted pause between two probes.
pub const MIN_INTERVAL: Duration = Duration::from_millis(10);

/// Errors that prevent a session from starting.
#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    /// The interval is not a number of seconds of at least [`MIN_INTERVAL`].
    #[error("invalid interval {0:?}: expected a number of seconds, at least 0.01")]
    InvalidInterval(String),
}

/// Parse interval text (seconds, fractions allowed) into a [`Duration`].
///
/// Values below [`MIN_INTERVAL`] are rejected.
pub fn parse_interval(text: &str) -> Result<Duration, SessionError> {
    let invalid = || SessionError::InvalidInterval(text.to_string());
    let secs: f64 = text.trim().parse().map_err(|_| invalid())?;
    match Duration::try_from_secs_f64(secs) {
        Ok(interval) if interval >= MIN_INTERVAL => Ok(interval),
        _ => Err(invalid()),
    }
}

/// Notifications sent from the sampling task to the foreground.
#[derive(Debug, Clone, PartialEq)]
pub enum SamplerEvent {
    /// A sample was appended at `index` (0-based); the chart should redraw.
    Sample { index: usize, value: f64 },
    /// `failures` probes in a row have failed.
    Alert { failures: u32 },
}

/// Counts consecutive probe failures and decides when to alert.
///
/// The count resets after every success and after every alert, so a long
/// outage alerts on the 3rd, 6th, 9th... failure with the default threshold.
#[derive(Debug, Clone)]
pub struct FailureCounter {
    threshold: u32,
    count: u32,
}

impl FailureCounter {
    pub fn new(threshold: u32) -> Self {
        Self {
            threshold: threshold.max(1),
            count: 0,
        }
    }

    pub fn record_success(&mut self) {
        self.count = 0;
    }

    /// Record a failure; returns `true` when an alert should fire.
    pub fn record_failure(&mut self) -> bool {
        self.count += 1;
        if self.count >= self.threshold {
            self.count = 0;
            true
        } else {
            false
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }
}

/// Snapshot of the session as seen by the foreground.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub enabled: bool,
    pub target: String,
    pub interval: Duration,
    pub consecutive_failures: u32,
}

#[derive(Debug)]
struct SessionCell {
    state: SessionState,
    /// Series generation of the session currently allowed to write here.
    generation: u64,
}

/// Defaults for a new [`Sampler`].
#[derive(Debug, Clone)]
pub struct SamplerOptions {
    pub target: String,
    pub interval: Duration,
    pub alert_after: u32,
}

impl Default for SamplerOptions {
    fn default() -> Self {
        Self {
            target: "8.8.8.8".to_string(),
            interval: Duration::from_secs(2),
            alert_after: 3,
        }
    }
}

impl From<&Settings> for SamplerOptions {
    fn from(settings: &Settings) -> Self {
        let defaults = SamplerOptions::default();
        Self {
            target: settings.target.clone(),
            interval: parse_interval(&settings.interval_text()).unwrap_or(defaults.interval),
            alert_after: settings.alert_after,
        }
    }
}

/// Owns the sampling session and its background task.
#[derive(Debug)]
pub struct Sampler {
    prober: Arc<dyn Prober>,
    series: Series,
    alert_after: u32,
    session: Arc<Mutex<SessionCell>>,
    events: mpsc::UnboundedSender<SamplerEvent>,
    stop: Option<watch::Sender<bool>>,
    task: Option<JoinHandle<()>>,
    /// Tasks of earlier sessions that were still inside a probe when replaced.
    retired: Vec<JoinHandle<()>>,
    runtime: Handle,
}

impl Sampler {
    /// Create an idle sampler.
    ///
    /// Returns the sampler and the receiver on which the background task
    /// reports samples and alerts.
    pub fn new(
        prober: Arc<dyn Prober>,
        series: Series,
        options: SamplerOptions,
        runtime: Handle,
    ) -> (Self, mpsc::UnboundedReceiver<SamplerEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let session = SessionCell {
            state: SessionState {
                enabled: false,
                target: options.target,
                interval: options.interval,
                consecutive_failures: 0,
            },
            generation: series.generation(),
        };

        let sampler = Self {
            prober,
            series,
            alert_after: options.alert_after,
            session: Arc::new(Mutex::new(session)),
            events,
            stop: None,
            task: None,
            retired: Vec::new(),
            runtime,
        };
        (sampler, rx)
    }

    /// The series this sampler appends to.
    pub fn series(&self) -> &Series {
        &self.series
    }

    /// Current session state.
    pub fn session(&self) -> SessionState {
        self.session.lock().state.clone()
    }

    pub fn is_running(&self) -> bool {
        self.session.lock().state.enabled
    }

    /// Start a new session.
    ///
    /// Returns `Ok(false)` without touching anything if a session is already
    /// running. An invalid interval is rejected before any state changes.
    pub fn start(&mut self, target: &str, interval_text: &str) -> Result<bool, SessionError> {
        if self.is_running() {
            debug!("start ignored: sampler already running");
            return Ok(false);
        }

        let interval = parse_interval(interval_text)?;
        let generation = self.series.reset();

        {
            let mut cell = self.session.lock();
            cell.generation = generation;
            cell.state = SessionState {
                enabled: true,
                target: target.to_string(),
                interval,
                consecutive_failures: 0,
            };
        }

        let (stop_tx, stop_rx) = watch::channel(false);
        let worker = Worker {
            prober: self.prober.clone(),
            series: self.series.clone(),
            session: self.session.clone(),
            events: self.events.clone(),
            counter: FailureCounter::new(self.alert_after),
            target: target.to_string(),
            generation,
        };

        info!(host = %target, interval_secs = interval.as_secs_f64(), "sampling started");
        self.retire_task();
        self.stop = Some(stop_tx);
        self.task = Some(self.runtime.spawn(worker.run(interval, stop_rx)));
        Ok(true)
    }

    /// Signal the running session to stop. Returns `false` if nothing was running.
    pub fn stop(&mut self) -> bool {
        {
            let mut cell = self.session.lock();
            if !cell.state.enabled {
                return false;
            }
            cell.state.enabled = false;
        }

        if let Some(stop) = self.stop.take() {
            let _ = stop.send(true);
        }
        info!("sampling stopped");
        true
    }

    /// Stop the session and wait for every background task to finish.
    ///
    /// Tasks still running after [`SHUTDOWN_GRACE`] are aborted.
    pub async fn shutdown(&mut self) {
        self.stop();
        self.retire_task();

        let deadline = tokio::time::Instant::now() + SHUTDOWN_GRACE;
        for task in std::mem::take(&mut self.retired) {
            let abort = task.abort_handle();
            if tokio::time::timeout_at(deadline, task).await.is_err() {
                warn!("sampling task did not stop in time, aborting");
                abort.abort();
            }
        }
    }

    /// Move the current task handle to `retired`, dropping finished ones.
    fn retire_task(&mut self) {
        self.retired.retain(|task| !task.is_finished());
        if let Some(task) = self.task.take() {
            if !task.is_finished() {
                self.retired.push(task);
            }
        }
    }
}

/// The background half of a session.
#[derive(Debug)]
struct Worker {
    prober: Arc<dyn Prober>,
    series: Series,
    session: Arc<Mutex<SessionCell>>,
    events: mpsc::UnboundedSender<SamplerEvent>,
    counter: FailureCounter,
    target: String,
    generation: u64,
}

impl Worker {
    async fn run(mut self, interval: Duration, mut stop: watch::Receiver<bool>) {
        loop {
            if *stop.borrow() {
                break;
            }
            if !self.tick().await {
                break;
            }
            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                changed = stop.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
        debug!(host = %self.target, "sampling task finished");
    }

    /// Probe once and record the outcome.
    ///
    /// Returns `false` if the session has been superseded and the task should exit.
    async fn tick(&mut self) -> bool {
        let (value, alert) = match self.probe().await {
            Some(latency) => {
                self.counter.record_success();
                (latency, false)
            }
            None => (FAILED_SAMPLE, self.counter.record_failure()),
        };

        if !self.series.push(self.generation, value) {
            return false;
        }
        let index = self.series.len().saturating_sub(1);

        {
            let mut cell = self.session.lock();
            if cell.generation == self.generation {
                cell.state.consecutive_failures = self.counter.count();
            }
        }

        let _ = self.events.send(SamplerEvent::Sample { index, value });
        if alert {
            let failures = self.counter.threshold();
            warn!(host = %self.target, failures, "consecutive ping failures");
            let _ = self.events.send(SamplerEvent::Alert { failures });
        }
        true
    }

    /// Run the prober in its own task so a panic becomes a failed sample.
    async fn probe(&self) -> Option<f64> {
        let prober = self.prober.clone();
        let target = self.target.clone();
        let outcome = tokio::spawn(async move { prober.measure(&target).await }).await;

        match outcome {
            Ok(Ok(latency)) if latency.is_finite() && latency >= 0.0 => Some(latency),
            Ok(Ok(latency)) => {
                warn!(host = %self.target, latency, "prober returned an invalid latency");
                None
            }
            Ok(Err(e)) => {
                debug!(host = %self.target, error = %e, "probe failed");
                None
            }
            Err(e) => {
                warn!(host = %self.target, error = %e, "probe task failed");
                None
            }
        }
    }
}
