//! Application state and user actions.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::config::Settings;
use crate::data::{ChartData, SeriesStats};
use crate::export::{self, ExportError, ExportKind, ImageOptions};
use crate::sampler::{Sampler, SamplerEvent, SessionState};
use crate::ui::Theme;

/// How long a status message stays in the status bar.
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// The two text inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Target,
    Interval,
}

impl Field {
    /// Move focus to the other input.
    pub fn next(self) -> Self {
        match self {
            Field::Target => Field::Interval,
            Field::Interval => Field::Target,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Field::Target => "Target",
            Field::Interval => "Interval (s)",
        }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub show_help: bool,
    /// Pending consecutive-failure alert, shown as a modal until dismissed.
    pub alert: Option<String>,

    // Inputs
    pub target_input: String,
    pub interval_input: String,
    pub focus: Field,
    pub editing: bool,

    // Sampling
    sampler: Sampler,
    events: mpsc::UnboundedReceiver<SamplerEvent>,
    pub chart: ChartData,
    pub stats: SeriesStats,
    pub last_sample_at: Option<Instant>,

    // Export
    pub export_dir: PathBuf,
    pub image_size: (u32, u32),

    // UI
    pub theme: Theme,
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create the application around an idle sampler.
    pub fn new(
        sampler: Sampler,
        events: mpsc::UnboundedReceiver<SamplerEvent>,
        settings: &Settings,
        theme: Theme,
    ) -> Self {
        let session = sampler.session();
        Self {
            running: true,
            show_help: false,
            alert: None,
            target_input: session.target,
            interval_input: settings.interval_text(),
            focus: Field::Target,
            editing: false,
            sampler,
            events,
            chart: ChartData::from_samples(&[]),
            stats: SeriesStats::default(),
            last_sample_at: None,
            export_dir: settings.export_dir.clone(),
            image_size: (settings.image_width, settings.image_height),
            theme,
            status_message: None,
        }
    }

    /// Current session state.
    pub fn session(&self) -> SessionState {
        self.sampler.session()
    }

    pub fn sampler_mut(&mut self) -> &mut Sampler {
        &mut self.sampler
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired.
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < STATUS_MESSAGE_TTL {
                return Some(msg);
            }
        }
        None
    }

    /// Start sampling with the current input values.
    pub fn start(&mut self) {
        self.editing = false;
        let target = self.target_input.trim().to_string();
        match self.sampler.start(&target, &self.interval_input) {
            Ok(true) => {
                self.refresh_chart();
                self.set_status_message(format!("Pinging {}", target));
            }
            Ok(false) => self.set_status_message("Already running".to_string()),
            Err(e) => {
                warn!(error = %e, "start rejected");
                self.set_status_message(format!("Error: {}", e));
            }
        }
    }

    /// Stop sampling; the chart keeps the finished session.
    pub fn stop(&mut self) {
        if self.sampler.stop() {
            self.set_status_message("Stopped".to_string());
        }
    }

    /// Drain sampler notifications.
    ///
    /// Returns `true` if anything changed and the screen should be redrawn.
    pub fn poll_events(&mut self) -> bool {
        let mut changed = false;
        while let Ok(event) = self.events.try_recv() {
            changed = true;
            match event {
                SamplerEvent::Sample { .. } => {
                    self.last_sample_at = Some(Instant::now());
                }
                SamplerEvent::Alert { failures } => {
                    self.alert = Some(format!("{} consecutive ping failures.", failures));
                }
            }
        }
        if changed {
            self.refresh_chart();
        }
        changed
    }

    /// Rebuild the chart and statistics from the full series.
    pub fn refresh_chart(&mut self) {
        let samples = self.sampler.series().snapshot();
        self.chart = ChartData::from_samples(&samples);
        self.stats = SeriesStats::from_samples(&samples);
    }

    fn image_options(&self) -> ImageOptions {
        ImageOptions {
            width: self.image_size.0,
            height: self.image_size.1,
            style: self.theme.image_style(),
        }
    }

    /// Export the series to `path` in the given format.
    pub fn export_to(&self, kind: ExportKind, path: &Path) -> Result<(), ExportError> {
        let samples = self.sampler.series().snapshot();
        match kind {
            ExportKind::Image => export::export_image(&samples, path, &self.image_options()),
            ExportKind::Table => export::export_table(&samples, path),
        }
    }

    /// Export to a time-stamped file in the export directory and report the outcome.
    pub fn export(&mut self, kind: ExportKind) -> Option<PathBuf> {
        let path = kind.default_path(&self.export_dir);
        match self.export_to(kind, &path) {
            Ok(()) => {
                info!(path = %path.display(), "export finished");
                self.set_status_message(format!("Exported to {}", path.display()));
                Some(path)
            }
            Err(e) => {
                warn!(error = %e, "export failed");
                self.set_status_message(format!("Export failed: {}", e));
                None
            }
        }
    }

    /// Enter edit mode for the focused input.
    pub fn start_editing(&mut self) {
        self.editing = true;
    }

    /// Leave edit mode, keeping the text.
    pub fn finish_editing(&mut self) {
        self.editing = false;
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    fn focused_input(&mut self) -> &mut String {
        match self.focus {
            Field::Target => &mut self.target_input,
            Field::Interval => &mut self.interval_input,
        }
    }

    /// Append a character to the focused input.
    pub fn input_push(&mut self, c: char) {
        self.focused_input().push(c);
    }

    /// Remove the last character of the focused input.
    pub fn input_pop(&mut self) {
        self.focused_input().pop();
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }

    /// Signal the application to quit; the sampling loop is stopped first.
    pub fn quit(&mut self) {
        self.sampler.stop();
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Series;
    use crate::probe::{ProbeError, Prober};
    use crate::sampler::SamplerOptions;
    use async_trait::async_trait;
    use std::sync::Arc;
    use tempfile::TempDir;
    use tokio::runtime::Handle;

    #[derive(Debug)]
    struct Unreachable;

    #[async_trait]
    impl Prober for Unreachable {
        async fn measure(&self, _target: &str) -> Result<f64, ProbeError> {
            Err(ProbeError::Unsuccessful(Some(1)))
        }
    }

    fn app(export_dir: &Path) -> App {
        let settings = Settings {
            export_dir: export_dir.to_path_buf(),
            image_width: 200,
            image_height: 120,
            ..Settings::default()
        };
        let (sampler, events) = Sampler::new(
            Arc::new(Unreachable),
            Series::new(),
            SamplerOptions::from(&settings),
            Handle::current(),
        );
        App::new(sampler, events, &settings, Theme::light())
    }

    #[tokio::test]
    async fn test_inputs_prefilled_from_settings() {
        let dir = TempDir::new().unwrap();
        let app = app(dir.path());
        assert_eq!(app.target_input, "8.8.8.8");
        assert_eq!(app.interval_input, "2");
        assert!(!app.session().enabled);
    }

    #[tokio::test]
    async fn test_invalid_interval_reports_error() {
        let dir = TempDir::new().unwrap();
        let mut app = app(dir.path());
        app.interval_input = "abc".to_string();

        app.start();

        assert!(!app.session().enabled);
        assert!(app.get_status_message().unwrap().contains("invalid interval"));
    }

    #[tokio::test]
    async fn test_export_empty_series_fails() {
        let dir = TempDir::new().unwrap();
        let mut app = app(dir.path());

        assert!(app.export(ExportKind::Table).is_none());
        assert!(app.export(ExportKind::Image).is_none());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
        assert!(app.get_status_message().unwrap().contains("no data"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_raise_alert_and_export() {
        let dir = TempDir::new().unwrap();
        let mut app = app(dir.path());
        app.interval_input = "1".to_string();
        app.start();
        assert!(app.session().enabled);

        while app.alert.is_none() {
            tokio::time::sleep(Duration::from_millis(100)).await;
            app.poll_events();
        }
        app.quit();
        assert!(!app.running);
        app.sampler_mut().shutdown().await;
        app.poll_events();

        assert_eq!(app.alert.as_deref(), Some("3 consecutive ping failures."));
        assert_eq!(app.stats.failures, app.stats.count);
        assert_eq!(app.chart.points.len(), 3);

        let path = app.export(ExportKind::Table).unwrap();
        assert_eq!(export::read_table(&path).unwrap(), vec![0.0, 0.0, 0.0]);
        let png = app.export(ExportKind::Image).unwrap();
        assert!(png.exists());
    }

    #[tokio::test]
    async fn test_editing_focused_input() {
        let dir = TempDir::new().unwrap();
        let mut app = app(dir.path());
        app.focus_next();
        app.start_editing();
        app.input_pop();
        app.input_push('5');
        app.finish_editing();
        assert_eq!(app.interval_input, "5");
        assert_eq!(app.target_input, "8.8.8.8");
    }
}
