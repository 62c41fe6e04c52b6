//! Layered application settings.
//!
//! Settings are assembled from built-in defaults, an optional config file,
//! and `PINGPLOT_*` environment variables, in that order of precedence:
//!
//! ```toml
//! target = "1.1.1.1"
//! interval = 0.5
//! alert_after = 3
//! export_dir = "/tmp/pings"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::sampler::parse_interval;

/// Used by [`Settings::probe_timeout`] if the value was never validated.
const FALLBACK_PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Runtime settings for probing, alerting and exporting.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Host name or IP address to ping.
    pub target: String,
    /// Seconds between two probes.
    pub interval: f64,
    /// Seconds the ping utility waits for a reply (`-W`).
    pub ping_wait: u32,
    /// Hard upper bound, in seconds, on a single ping invocation.
    pub probe_timeout: f64,
    /// Number of consecutive failures that raises an alert.
    pub alert_after: u32,
    /// Directory where default-named exports are written.
    pub export_dir: PathBuf,
    /// Width of exported chart images in pixels.
    pub image_width: u32,
    /// Height of exported chart images in pixels.
    pub image_height: u32,
    /// Optional log file (the terminal belongs to the TUI).
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target: "8.8.8.8".to_string(),
            interval: 2.0,
            ping_wait: 1,
            probe_timeout: 3.0,
            alert_after: 3,
            export_dir: PathBuf::from("."),
            image_width: 800,
            image_height: 480,
            log_file: None,
        }
    }
}

impl Settings {
    /// Load settings, layering an optional file and the environment over the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = Settings::default();

        let mut builder = Config::builder()
            .set_default("target", defaults.target)?
            .set_default("interval", defaults.interval)?
            .set_default("ping_wait", i64::from(defaults.ping_wait))?
            .set_default("probe_timeout", defaults.probe_timeout)?
            .set_default("alert_after", i64::from(defaults.alert_after))?
            .set_default("export_dir", defaults.export_dir.display().to_string())?
            .set_default("image_width", i64::from(defaults.image_width))?
            .set_default("image_height", i64::from(defaults.image_height))?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let settings: Settings = builder
            .add_source(Environment::with_prefix("PINGPLOT"))
            .build()
            .context("Failed to read settings")?
            .try_deserialize()
            .context("Invalid settings")?;

        settings.validate()?;
        Ok(settings)
    }

    /// Reject values that would make the sampler misbehave.
    pub fn validate(&self) -> Result<()> {
        parse_interval(&self.interval_text()).context("Invalid interval setting")?;
        if self.alert_after == 0 {
            anyhow::bail!("alert_after must be at least 1");
        }
        match Duration::try_from_secs_f64(self.probe_timeout) {
            Ok(timeout) if !timeout.is_zero() => {}
            _ => anyhow::bail!(
                "probe_timeout must be a positive number of seconds, got {}",
                self.probe_timeout
            ),
        }
        if self.image_width < 64 || self.image_height < 64 {
            anyhow::bail!("image dimensions must be at least 64x64");
        }
        Ok(())
    }

    /// The probe timeout as a [`Duration`].
    pub fn probe_timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.probe_timeout).unwrap_or(FALLBACK_PROBE_TIMEOUT)
    }

    /// Interval formatted the way it is typed into the interval input.
    pub fn interval_text(&self) -> String {
        self.interval.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_without_file() {
        let settings = Settings::load(None).unwrap();
        assert_eq!(settings.target, "8.8.8.8");
        assert_eq!(settings.interval, 2.0);
        assert_eq!(settings.ping_wait, 1);
        assert_eq!(settings.alert_after, 3);
        assert_eq!(settings.interval_text(), "2");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "target = \"1.1.1.1\"\ninterval = 0.5\nimage_width = 1024").unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.target, "1.1.1.1");
        assert_eq!(settings.interval, 0.5);
        assert_eq!(settings.image_width, 1024);
        // Untouched keys keep their defaults
        assert_eq!(settings.image_height, 480);
    }

    #[test]
    fn test_out_of_range_probe_timeout_rejected() {
        for value in ["1e20", "0", "-1"] {
            let mut file = NamedTempFile::with_suffix(".toml").unwrap();
            writeln!(file, "probe_timeout = {}", value).unwrap();

            let err = Settings::load(Some(file.path())).unwrap_err();
            assert!(err.to_string().contains("probe_timeout"), "{value}: {err}");
        }
    }

    #[test]
    fn test_probe_timeout_never_panics() {
        let settings = Settings {
            probe_timeout: 1e20,
            ..Settings::default()
        };
        assert!(settings.validate().is_err());
        assert_eq!(settings.probe_timeout(), FALLBACK_PROBE_TIMEOUT);
    }

    #[test]
    fn test_invalid_interval_rejected() {
        for value in ["0", "-2", "1e-12"] {
            let mut file = NamedTempFile::with_suffix(".toml").unwrap();
            writeln!(file, "interval = {}", value).unwrap();

            assert!(Settings::load(Some(file.path())).is_err(), "{value} accepted");
        }
    }

    #[test]
    fn test_zero_alert_threshold_rejected() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "alert_after = 0").unwrap();

        assert!(Settings::load(Some(file.path())).is_err());
    }
}
