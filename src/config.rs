//! Application settings.
//!
//! Layered lowest to highest: built-in defaults, an optional config file,
//! `COLDWATCH_*` environment variables, then command-line flags (applied by
//! the binary through [`Settings::apply_overrides`]).

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use coldwatch_types::{Threshold, TimeRange};

const DEFAULT_ENDPOINT: &str = "http://localhost:5000";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    /// Backend base URL.
    pub endpoint: String,
    pub poll_interval_secs: u64,
    pub request_timeout_secs: u64,
    /// Initial trends range.
    pub time_range: TimeRange,
    /// Tracing filter directive, overridden by `RUST_LOG`.
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

/// Values supplied on the command line.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub endpoint: Option<String>,
    pub poll_interval_secs: Option<u64>,
    pub time_range: Option<TimeRange>,
    pub log_file: Option<PathBuf>,
}

impl Settings {
    /// Load settings from defaults, an optional file and the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("endpoint", DEFAULT_ENDPOINT)?
            .set_default("poll_interval_secs", 3_i64)?
            .set_default("request_timeout_secs", 10_i64)?
            .set_default("time_range", TimeRange::default().as_str())?
            .set_default("log_level", "info")?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let settings: Settings = builder
            .add_source(Environment::with_prefix("COLDWATCH").try_parsing(true))
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn apply_overrides(&mut self, overrides: Overrides) -> Result<()> {
        if let Some(endpoint) = overrides.endpoint {
            self.endpoint = endpoint;
        }
        if let Some(interval) = overrides.poll_interval_secs {
            self.poll_interval_secs = interval;
        }
        if let Some(range) = overrides.time_range {
            self.time_range = range;
        }
        if let Some(log_file) = overrides.log_file {
            self.log_file = Some(log_file);
        }
        self.validate()
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn validate(&self) -> Result<()> {
        if self.poll_interval_secs == 0 {
            bail!("poll_interval_secs must be at least 1");
        }
        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be at least 1");
        }
        if self.endpoint.trim().is_empty() {
            bail!("endpoint must not be empty");
        }
        Ok(())
    }
}

/// Parse `<zone>=<temp_min>:<temp_max>:<humidity_min>:<humidity_max>`.
pub fn parse_threshold_assignment(input: &str) -> Result<(String, Threshold)> {
    let Some((zone, values)) = input.rsplit_once('=') else {
        bail!("Expected <zone>=<temp_min>:<temp_max>:<humidity_min>:<humidity_max>");
    };
    let zone = zone.trim();
    if zone.is_empty() {
        bail!("Zone name must not be empty");
    }

    let parts = values
        .split(':')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .with_context(|| format!("Invalid number '{}'", part.trim()))
        })
        .collect::<Result<Vec<_>>>()?;

    let [temp_min, temp_max, humidity_min, humidity_max] = parts[..] else {
        bail!("Expected four values, got {}", parts.len());
    };

    let threshold = Threshold::new(temp_min, temp_max, humidity_min, humidity_max);
    if !threshold.is_valid() {
        bail!("Minimum values must not exceed maximum values");
    }
    Ok((zone.to_string(), threshold))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::load(None).unwrap();
        assert_eq!(settings.poll_interval(), Duration::from_secs(3));
        assert_eq!(settings.request_timeout(), Duration::from_secs(10));
        assert_eq!(settings.time_range, TimeRange::Day);
        assert!(settings.log_file.is_none());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
endpoint = "http://warehouse:8080"
poll_interval_secs = 5
time_range = "7d"
log_file = "/tmp/coldwatch.log"
"#
        )
        .unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.endpoint, "http://warehouse:8080");
        assert_eq!(settings.poll_interval_secs, 5);
        assert_eq!(settings.time_range, TimeRange::Week);
        assert_eq!(settings.request_timeout_secs, 10);
        assert_eq!(settings.log_file, Some(PathBuf::from("/tmp/coldwatch.log")));
    }

    #[test]
    fn test_invalid_file_values_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "poll_interval_secs = 0").unwrap();
        assert!(Settings::load(Some(file.path())).is_err());

        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, r#"time_range = "2w""#).unwrap();
        assert!(Settings::load(Some(file.path())).is_err());
    }

    #[test]
    fn test_cli_overrides_win() {
        let mut settings = Settings::load(None).unwrap();
        settings
            .apply_overrides(Overrides {
                endpoint: Some("http://10.0.0.2:5000".into()),
                poll_interval_secs: Some(10),
                time_range: Some(TimeRange::Hour),
                log_file: None,
            })
            .unwrap();
        assert_eq!(settings.endpoint, "http://10.0.0.2:5000");
        assert_eq!(settings.poll_interval_secs, 10);
        assert_eq!(settings.time_range, TimeRange::Hour);

        let err = settings.apply_overrides(Overrides {
            poll_interval_secs: Some(0),
            ..Default::default()
        });
        assert!(err.is_err());
    }

    #[test]
    fn test_parse_threshold_assignment() {
        let (zone, threshold) =
            parse_threshold_assignment("Zone A - Frozen Foods=-25:-18:80:90").unwrap();
        assert_eq!(zone, "Zone A - Frozen Foods");
        assert_eq!(threshold, Threshold::new(-25.0, -18.0, 80.0, 90.0));
    }

    #[test]
    fn test_parse_threshold_assignment_errors() {
        assert!(parse_threshold_assignment("no separator").is_err());
        assert!(parse_threshold_assignment("=1:2:3:4").is_err());
        assert!(parse_threshold_assignment("A=1:2:3").is_err());
        assert!(parse_threshold_assignment("A=1:x:3:4").is_err());
        assert!(parse_threshold_assignment("A=5:1:3:4").is_err());
    }
}
