use color_eyre::eyre::{eyre, Result, WrapErr};
use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_DEVICE_URL: &str = "http://192.168.4.1";
pub const DEFAULT_LOG_FILE: &str = "v1-dashboard.log";

/// Runtime settings, read from the environment (and `.env`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub device_url: String,
    pub buffer_poll: Duration,
    pub status_poll: Duration,
    pub stats_poll: Duration,
    pub gps_poll: Duration,
    /// `None` leaves requests unbounded.
    pub request_timeout: Option<Duration>,
    pub export_dir: PathBuf,
    pub log_file: PathBuf,
    pub debug: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            device_url: DEFAULT_DEVICE_URL.to_string(),
            buffer_poll: Duration::from_millis(2000),
            status_poll: Duration::from_millis(5000),
            stats_poll: Duration::from_millis(2000),
            gps_poll: Duration::from_millis(5000),
            request_timeout: None,
            export_dir: PathBuf::from("./exports"),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            debug: false,
        }
    }
}

impl DashboardConfig {
    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let millis = |name: &str, fallback: Duration| -> Result<Duration> {
            lookup(name).map_or(Ok(fallback), |raw| parse_millis(name, &raw))
        };

        let request_timeout = lookup("REQUEST_TIMEOUT_MS")
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| parse_millis("REQUEST_TIMEOUT_MS", &raw))
            .transpose()?;

        Ok(Self {
            device_url: lookup("V1_DEVICE_URL")
                .filter(|url| !url.trim().is_empty())
                .unwrap_or(defaults.device_url),
            buffer_poll: millis("BUFFER_POLL_MS", defaults.buffer_poll)?,
            status_poll: millis("STATUS_POLL_MS", defaults.status_poll)?,
            stats_poll: millis("STATS_POLL_MS", defaults.stats_poll)?,
            gps_poll: millis("GPS_POLL_MS", defaults.gps_poll)?,
            request_timeout,
            export_dir: lookup("EXPORT_DIR").map_or(defaults.export_dir, PathBuf::from),
            log_file: lookup("LOG_FILE").map_or(defaults.log_file, PathBuf::from),
            debug: lookup("DEBUG").is_some_and(|value| is_truthy(&value)),
        })
    }
}

fn parse_millis(name: &str, raw: &str) -> Result<Duration> {
    let value: u64 = raw
        .trim()
        .parse()
        .wrap_err_with(|| format!("{name} must be a whole number of milliseconds, got {raw:?}"))?;
    if value == 0 {
        return Err(eyre!("{name} must be greater than zero"));
    }
    Ok(Duration::from_millis(value))
}

fn is_truthy(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "" | "0" | "false" | "no" | "off"
    )
}

/// Loads `.env` if present and reads the process environment.
pub fn load_config() -> Result<DashboardConfig> {
    dotenv().ok();
    DashboardConfig::from_lookup(|name| env::var(name).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn empty_environment_gives_defaults() -> Result<()> {
        let config = DashboardConfig::from_lookup(lookup(&[]))?;
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.device_url, "http://192.168.4.1");
        assert_eq!(config.request_timeout, None);
        Ok(())
    }

    #[test]
    fn variables_override_defaults() -> Result<()> {
        let config = DashboardConfig::from_lookup(lookup(&[
            ("V1_DEVICE_URL", "http://10.0.0.5"),
            ("BUFFER_POLL_MS", "500"),
            ("REQUEST_TIMEOUT_MS", "3000"),
            ("EXPORT_DIR", "/tmp/out"),
            ("DEBUG", "1"),
        ]))?;

        assert_eq!(config.device_url, "http://10.0.0.5");
        assert_eq!(config.buffer_poll, Duration::from_millis(500));
        assert_eq!(config.request_timeout, Some(Duration::from_secs(3)));
        assert_eq!(config.export_dir, PathBuf::from("/tmp/out"));
        assert!(config.debug);
        Ok(())
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let err = DashboardConfig::from_lookup(lookup(&[("STATS_POLL_MS", "fast")]));
        assert!(err.is_err_and(|err| err.to_string().contains("STATS_POLL_MS")));

        let zero = DashboardConfig::from_lookup(lookup(&[("GPS_POLL_MS", "0")]));
        assert!(zero.is_err());
    }

    #[test]
    fn debug_false_is_not_truthy() -> Result<()> {
        let config = DashboardConfig::from_lookup(lookup(&[("DEBUG", "false")]))?;
        assert!(!config.debug);
        Ok(())
    }
}
