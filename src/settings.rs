//! Layered settings.
//!
//! Sources, lowest precedence first:
//!
//! 1. built-in defaults
//! 2. a TOML file (`pidash.toml` unless `--config` names another; only an
//!    explicitly named file is required to exist)
//! 3. environment variables such as `PIDASH_SERVER__HOST` or
//!    `PIDASH_TIMING__REFRESH=30s`
//! 4. command-line flags
//!
//! ```toml
//! [server]
//! host = "192.168.1.2"
//! port = 8080          # optional, left out of the URLs when unset
//!
//! [timing]
//! refresh = "60s"
//! reconnect = "5s"
//! request_timeout = "10s"
//!
//! [defaults]
//! days = "7"
//! query_size = 200
//!
//! [log]
//! level = "debug"
//! file = "pidash.log"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::{Deserialize, Deserializer};

use pidash_types::{QuerySize, ReportWindow};

use crate::duration::parse_duration;

pub const DEFAULT_CONFIG_FILE: &str = "pidash.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub timing: TimingSettings,
    pub defaults: DefaultSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TimingSettings {
    /// Dashboard data older than this is fetched again.
    #[serde(deserialize_with = "human_duration")]
    pub refresh: Duration,
    /// Fixed delay between push channel reconnect attempts.
    #[serde(deserialize_with = "human_duration")]
    pub reconnect: Duration,
    #[serde(deserialize_with = "human_duration")]
    pub request_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DefaultSettings {
    pub days: ReportWindow,
    pub query_size: QuerySize,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LogSettings {
    pub level: String,
    pub file: PathBuf,
}

/// Values given on the command line. `None` leaves the lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub refresh: Option<String>,
    pub reconnect: Option<String>,
    pub days: Option<String>,
    pub query_size: Option<u32>,
}

impl Settings {
    /// Load from defaults, the config file, the process environment and
    /// `overrides`.
    pub fn load(config_path: Option<&Path>, overrides: &Overrides) -> Result<Self> {
        let env = Environment::with_prefix("PIDASH")
            .prefix_separator("_")
            .separator("__");
        Self::load_with_env(config_path, overrides, env)
    }

    fn load_with_env(
        config_path: Option<&Path>,
        overrides: &Overrides,
        env: Environment,
    ) -> Result<Self> {
        let file = match config_path {
            Some(path) => File::from(path).required(true),
            None => File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false),
        };

        let builder = with_defaults(Config::builder())?
            .add_source(file)
            .add_source(env)
            .set_override_option("server.host", overrides.host.clone())?
            .set_override_option("server.port", overrides.port)?
            .set_override_option("timing.refresh", overrides.refresh.clone())?
            .set_override_option("timing.reconnect", overrides.reconnect.clone())?
            .set_override_option("defaults.days", overrides.days.clone())?
            .set_override_option("defaults.query_size", overrides.query_size)?;

        let settings: Settings = builder
            .build()
            .context("Failed to read settings")?
            .try_deserialize()
            .context("Invalid settings")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Zero intervals would turn reconnects and refreshes into busy loops.
    fn validate(&self) -> Result<()> {
        let timing = &self.timing;
        for (key, value) in [
            ("timing.refresh", timing.refresh),
            ("timing.reconnect", timing.reconnect),
            ("timing.request_timeout", timing.request_timeout),
        ] {
            ensure!(!value.is_zero(), "Invalid settings: {key} must be greater than zero");
        }
        Ok(())
    }

    fn authority(&self) -> String {
        match self.server.port {
            Some(port) => format!("{}:{}", self.server.host, port),
            None => self.server.host.clone(),
        }
    }

    /// Base URL of the HTTP endpoints.
    pub fn http_base(&self) -> String {
        format!("http://{}", self.authority())
    }

    /// URL of the push channel.
    pub fn ws_url(&self) -> String {
        format!("ws://{}/websocket", self.authority())
    }
}

fn with_defaults(builder: ConfigBuilder<DefaultState>) -> Result<ConfigBuilder<DefaultState>> {
    Ok(builder
        .set_default("server.host", "127.0.0.1")?
        .set_default("timing.refresh", "60s")?
        .set_default("timing.reconnect", "5s")?
        .set_default("timing.request_timeout", "10s")?
        .set_default("defaults.days", "1")?
        .set_default("defaults.query_size", 100)?
        .set_default("log.level", "info")?
        .set_default("log.file", "pidash.log")?)
}

fn human_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_duration(&raw).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    fn no_env() -> Environment {
        env(&[])
    }

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix("PIDASH")
            .prefix_separator("_")
            .separator("__")
            .source(Some(map))
    }

    fn toml_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::load_with_env(None, &Overrides::default(), no_env()).unwrap();

        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, None);
        assert_eq!(settings.timing.refresh, Duration::from_secs(60));
        assert_eq!(settings.timing.reconnect, Duration::from_secs(5));
        assert_eq!(settings.timing.request_timeout, Duration::from_secs(10));
        assert_eq!(settings.defaults.days, ReportWindow::OneDay);
        assert_eq!(settings.defaults.query_size, QuerySize::DEFAULT);
        assert_eq!(settings.log.level, "info");
        assert_eq!(settings.http_base(), "http://127.0.0.1");
        assert_eq!(settings.ws_url(), "ws://127.0.0.1/websocket");
    }

    #[test]
    fn test_port_is_part_of_urls_only_when_set() {
        let file = toml_file(
            r#"
            [server]
            host = "pi.hole"
            "#,
        );
        let settings =
            Settings::load_with_env(Some(file.path()), &Overrides::default(), no_env()).unwrap();
        assert_eq!(settings.ws_url(), "ws://pi.hole/websocket");

        let overrides = Overrides {
            port: Some(8080),
            ..Default::default()
        };
        let settings = Settings::load_with_env(Some(file.path()), &overrides, no_env()).unwrap();
        assert_eq!(settings.http_base(), "http://pi.hole:8080");
        assert_eq!(settings.ws_url(), "ws://pi.hole:8080/websocket");
    }

    #[test]
    fn test_zero_intervals_rejected() {
        let zero_reconnect = Overrides {
            reconnect: Some("0s".into()),
            ..Default::default()
        };
        let err = Settings::load_with_env(None, &zero_reconnect, no_env()).unwrap_err();
        assert!(err.to_string().contains("timing.reconnect"));

        let env = env(&[("PIDASH_TIMING__REFRESH", "0ms")]);
        assert!(Settings::load_with_env(None, &Overrides::default(), env).is_err());

        let short = Overrides {
            reconnect: Some("250ms".into()),
            ..Default::default()
        };
        assert!(Settings::load_with_env(None, &short, no_env()).is_ok());
    }

    #[test]
    fn test_file_then_env_then_cli() {
        let file = toml_file(
            r#"
            [server]
            host = "pi.lan"
            port = 9000

            [timing]
            refresh = "30s"
            reconnect = "500ms"

            [defaults]
            days = 7
            query_size = 300
            "#,
        );

        let settings =
            Settings::load_with_env(Some(file.path()), &Overrides::default(), no_env()).unwrap();
        assert_eq!(settings.server.host, "pi.lan");
        assert_eq!(settings.timing.reconnect, Duration::from_millis(500));
        assert_eq!(settings.defaults.days, ReportWindow::SevenDays);
        assert_eq!(settings.defaults.query_size.get(), 300);

        let env = env(&[
            ("PIDASH_SERVER__PORT", "9100"),
            ("PIDASH_TIMING__REFRESH", "2m"),
        ]);
        let overrides = Overrides {
            host: Some("10.0.0.2".into()),
            days: Some("14".into()),
            ..Default::default()
        };
        let settings = Settings::load_with_env(Some(file.path()), &overrides, env).unwrap();
        assert_eq!(settings.server.host, "10.0.0.2");
        assert_eq!(settings.server.port, Some(9100));
        assert_eq!(settings.timing.refresh, Duration::from_secs(120));
        assert_eq!(settings.defaults.days, ReportWindow::FourteenDays);
        assert_eq!(settings.ws_url(), "ws://10.0.0.2:9100/websocket");
    }

    #[test]
    fn test_named_file_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        assert!(Settings::load_with_env(Some(&path), &Overrides::default(), no_env()).is_err());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let bad_size = Overrides {
            query_size: Some(250),
            ..Default::default()
        };
        assert!(Settings::load_with_env(None, &bad_size, no_env()).is_err());

        let bad_days = Overrides {
            days: Some("2".into()),
            ..Default::default()
        };
        assert!(Settings::load_with_env(None, &bad_days, no_env()).is_err());

        let bad_delay = Overrides {
            reconnect: Some("soon".into()),
            ..Default::default()
        };
        assert!(Settings::load_with_env(None, &bad_delay, no_env()).is_err());
    }
}
