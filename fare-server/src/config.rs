//! Application configuration.
//!
//! Every setting has a default; environment variables override the few that
//! differ between deployments:
//!
//! | Variable                     | Default          |
//! |------------------------------|------------------|
//! | `FARE_LISTEN_ADDR`           | `127.0.0.1:3000` |
//! | `FARE_DATA_DIR`              | `data`           |
//! | `FARE_COLLECT_INTERVAL_MINS` | `20`             |
//! | `FARE_UPSTREAM_URL`          | upstream default |
//! | `SHORTENER_API_KEY`          | none             |
//! | `FARE_UTC_OFFSET_MINS`       | `180` (Moscow)   |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::collector::CollectorConfig;
use crate::link::LinkConfig;
use crate::selection::SelectionConfig;
use crate::upstream::UpstreamConfig;

/// Error for a configuration value that cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {key}: {message}")]
    Invalid { key: String, message: String },
}

impl ConfigError {
    pub fn invalid(key: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// What the binary was asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Collect on a schedule and serve the API (the default).
    Serve,
    /// Rebuild the round-trip index from the stored raw fares, then exit.
    Reindex,
    /// Report window dates missing from the stored raw fares, then exit.
    Check,
}

impl Command {
    /// Parse the arguments following the program name.
    pub fn from_args<I, S>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut args = args.into_iter();
        let command = match args.next() {
            None => Command::Serve,
            Some(arg) => match arg.as_ref() {
                "serve" => Command::Serve,
                "reindex" => Command::Reindex,
                "check" => Command::Check,
                other => {
                    return Err(ConfigError::invalid(
                        "command",
                        format!("unknown command {other:?}, expected serve, reindex or check"),
                    ));
                }
            },
        };
        if let Some(extra) = args.next() {
            return Err(ConfigError::invalid(
                "command",
                format!("unexpected argument {:?}", extra.as_ref()),
            ));
        }
        Ok(command)
    }
}

/// Everything the server needs to start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listen_addr: SocketAddr,
    /// Directory holding the document collections.
    pub data_dir: PathBuf,
    pub upstream: UpstreamConfig,
    pub collector: CollectorConfig,
    pub selection: SelectionConfig,
    pub link: LinkConfig,
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            data_dir: PathBuf::from("data"),
            upstream: UpstreamConfig::default(),
            collector: CollectorConfig::default(),
            selection: SelectionConfig::default(),
            link: LinkConfig::default(),
        }
    }

    /// Defaults overridden from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `var` returns for each known key.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::new();

        if let Some(addr) = var("FARE_LISTEN_ADDR") {
            config.listen_addr = addr
                .parse()
                .map_err(|e| ConfigError::invalid("FARE_LISTEN_ADDR", format!("{e}")))?;
        }
        if let Some(dir) = var("FARE_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(mins) = var("FARE_COLLECT_INTERVAL_MINS") {
            let mins: u64 = mins.parse().map_err(|_| {
                ConfigError::invalid("FARE_COLLECT_INTERVAL_MINS", format!("not a number: {mins}"))
            })?;
            config.collector.interval = Duration::from_secs(mins.saturating_mul(60));
        }
        if let Some(url) = var("FARE_UPSTREAM_URL") {
            config.upstream = config.upstream.with_base_url(url);
        }
        if let Some(key) = var("SHORTENER_API_KEY").filter(|k| !k.is_empty()) {
            config.link = config.link.with_api_key(key);
        }

        if let Some(mins) = var("FARE_UTC_OFFSET_MINS") {
            let mins: i32 = mins.parse().map_err(|_| {
                ConfigError::invalid("FARE_UTC_OFFSET_MINS", format!("not a number: {mins}"))
            })?;
            if mins.abs() >= 24 * 60 {
                return Err(ConfigError::invalid(
                    "FARE_UTC_OFFSET_MINS",
                    "must be less than a day",
                ));
            }
            config.collector.utc_offset_secs = mins * 60;
        }

        config.selection.window_days = config.collector.window_days;
        config.selection.utc_offset_secs = config.collector.utc_offset_secs;
        config.collector.validate()?;
        Ok(config)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}
