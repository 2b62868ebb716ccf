//! Application configuration structures.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Prefix of environment variables that set a room's feed URL.
const ROOM_ENV_PREFIX: &str = "ICAL_ROOM_";

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// IANA time zone used to turn event instants into calendar dates
    #[serde(default = "defaults::time_zone")]
    pub time_zone: String,

    /// HTTP client settings for feed fetches
    #[serde(default)]
    pub http: HttpConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Room identifier to feed URL
    #[serde(default = "defaults::rooms")]
    pub rooms: BTreeMap<String, String>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Apply overrides from environment-style key/value pairs.
    ///
    /// `ICAL_ROOM_<ID>` sets the feed of room `<id>` (lowercased). The
    /// `AVAILABILITY_TIME_ZONE` and `FEED_*` keys override the matching
    /// settings. Numeric values that do not parse are ignored.
    pub fn apply_env_overrides<I>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            if let Some(room) = key.strip_prefix(ROOM_ENV_PREFIX) {
                if !room.is_empty() {
                    self.rooms.insert(room.to_lowercase(), value);
                }
                continue;
            }

            match key.as_str() {
                "AVAILABILITY_TIME_ZONE" => self.time_zone = value,
                "FEED_USER_AGENT" => self.http.user_agent = value,
                "FEED_TIMEOUT_SECS" => {
                    override_number(&key, &value, &mut self.http.timeout_secs)
                }
                "FEED_CONNECT_TIMEOUT_SECS" => {
                    override_number(&key, &value, &mut self.http.connect_timeout_secs)
                }
                "FEED_MAX_CONCURRENT" => {
                    override_number(&key, &value, &mut self.http.max_concurrent)
                }
                _ => {}
            }
        }
    }

    /// Parse the configured time zone.
    pub fn time_zone(&self) -> Result<Tz> {
        Tz::from_str(self.time_zone.trim()).map_err(|e| {
            AppError::config(format!("Unknown time zone '{}': {}", self.time_zone, e))
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        if self.http.connect_timeout_secs == 0 {
            return Err(AppError::validation(
                "http.connect_timeout_secs must be > 0",
            ));
        }
        if self.http.max_concurrent == 0 {
            return Err(AppError::validation("http.max_concurrent must be > 0"));
        }
        if let Some(room) = self.rooms.keys().find(|room| room.trim().is_empty()) {
            return Err(AppError::validation(format!(
                "room identifier '{room}' is blank"
            )));
        }
        self.time_zone()
            .map_err(|e| AppError::validation(e.to_string()))?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            time_zone: defaults::time_zone(),
            http: HttpConfig::default(),
            logging: LoggingConfig::default(),
            rooms: defaults::rooms(),
        }
    }
}

fn override_number<T: FromStr>(key: &str, value: &str, target: &mut T) {
    match value.trim().parse() {
        Ok(parsed) => *target = parsed,
        Err(_) => log::warn!("Ignoring {key}={value:?}: not a valid number"),
    }
}

/// HTTP client settings for feed fetches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Whole-request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Connect timeout in seconds
    #[serde(default = "defaults::connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Maximum concurrent outbound feed fetches
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            connect_timeout_secs: defaults::connect_timeout(),
            max_concurrent: defaults::max_concurrent(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log filter when `RUST_LOG` is unset
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    use std::collections::BTreeMap;

    pub fn time_zone() -> String {
        "UTC".into()
    }

    // HTTP defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; availability/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn connect_timeout() -> u64 {
        10
    }
    pub fn max_concurrent() -> usize {
        4
    }

    pub fn log_level() -> String {
        "info".into()
    }

    // Rooms start unconfigured; feeds come from the config file or env.
    pub fn rooms() -> BTreeMap<String, String> {
        ["stanza1", "stanza2"]
            .into_iter()
            .map(|room| (room.to_string(), String::new()))
            .collect()
    }
}
