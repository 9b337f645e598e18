use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("failed to parse {name} as boolean: {value}")]
    ParseBool { name: String, value: String },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Settings {
    // Upstream feed API
    pub api_base: String,
    pub http_timeout: Duration,

    // Media cache
    pub images_cache: PathBuf,
    pub send_gif: bool,

    // Request identity
    pub user_agent: Option<String>,
}

impl Settings {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable has an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_base: env_or_default("WEIBO_API_BASE", "https://m.weibo.cn")
                .trim_end_matches('/')
                .to_string(),
            http_timeout: Duration::from_secs(parse_env_u64("HTTP_TIMEOUT_SECS", 20)?),

            images_cache: PathBuf::from(env_or_default("IMAGES_CACHE_DIR", "./data/images")),
            send_gif: parse_env_bool("SEND_GIF", false)?,

            user_agent: optional_env("USER_AGENT"),
        })
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "WEIBO_API_BASE".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        if self.http_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "HTTP_TIMEOUT_SECS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Baseline settings for tests; override fields with struct update syntax.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            api_base: "http://127.0.0.1:0".to_string(),
            http_timeout: Duration::from_secs(5),
            images_cache: PathBuf::from("./data/images"),
            send_gif: false,
            user_agent: Some("weibo-feed-fetcher-tests/0.1".to_string()),
        }
    }
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_bool(name: &str, default: bool) -> Result<bool, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => match val.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::ParseBool {
                name: name.to_string(),
                value: val,
            }),
        },
        _ => Ok(default),
    }
}
