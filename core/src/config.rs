//! Component configuration parsed from environment variables.

use std::time::Duration;

use crate::error::ConfigError;

pub const API_URL_VAR: &str = "TODO_API_URL";
pub const DEFAULT_UPDATE_DEBOUNCE_MS: u64 = 500;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL without a trailing slash.
    pub api_url: String,
    /// Quiet period before an edited task is pushed to the backend.
    pub update_debounce: Duration,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl ClientConfig {
    /// Config for `api_url` with every other knob at its default.
    pub fn new(api_url: &str) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            update_debounce: Duration::from_millis(DEFAULT_UPDATE_DEBOUNCE_MS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }

    /// Build typed config from environment variables.
    ///
    /// Required:
    /// - `TODO_API_URL`: backend base URL
    ///
    /// Optional:
    /// - `TODO_UPDATE_DEBOUNCE_MS`: default 500
    /// - `TODO_REQUEST_TIMEOUT_SECS`: default 30
    /// - `TODO_CONNECT_TIMEOUT_SECS`: default 10
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_url = std::env::var(API_URL_VAR).map_err(|_| ConfigError::MissingVar { var: API_URL_VAR.into() })?;
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue {
                var: API_URL_VAR.into(),
                reason: format!("expected an http(s) URL, got '{api_url}'"),
            });
        }

        Ok(Self {
            update_debounce: Duration::from_millis(env_parse("TODO_UPDATE_DEBOUNCE_MS", DEFAULT_UPDATE_DEBOUNCE_MS)),
            request_timeout: Duration::from_secs(env_parse("TODO_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)),
            connect_timeout: Duration::from_secs(env_parse("TODO_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS)),
            ..Self::new(&api_url)
        })
    }

    pub fn with_update_debounce(mut self, debounce: Duration) -> Self {
        self.update_debounce = debounce;
        self
    }
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
