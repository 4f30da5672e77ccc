//! Client configuration parsed from environment variables.

use crate::error::ApiError;

pub const DEFAULT_BASE_URL: &str = "https://kskhospital.prime5d.in/kskhospital";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Backend root without a trailing slash.
    pub base_url: String,
    pub timeouts: Timeouts,
}

impl ApiConfig {
    /// Config for `base_url` with default timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ConfigParse`] unless the URL is `http://` or `https://`.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Ok(Self { base_url: normalize_base_url(base_url)?, timeouts: Timeouts::default() })
    }

    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `HMS_BASE_URL`: backend root, default [`DEFAULT_BASE_URL`]
    /// - `HMS_REQUEST_TIMEOUT_SECS`: default 30
    /// - `HMS_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::ConfigParse`] for a base URL that is not HTTP(S).
    pub fn from_env() -> Result<Self, ApiError> {
        let base_url = match std::env::var("HMS_BASE_URL") {
            Ok(raw) if !raw.trim().is_empty() => normalize_base_url(&raw)?,
            _ => DEFAULT_BASE_URL.to_owned(),
        };
        let timeouts = Timeouts {
            request_secs: env_parse_u64("HMS_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("HMS_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        Ok(Self { base_url, timeouts })
    }

    #[must_use]
    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ApiError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let rest = trimmed.strip_prefix("https://").or_else(|| trimmed.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() => Ok(trimmed.to_owned()),
        _ => Err(ApiError::ConfigParse(format!("HMS_BASE_URL must be an http(s) URL, got '{raw}'"))),
    }
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    let Ok(raw) = std::env::var(key) else {
        return default;
    };
    match raw.trim().parse::<u64>() {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, value = %raw, error = %e, "ignoring unparseable env value");
            default
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
