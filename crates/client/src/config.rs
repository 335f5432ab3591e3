//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `GATHERLY_API_BASE_URL` - Base URL of the booking backend
//!
//! ## Optional
//! - `GATHERLY_CHECKOUT_KEY_ID` - Publishable checkout key, used when the
//!   backend omits `keyId` from a payment order
//! - `GATHERLY_HTTP_TIMEOUT_SECS` - Request timeout (default: 15)
//! - `GATHERLY_POLL_INTERVAL_MS` - Status poll interval (default: 2500)
//! - `GATHERLY_POLL_CUTOFF_SECS` - Status poll wall-clock cutoff (default: 90)
//! - `GATHERLY_PHONE_MIN_DIGITS` - Minimum phone digits (default: 6)
//! - `GATHERLY_PHONE_MAX_DIGITS` - Maximum phone digits (default: 13)

use std::time::Duration;

use gatherly_core::PhoneLimits;
use thiserror::Error;
use url::Url;

use crate::form::FormLimits;
use crate::poller::PollPolicy;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client application configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the booking backend API.
    pub api_base_url: Url,
    /// Publishable checkout key fallback.
    pub checkout_key_id: Option<String>,
    /// HTTP request timeout.
    pub http_timeout: Duration,
    /// Status poller timing.
    pub poll: PollPolicy,
    /// Phone digit bounds for form validation.
    pub phone: PhoneLimits,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or any
    /// variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = parse_base_url(&get_required_env("GATHERLY_API_BASE_URL")?)
            .map_err(|e| ConfigError::InvalidEnvVar("GATHERLY_API_BASE_URL".to_owned(), e))?;

        let http_timeout = Duration::from_secs(parse_env_or_default(
            "GATHERLY_HTTP_TIMEOUT_SECS",
            15,
        )?);
        let poll = PollPolicy {
            interval: Duration::from_millis(parse_env_or_default(
                "GATHERLY_POLL_INTERVAL_MS",
                2_500,
            )?),
            cutoff: Duration::from_secs(parse_env_or_default("GATHERLY_POLL_CUTOFF_SECS", 90)?),
        };
        let phone = PhoneLimits {
            min_digits: parse_env_or_default("GATHERLY_PHONE_MIN_DIGITS", 6)?,
            max_digits: parse_env_or_default("GATHERLY_PHONE_MAX_DIGITS", 13)?,
        };

        Ok(Self {
            api_base_url,
            checkout_key_id: get_optional_env("GATHERLY_CHECKOUT_KEY_ID"),
            http_timeout,
            poll,
            phone,
        })
    }

    /// Validation limits for the registration form.
    #[must_use]
    pub const fn form_limits(&self) -> FormLimits {
        FormLimits { phone: self.phone }
    }

    #[cfg(test)]
    #[allow(clippy::unwrap_used)]
    pub(crate) fn for_tests(base_url: &str) -> Self {
        Self {
            api_base_url: parse_base_url(base_url).unwrap(),
            checkout_key_id: None,
            http_timeout: Duration::from_secs(5),
            poll: PollPolicy::default(),
            phone: PhoneLimits::default(),
        }
    }
}

/// Parse a base URL, normalizing to a trailing slash so endpoint joins
/// keep the full path.
fn parse_base_url(raw: &str) -> Result<Url, String> {
    let mut normalized = raw.trim().to_owned();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    let url = Url::parse(&normalized).map_err(|e| e.to_string())?;
    if url.cannot_be_a_base() {
        return Err("not a usable base URL".to_owned());
    }
    Ok(url)
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_owned()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Parse an environment variable with a default when unset.
fn parse_env_or_default<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_owned(), e.to_string())),
        Err(_) => Ok(default),
    }
}
