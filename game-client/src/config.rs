use std::env;
use std::time::Duration;

use reqwest::Url;
use thiserror::Error;

use game_core::{DEFAULT_MAX_WORD_ATTEMPTS, RetryPolicy};
use game_persistence::connection::DEFAULT_DATABASE_URL;

pub const DEFAULT_WORD_API_BASE_URL: &str = "https://api.api-ninjas.com/";
pub const DEFAULT_LEADERBOARD_BASE_URL: &str = "http://dreamlo.com/lb/";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("Invalid {name}: {value}")]
    InvalidNumber { name: &'static str, value: String },
    #[error("Invalid {name}: {value}")]
    InvalidBool { name: &'static str, value: String },
    #[error("Invalid URL in {name}: {value}")]
    InvalidUrl { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub word_api_base_url: Url,
    pub word_api_key: String,
    pub leaderboard_base_url: Url,
    pub leaderboard_private_code: String,
    pub leaderboard_public_code: String,
    pub database_url: String,
    pub max_word_attempts: u32,
    pub request_timeout_seconds: u64,
    pub tick_interval_millis: u64,
    pub replace_word_on_empty_tip: bool,
}

impl Config {
    /// Read the process environment, seeded from `.env` when present.
    pub fn from_env() -> Result<Self, ConfigError> {
        if dotenvy::dotenv().is_ok() {
            tracing::debug!("Loaded .env file");
        }
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &'static str| lookup(name).filter(|value| !value.trim().is_empty());
        let required = |name: &'static str| var(name).ok_or(ConfigError::Missing(name));

        Ok(Self {
            word_api_base_url: parse_base_url(
                "WORD_API_BASE_URL",
                var("WORD_API_BASE_URL").as_deref(),
                DEFAULT_WORD_API_BASE_URL,
            )?,
            word_api_key: required("WORD_API_KEY")?,
            leaderboard_base_url: parse_base_url(
                "LEADERBOARD_BASE_URL",
                var("LEADERBOARD_BASE_URL").as_deref(),
                DEFAULT_LEADERBOARD_BASE_URL,
            )?,
            leaderboard_private_code: required("LEADERBOARD_PRIVATE_CODE")?,
            leaderboard_public_code: required("LEADERBOARD_PUBLIC_CODE")?,
            database_url: var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            max_word_attempts: parse_number(
                "MAX_WORD_ATTEMPTS",
                var("MAX_WORD_ATTEMPTS"),
                DEFAULT_MAX_WORD_ATTEMPTS,
            )?,
            request_timeout_seconds: parse_number(
                "REQUEST_TIMEOUT_SECONDS",
                var("REQUEST_TIMEOUT_SECONDS"),
                10,
            )?,
            tick_interval_millis: parse_number(
                "TICK_INTERVAL_MILLIS",
                var("TICK_INTERVAL_MILLIS"),
                1000,
            )?,
            replace_word_on_empty_tip: parse_bool(
                "REPLACE_WORD_ON_EMPTY_TIP",
                var("REPLACE_WORD_ON_EMPTY_TIP"),
                true,
            )?,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_millis)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_word_attempts)
    }
}

fn parse_number<T: std::str::FromStr + PartialOrd + Default>(
    name: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };

    match raw.trim().parse::<T>() {
        Ok(value) if value > T::default() => Ok(value),
        _ => Err(ConfigError::InvalidNumber { name, value: raw }),
    }
}

fn parse_bool(name: &'static str, raw: Option<String>, default: bool) -> Result<bool, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidBool { name, value: raw }),
    }
}

// Relative joins drop the last path segment unless the base ends in a slash.
fn parse_base_url(name: &'static str, raw: Option<&str>, default: &str) -> Result<Url, ConfigError> {
    let mut value = raw.unwrap_or(default).trim().to_string();
    if !value.ends_with('/') {
        value.push('/');
    }

    let url = Url::parse(&value).map_err(|_| ConfigError::InvalidUrl {
        name,
        value: value.clone(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl { name, value });
    }

    Ok(url)
}
