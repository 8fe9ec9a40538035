//! Startup configuration from the environment

use reqwest::Url;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:3000";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_ANSWER_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is not a valid URL: {value}")]
    InvalidUrl { var: &'static str, value: String },
    #[error("{var} must be a positive integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the answer service
    pub backend_url: Url,
    pub port: u16,
    /// Deadline for one answer call
    pub answer_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend_url = match lookup("GREENBOT_BACKEND_URL") {
            Some(value) => Url::parse(&value).map_err(|_| ConfigError::InvalidUrl {
                var: "GREENBOT_BACKEND_URL",
                value,
            })?,
            None => Url::parse(DEFAULT_BACKEND_URL).map_err(|_| ConfigError::InvalidUrl {
                var: "GREENBOT_BACKEND_URL",
                value: DEFAULT_BACKEND_URL.to_string(),
            })?,
        };

        let port = match lookup("GREENBOT_PORT") {
            Some(value) => parse_positive::<u16>("GREENBOT_PORT", value)?,
            None => DEFAULT_PORT,
        };

        let timeout_secs = match lookup("GREENBOT_ANSWER_TIMEOUT_SECS") {
            Some(value) => parse_positive::<u64>("GREENBOT_ANSWER_TIMEOUT_SECS", value)?,
            None => DEFAULT_ANSWER_TIMEOUT_SECS,
        };

        Ok(Self {
            backend_url,
            port,
            answer_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn parse_positive<T>(var: &'static str, value: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr + Default + PartialEq,
{
    match value.trim().parse::<T>() {
        Ok(n) if n != T::default() => Ok(n),
        _ => Err(ConfigError::InvalidNumber { var, value }),
    }
}
