//! Generator settings
//!
//! A serializable description of a generator's configuration, loadable from
//! JSON or from `CLIENTGEN_*` environment variables. Settings are turned into
//! a builder with [`HttpClientGeneratorBuilder::from_settings`].
//!
//! [`HttpClientGeneratorBuilder::from_settings`]: crate::builder::HttpClientGeneratorBuilder::from_settings

use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Deserializer};

use crate::defaults;
use crate::error::{GeneratorError, Result};
use crate::retry::LinearRetryStrategy;

/// Loaded generator settings.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorSettings {
    pub root_url: String,
    #[serde(default, deserialize_with = "deserialize_secret")]
    pub api_key: Option<SecretString>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub retry: RetrySettings,
    #[serde(default = "enabled")]
    pub caching: bool,
}

/// Linear retry settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetrySettings {
    pub enabled: bool,
    pub max_attempts: u32,
    pub delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_attempts: defaults::retry::MAX_ATTEMPTS,
            delay_ms: defaults::retry::DELAY.as_millis() as u64,
        }
    }
}

impl RetrySettings {
    pub fn strategy(&self) -> LinearRetryStrategy {
        LinearRetryStrategy::new(self.max_attempts, Duration::from_millis(self.delay_ms))
    }
}

fn enabled() -> bool {
    true
}

fn deserialize_secret<'de, D>(deserializer: D) -> std::result::Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(SecretString::from))
}

impl GeneratorSettings {
    pub fn new(root_url: impl Into<String>) -> Self {
        Self {
            root_url: root_url.into(),
            api_key: None,
            user_agent: None,
            retry: RetrySettings::default(),
            caching: true,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| GeneratorError::ConfigurationError(format!("invalid settings: {e}")))
    }

    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let root_url = var(defaults::env::ROOT_URL).ok_or_else(|| {
            GeneratorError::ConfigurationError(format!(
                "{} is not set",
                defaults::env::ROOT_URL
            ))
        })?;

        let mut settings = Self::new(root_url);
        settings.api_key = var(defaults::env::API_KEY).map(SecretString::from);
        settings.user_agent = var(defaults::env::USER_AGENT);

        if let Some(raw) = var(defaults::env::RETRY_MAX_ATTEMPTS) {
            settings.retry.max_attempts = parse_number(defaults::env::RETRY_MAX_ATTEMPTS, &raw)?;
        }
        if let Some(raw) = var(defaults::env::RETRY_DELAY_MS) {
            settings.retry.delay_ms = parse_number(defaults::env::RETRY_DELAY_MS, &raw)?;
        }
        if let Some(raw) = var(defaults::env::DISABLE_RETRIES) {
            settings.retry.enabled = !parse_flag(defaults::env::DISABLE_RETRIES, &raw)?;
        }
        if let Some(raw) = var(defaults::env::DISABLE_CACHING) {
            settings.caching = !parse_flag(defaults::env::DISABLE_CACHING, &raw)?;
        }
        Ok(settings)
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T> {
    raw.trim().parse().map_err(|_| {
        GeneratorError::ConfigurationError(format!("{name} must be a non-negative integer, got '{raw}'"))
    })
}

fn parse_flag(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(GeneratorError::ConfigurationError(format!(
            "{name} must be a boolean, got '{raw}'"
        ))),
    }
}
