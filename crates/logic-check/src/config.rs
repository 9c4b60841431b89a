//! Validator configuration.
//!
//! Built from the JSON arguments a guard passes to the validator factory.
//! Keys not listed here (`api_key`, `base_url`, `organization`) are left for
//! the provider factory.
//!
//! ```json
//! {
//!   "model": "gpt-4o",
//!   "max_tokens": 1024,
//!   "temperature": 0.0,
//!   "timeout": "30s",
//!   "sentinel_match": "exact",
//!   "provider": "openai"
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::time::Duration;
use thiserror::Error;

use crate::providers::CompletionConfig;
use crate::verdict::SentinelMatch;

/// Errors from reading validator configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid validator arguments: {0}")]
    InvalidArguments(#[from] serde_json::Error),

    #[error("Invalid value for '{field}': {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },
}

/// Settings for the logic check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogicCheckConfig {
    /// Model identifier
    pub model: String,

    /// Output token limit
    pub max_tokens: u32,

    /// Sampling temperature (0.0 for deterministic)
    pub temperature: f32,

    /// Per-request timeout; accepts "30s", "2m" or plain seconds
    #[serde(with = "duration_human")]
    pub timeout: Duration,

    /// How the reply is compared with the sentinel
    pub sentinel_match: SentinelMatch,

    /// Provider name in the provider registry
    pub provider: String,
}

impl Default for LogicCheckConfig {
    fn default() -> Self {
        let completion = CompletionConfig::default();
        Self {
            model: completion.model,
            max_tokens: completion.max_tokens,
            temperature: completion.temperature,
            timeout: completion.timeout,
            sentinel_match: SentinelMatch::Exact,
            provider: "openai".to_string(),
        }
    }
}

impl LogicCheckConfig {
    /// Create a config with the specified model.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    /// Read and check a config from validator arguments.
    pub fn from_args(args: &JsonValue) -> Result<Self, ConfigError> {
        let config: LogicCheckConfig = if args.is_null() {
            Self::default()
        } else {
            serde_json::from_value(args.clone())?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_sentinel_match(mut self, mode: SentinelMatch) -> Self {
        self.sentinel_match = mode;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "model",
                message: "must not be empty".to_string(),
            });
        }
        if self.max_tokens == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_tokens",
                message: "must be at least 1".to_string(),
            });
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "temperature",
                message: format!("{} is outside 0.0..=2.0", self.temperature),
            });
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "timeout",
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Request settings for the provider.
    pub fn completion(&self) -> CompletionConfig {
        CompletionConfig {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            timeout: self.timeout,
        }
    }
}

mod duration_human {
    use serde::{de, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Secs(u64),
        Text(String),
    }

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&humantime::format_duration(*duration).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Raw::deserialize(deserializer)? {
            Raw::Secs(secs) => Ok(Duration::from_secs(secs)),
            Raw::Text(text) => humantime::parse_duration(&text).map_err(de::Error::custom),
        }
    }
}
