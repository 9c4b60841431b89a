//! API key handling.
//!
//! A key is wrapped in [`ApiCredential`] as soon as it is read. `Debug` and
//! `Display` print where it came from, never its value.

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value as JsonValue;
use std::fmt;

use super::ProviderError;

/// Where a credential was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// Validator arguments
    Config,
    /// Environment variable
    Environment,
    /// Passed to a constructor
    Programmatic,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CredentialSource::Config => "config",
            CredentialSource::Environment => "environment",
            CredentialSource::Programmatic => "programmatic",
        })
    }
}

/// An API key that only [`ApiCredential::expose`] reveals.
pub struct ApiCredential {
    value: SecretString,
    source: CredentialSource,
    label: &'static str,
}

impl ApiCredential {
    pub fn new(value: impl Into<String>, source: CredentialSource, label: &'static str) -> Self {
        Self {
            value: SecretString::from(value.into()),
            source,
            label,
        }
    }

    /// Read `args[key]`, falling back to the `env_var` environment variable.
    pub fn from_config_or_env(
        args: &JsonValue,
        key: &str,
        env_var: &str,
        label: &'static str,
    ) -> Result<Self, ProviderError> {
        if let Some(value) = args[key].as_str() {
            return Ok(Self::new(value, CredentialSource::Config, label));
        }
        match std::env::var(env_var) {
            Ok(value) => Ok(Self::new(value, CredentialSource::Environment, label)),
            Err(_) => Err(ProviderError::NotConfigured(format!(
                "{} required: set '{}' in validator args or the {} environment variable",
                label, key, env_var
            ))),
        }
    }

    /// Whether [`ApiCredential::from_config_or_env`] would find a key.
    pub fn is_available(args: &JsonValue, key: &str, env_var: &str) -> bool {
        args[key].is_string() || std::env::var(env_var).is_ok()
    }

    /// The raw key. Call only where the request header is set.
    pub fn expose(&self) -> &str {
        self.value.expose_secret()
    }
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredential")
            .field("value", &"[REDACTED]")
            .field("source", &self.source)
            .field("label", &self.label)
            .finish()
    }
}

impl fmt::Display for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} from {} [REDACTED]", self.label, self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "sk-super-secret-key-12345";

    #[test]
    fn test_value_hidden_from_formatting() {
        let cred = ApiCredential::new(SECRET, CredentialSource::Config, "OpenAI API key");

        let debug = format!("{:?}", cred);
        assert!(!debug.contains(SECRET), "key leaked through Debug");
        assert!(debug.contains("[REDACTED]"));

        let display = cred.to_string();
        assert!(!display.contains(SECRET), "key leaked through Display");
        assert_eq!(display, "OpenAI API key from config [REDACTED]");
        assert_eq!(cred.expose(), SECRET);
    }

    #[test]
    fn test_args_take_priority_over_env() {
        std::env::set_var("LOGIC_CHECK_TEST_KEY_PRIORITY", "env-key");
        let cred = ApiCredential::from_config_or_env(
            &serde_json::json!({"api_key": "args-key"}),
            "api_key",
            "LOGIC_CHECK_TEST_KEY_PRIORITY",
            "Test key",
        )
        .unwrap();
        std::env::remove_var("LOGIC_CHECK_TEST_KEY_PRIORITY");

        assert_eq!(cred.expose(), "args-key");
        assert!(cred.to_string().contains("from config"));
    }

    #[test]
    fn test_env_fallback() {
        std::env::set_var("LOGIC_CHECK_TEST_KEY_FALLBACK", "env-key");
        let cred = ApiCredential::from_config_or_env(
            &serde_json::json!({}),
            "api_key",
            "LOGIC_CHECK_TEST_KEY_FALLBACK",
            "Test key",
        )
        .unwrap();
        std::env::remove_var("LOGIC_CHECK_TEST_KEY_FALLBACK");

        assert_eq!(cred.expose(), "env-key");
        assert!(cred.to_string().contains("from environment"));
    }

    #[test]
    fn test_missing_key_names_both_sources() {
        let err = ApiCredential::from_config_or_env(
            &serde_json::json!({}),
            "api_key",
            "LOGIC_CHECK_NONEXISTENT_VAR",
            "Test key",
        )
        .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("'api_key'"));
        assert!(message.contains("LOGIC_CHECK_NONEXISTENT_VAR"));
        assert!(!ApiCredential::is_available(
            &serde_json::json!({}),
            "api_key",
            "LOGIC_CHECK_NONEXISTENT_VAR"
        ));
        assert!(ApiCredential::is_available(
            &serde_json::json!({"api_key": "k"}),
            "api_key",
            "LOGIC_CHECK_NONEXISTENT_VAR"
        ));
    }
}
