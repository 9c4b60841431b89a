//! Guard configuration parsing from YAML/JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fs;
use std::path::Path;

use super::schema::validate_guard_schema;
use super::GuardError;
use crate::on_fail::OnFailAction;

/// One validator entry in a guard configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidatorSpec {
    /// Registered validator name (e.g., "guardrails/logic_check")
    pub name: String,

    /// Policy applied when the validator fails
    #[serde(default)]
    pub on_fail: OnFailAction,

    /// Validator-specific arguments
    #[serde(default = "empty_args")]
    pub args: JsonValue,
}

fn empty_args() -> JsonValue {
    JsonValue::Object(Default::default())
}

impl ValidatorSpec {
    pub fn new(name: impl Into<String>, on_fail: OnFailAction) -> Self {
        Self {
            name: name.into(),
            on_fail,
            args: empty_args(),
        }
    }

    pub fn with_args(mut self, args: JsonValue) -> Self {
        self.args = args;
        self
    }
}

/// A guard configuration: a named, ordered list of validators.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GuardConfig {
    /// Human-readable name
    pub name: String,

    /// Detailed description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Validators, applied in order
    pub validators: Vec<ValidatorSpec>,
}

impl GuardConfig {
    /// Parse a guard configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, GuardError> {
        let value: JsonValue = serde_yaml::from_str(yaml)?;
        Self::from_value(value)
    }

    /// Parse a guard configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, GuardError> {
        let value: JsonValue = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Parse a guard configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, GuardError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse a guard configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, GuardError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    fn from_value(value: JsonValue) -> Result<Self, GuardError> {
        validate_guard_schema(&value).map_err(GuardError::Schema)?;
        let config: GuardConfig = serde_json::from_value(value)?;
        Ok(config)
    }
}
