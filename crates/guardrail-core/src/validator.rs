//! The validator trait and its data types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt;

use crate::on_fail::OnFail;
use crate::result::ValidationResult;

/// Open key-value metadata passed alongside a value.
///
/// BTreeMap keeps iteration order deterministic.
pub type Metadata = BTreeMap<String, JsonValue>;

/// Data types a validator can declare support for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    String,
    Integer,
    Float,
    Bool,
    Object,
    List,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::String => "string",
            DataType::Integer => "integer",
            DataType::Float => "float",
            DataType::Bool => "bool",
            DataType::Object => "object",
            DataType::List => "list",
        };
        f.write_str(name)
    }
}

/// A pluggable check over a value.
///
/// # Contract
/// - `validate` MUST return exactly one `ValidationResult` for every input
/// - Failures inside the validator are reported as `Fail`, never as panics
/// - Validators hold no mutable state between calls
#[async_trait]
pub trait Validator: Send + Sync {
    /// Registered name (e.g., "guardrails/logic_check").
    fn name(&self) -> &str;

    /// Data type this validator accepts.
    fn data_type(&self) -> DataType {
        DataType::String
    }

    /// Policy the guard applies when this validator fails.
    fn on_fail(&self) -> &OnFail;

    /// Validate a value.
    ///
    /// # Arguments
    /// * `value` - The text to check
    /// * `metadata` - Caller-supplied metadata; validators may ignore it
    async fn validate(&self, value: &str, metadata: &Metadata) -> ValidationResult;
}
