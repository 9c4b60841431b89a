//! Validation results returned by validators.
//!
//! A validator always answers with exactly one [`ValidationResult`]: either
//! `Pass`, or `Fail` carrying an error message and an optional fix value.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Details of a failed validation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FailResult {
    /// Human-readable reason for the failure
    pub error_message: String,

    /// Suggested replacement for the validated value, if the validator has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix_value: Option<String>,
}

impl FailResult {
    /// Create a failure without a fix value.
    pub fn new(error_message: impl Into<String>) -> Self {
        Self {
            error_message: error_message.into(),
            fix_value: None,
        }
    }

    /// Attach a fix value.
    pub fn with_fix(mut self, fix_value: impl Into<String>) -> Self {
        self.fix_value = Some(fix_value.into());
        self
    }
}

/// Outcome of a single validation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ValidationResult {
    /// The value passed validation.
    Pass,

    /// The value failed validation.
    Fail(FailResult),
}

impl ValidationResult {
    /// Shorthand for a failure without a fix value.
    pub fn fail(error_message: impl Into<String>) -> Self {
        Self::Fail(FailResult::new(error_message))
    }

    /// Shorthand for a failure with a fix value.
    pub fn fail_with_fix(error_message: impl Into<String>, fix_value: impl Into<String>) -> Self {
        Self::Fail(FailResult::new(error_message).with_fix(fix_value))
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    pub fn is_fail(&self) -> bool {
        !self.is_pass()
    }

    /// The failure details, if this is a `Fail`.
    pub fn as_fail(&self) -> Option<&FailResult> {
        match self {
            Self::Pass => None,
            Self::Fail(fail) => Some(fail),
        }
    }

    /// The error message, if this is a `Fail`.
    pub fn error_message(&self) -> Option<&str> {
        self.as_fail().map(|f| f.error_message.as_str())
    }

    /// The fix value, if this is a `Fail` that carries one.
    pub fn fix_value(&self) -> Option<&str> {
        self.as_fail().and_then(|f| f.fix_value.as_deref())
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Fail(fail) => write!(f, "FAIL: {}", fail.error_message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_has_no_fail_attributes() {
        let result = ValidationResult::Pass;
        assert!(result.is_pass());
        assert!(result.error_message().is_none());
        assert!(result.fix_value().is_none());
    }

    #[test]
    fn test_fail_accessors() {
        let result = ValidationResult::fail_with_fix("bad", "good");
        assert!(result.is_fail());
        assert_eq!(result.error_message(), Some("bad"));
        assert_eq!(result.fix_value(), Some("good"));

        let bare = ValidationResult::fail("bad");
        assert_eq!(bare.fix_value(), None);
    }

    #[test]
    fn test_serialized_shape() {
        let pass = serde_json::to_value(ValidationResult::Pass).unwrap();
        assert_eq!(pass, serde_json::json!({"outcome": "pass"}));

        let fail = serde_json::to_value(ValidationResult::fail("bad")).unwrap();
        assert_eq!(
            fail,
            serde_json::json!({"outcome": "fail", "error_message": "bad"})
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(ValidationResult::Pass.to_string(), "PASS");
        assert_eq!(ValidationResult::fail("nope").to_string(), "FAIL: nope");
    }
}
