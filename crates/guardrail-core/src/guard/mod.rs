//! Guard: runs validators in order and applies their on-fail policies.
//!
//! The guard is the host side of the validator contract. Validators only
//! report `Pass` or `Fail`; the guard decides what a failure means for the
//! output according to each validator's [`OnFail`](crate::OnFail) policy.

mod config;
mod schema;

pub use config::{GuardConfig, ValidatorSpec};
pub use schema::{validate_guard_schema, SchemaError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use crate::on_fail::Resolution;
use crate::registry::{RegistryError, ValidatorRegistry};
use crate::result::{FailResult, ValidationResult};
use crate::validator::{DataType, Metadata, Validator};

/// Errors from guard construction and execution.
#[derive(Error, Debug)]
pub enum GuardError {
    #[error("Failed to read guard file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Guard configuration does not match schema: {}", .0.join("; "))]
    Schema(Vec<String>),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Validator {validator} expects {found} values, guard validates {expected}")]
    DataTypeMismatch {
        validator: String,
        expected: DataType,
        found: DataType,
    },

    #[error("Validation failed for {validator}: {message}")]
    ValidationFailed { validator: String, message: String },
}

/// A failure handed back to the caller for regeneration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReaskRequest {
    /// Validator that asked for the reask
    pub validator: String,

    /// The value that failed
    pub incorrect_value: String,

    /// Why it failed
    pub fail: FailResult,
}

/// What one validator reported during a guard run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatorSummary {
    pub validator: String,
    pub result: ValidationResult,

    /// Policy applied, present only when the validator failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_fail_applied: Option<String>,
}

/// Result of running a guard over a value.
#[derive(Debug, Clone, Serialize)]
pub struct GuardOutcome {
    /// Guard name
    pub guard: String,

    /// The value as it was received
    pub raw_output: String,

    /// The value after on-fail policies; `None` when filtered or refrained
    pub validated_output: Option<String>,

    /// True when every validator passed on the first attempt
    pub validation_passed: bool,

    /// Failures the caller should send back to the model
    pub reasks: Vec<ReaskRequest>,

    /// One entry per validator call
    pub summaries: Vec<ValidatorSummary>,

    pub validated_at: DateTime<Utc>,
}

/// An ordered set of validators over string output.
pub struct Guard {
    name: String,
    validators: Vec<Arc<dyn Validator>>,
}

impl Guard {
    /// Create an empty guard.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            validators: Vec::new(),
        }
    }

    /// Append a validator.
    pub fn with_validator(mut self, validator: Arc<dyn Validator>) -> Result<Self, GuardError> {
        self.push(validator)?;
        Ok(self)
    }

    fn push(&mut self, validator: Arc<dyn Validator>) -> Result<(), GuardError> {
        if validator.data_type() != DataType::String {
            return Err(GuardError::DataTypeMismatch {
                validator: validator.name().to_string(),
                expected: DataType::String,
                found: validator.data_type(),
            });
        }
        self.validators.push(validator);
        Ok(())
    }

    /// Build a guard from configuration, constructing validators by name.
    pub fn from_config(
        config: &GuardConfig,
        registry: &ValidatorRegistry,
    ) -> Result<Self, GuardError> {
        let mut guard = Guard::new(config.name.clone());
        for spec in &config.validators {
            let validator = registry.create(&spec.name, &spec.args, spec.on_fail.into())?;
            guard.push(validator)?;
        }
        Ok(guard)
    }

    /// Build a guard from a YAML string.
    pub fn from_yaml(yaml: &str, registry: &ValidatorRegistry) -> Result<Self, GuardError> {
        Self::from_config(&GuardConfig::from_yaml(yaml)?, registry)
    }

    /// Build a guard from a YAML file.
    pub fn from_yaml_file(
        path: impl AsRef<Path>,
        registry: &ValidatorRegistry,
    ) -> Result<Self, GuardError> {
        Self::from_config(&GuardConfig::from_yaml_file(path)?, registry)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn validators(&self) -> &[Arc<dyn Validator>] {
        &self.validators
    }

    /// Run every validator over `value` and apply on-fail policies.
    ///
    /// # Execution Flow
    /// 1. Each validator sees the value produced by the previous one
    /// 2. `filter` and `refrain` stop the run with no output
    /// 3. `exception` stops the run with `GuardError::ValidationFailed`
    /// 4. `fix_reask` revalidates the fixed value exactly once
    pub async fn validate(
        &self,
        value: &str,
        metadata: &Metadata,
    ) -> Result<GuardOutcome, GuardError> {
        let mut current = value.to_string();
        let mut validation_passed = true;
        let mut reasks = Vec::new();
        let mut summaries = Vec::new();

        for validator in &self.validators {
            let result = validator.validate(&current, metadata).await;

            let fail = match &result {
                ValidationResult::Pass => {
                    summaries.push(ValidatorSummary {
                        validator: validator.name().to_string(),
                        result,
                        on_fail_applied: None,
                    });
                    continue;
                }
                ValidationResult::Fail(fail) => fail.clone(),
            };

            validation_passed = false;
            let policy = validator.on_fail();
            tracing::info!(
                guard = %self.name,
                validator = %validator.name(),
                on_fail = %policy,
                error = %fail.error_message,
                "Validator failed"
            );

            summaries.push(ValidatorSummary {
                validator: validator.name().to_string(),
                result,
                on_fail_applied: Some(policy.to_string()),
            });

            match policy.resolve(&current, &fail) {
                Resolution::Keep(kept) | Resolution::Fixed(kept) => current = kept,
                Resolution::Filtered | Resolution::Refrained => {
                    return Ok(self.outcome(value, None, false, reasks, summaries));
                }
                Resolution::Reask { value: failed, fail } => {
                    reasks.push(ReaskRequest {
                        validator: validator.name().to_string(),
                        incorrect_value: failed.clone(),
                        fail,
                    });
                    current = failed;
                }
                Resolution::Revalidate(fixed) => {
                    let second = validator.validate(&fixed, metadata).await;
                    if let ValidationResult::Fail(fail) = &second {
                        reasks.push(ReaskRequest {
                            validator: validator.name().to_string(),
                            incorrect_value: fixed.clone(),
                            fail: fail.clone(),
                        });
                    }
                    summaries.push(ValidatorSummary {
                        validator: validator.name().to_string(),
                        on_fail_applied: second.is_fail().then(|| policy.to_string()),
                        result: second,
                    });
                    current = fixed;
                }
                Resolution::Raise(message) => {
                    return Err(GuardError::ValidationFailed {
                        validator: validator.name().to_string(),
                        message,
                    });
                }
            }
        }

        Ok(self.outcome(value, Some(current), validation_passed, reasks, summaries))
    }

    fn outcome(
        &self,
        raw: &str,
        validated: Option<String>,
        validation_passed: bool,
        reasks: Vec<ReaskRequest>,
        summaries: Vec<ValidatorSummary>,
    ) -> GuardOutcome {
        GuardOutcome {
            guard: self.name.clone(),
            raw_output: raw.to_string(),
            validated_output: validated,
            validation_passed,
            reasks,
            summaries,
            validated_at: Utc::now(),
        }
    }
}

impl std::fmt::Debug for Guard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Guard")
            .field("name", &self.name)
            .field(
                "validators",
                &self.validators.iter().map(|v| v.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::on_fail::{OnFail, OnFailAction};
    use crate::registry::ValidatorFactory;
    use async_trait::async_trait;
    use serde_json::Value as JsonValue;

    /// Fails any value containing "bad" and proposes replacing it with "good".
    struct NoBadWords {
        on_fail: OnFail,
    }

    impl NoBadWords {
        fn arc(on_fail: impl Into<OnFail>) -> Arc<dyn Validator> {
            Arc::new(Self {
                on_fail: on_fail.into(),
            })
        }
    }

    #[async_trait]
    impl Validator for NoBadWords {
        fn name(&self) -> &str {
            "test/no_bad_words"
        }

        fn on_fail(&self) -> &OnFail {
            &self.on_fail
        }

        async fn validate(&self, value: &str, _metadata: &Metadata) -> ValidationResult {
            if value.contains("bad") {
                ValidationResult::fail_with_fix("contains bad", value.replace("bad", "good"))
            } else {
                ValidationResult::Pass
            }
        }
    }

    /// Always fails with a fix that still fails.
    struct Stubborn;

    #[async_trait]
    impl Validator for Stubborn {
        fn name(&self) -> &str {
            "test/stubborn"
        }

        fn on_fail(&self) -> &OnFail {
            static POLICY: std::sync::OnceLock<OnFail> = std::sync::OnceLock::new();
            POLICY.get_or_init(|| OnFailAction::FixReask.into())
        }

        async fn validate(&self, value: &str, _metadata: &Metadata) -> ValidationResult {
            ValidationResult::fail_with_fix("never satisfied", format!("{value}!"))
        }
    }

    struct IntegerOnly;

    #[async_trait]
    impl Validator for IntegerOnly {
        fn name(&self) -> &str {
            "test/integer"
        }

        fn data_type(&self) -> DataType {
            DataType::Integer
        }

        fn on_fail(&self) -> &OnFail {
            static POLICY: std::sync::OnceLock<OnFail> = std::sync::OnceLock::new();
            POLICY.get_or_init(OnFail::default)
        }

        async fn validate(&self, _value: &str, _metadata: &Metadata) -> ValidationResult {
            ValidationResult::Pass
        }
    }

    fn guard(on_fail: impl Into<OnFail>) -> Guard {
        Guard::new("test").with_validator(NoBadWords::arc(on_fail)).unwrap()
    }

    #[tokio::test]
    async fn test_pass_keeps_value() {
        let outcome = guard(OnFailAction::Exception)
            .validate("all fine", &Metadata::new())
            .await
            .unwrap();
        assert!(outcome.validation_passed);
        assert_eq!(outcome.validated_output.as_deref(), Some("all fine"));
        assert_eq!(outcome.summaries.len(), 1);
        assert!(outcome.summaries[0].on_fail_applied.is_none());
    }

    #[tokio::test]
    async fn test_exception_raises() {
        let result = guard(OnFailAction::Exception)
            .validate("bad news", &Metadata::new())
            .await;
        match result {
            Err(GuardError::ValidationFailed { validator, message }) => {
                assert_eq!(validator, "test/no_bad_words");
                assert_eq!(message, "contains bad");
            }
            other => panic!("Expected ValidationFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fix_replaces_value() {
        let outcome = guard(OnFailAction::Fix)
            .validate("bad news", &Metadata::new())
            .await
            .unwrap();
        assert!(!outcome.validation_passed);
        assert_eq!(outcome.validated_output.as_deref(), Some("good news"));
        assert_eq!(outcome.raw_output, "bad news");
    }

    #[tokio::test]
    async fn test_noop_keeps_failing_value() {
        let outcome = guard(OnFailAction::Noop)
            .validate("bad news", &Metadata::new())
            .await
            .unwrap();
        assert!(!outcome.validation_passed);
        assert_eq!(outcome.validated_output.as_deref(), Some("bad news"));
        assert_eq!(outcome.summaries[0].on_fail_applied.as_deref(), Some("noop"));
    }

    #[tokio::test]
    async fn test_filter_and_refrain_drop_output() {
        for action in [OnFailAction::Filter, OnFailAction::Refrain] {
            let outcome = guard(action)
                .validate("bad news", &Metadata::new())
                .await
                .unwrap();
            assert!(outcome.validated_output.is_none());
        }
    }

    #[tokio::test]
    async fn test_reask_collects_request() {
        let outcome = guard(OnFailAction::Reask)
            .validate("bad news", &Metadata::new())
            .await
            .unwrap();
        assert_eq!(outcome.reasks.len(), 1);
        assert_eq!(outcome.reasks[0].incorrect_value, "bad news");
        assert_eq!(outcome.reasks[0].fail.error_message, "contains bad");
    }

    #[tokio::test]
    async fn test_fix_reask_accepts_fixed_value() {
        let outcome = guard(OnFailAction::FixReask)
            .validate("bad news", &Metadata::new())
            .await
            .unwrap();
        assert!(outcome.reasks.is_empty());
        assert_eq!(outcome.validated_output.as_deref(), Some("good news"));
        // Original failure plus the passing revalidation
        assert_eq!(outcome.summaries.len(), 2);
        assert!(outcome.summaries[1].result.is_pass());
    }

    #[tokio::test]
    async fn test_fix_reask_reasks_when_fix_still_fails() {
        let guard = Guard::new("stubborn")
            .with_validator(Arc::new(Stubborn))
            .unwrap();
        let outcome = guard.validate("x", &Metadata::new()).await.unwrap();
        assert_eq!(outcome.reasks.len(), 1);
        assert_eq!(outcome.reasks[0].incorrect_value, "x!");
    }

    #[tokio::test]
    async fn test_custom_policy() {
        let outcome = guard(OnFail::custom(|_, _| Some("redacted".to_string())))
            .validate("bad news", &Metadata::new())
            .await
            .unwrap();
        assert_eq!(outcome.validated_output.as_deref(), Some("redacted"));
        assert_eq!(outcome.summaries[0].on_fail_applied.as_deref(), Some("custom"));
    }

    #[tokio::test]
    async fn test_validators_chain_values() {
        let guard = Guard::new("chain")
            .with_validator(NoBadWords::arc(OnFailAction::Fix))
            .unwrap()
            .with_validator(NoBadWords::arc(OnFailAction::Exception))
            .unwrap();
        // Second validator sees the fixed value and passes
        let outcome = guard.validate("bad", &Metadata::new()).await.unwrap();
        assert_eq!(outcome.validated_output.as_deref(), Some("good"));
    }

    #[test]
    fn test_data_type_mismatch() {
        let result = Guard::new("ints").with_validator(Arc::new(IntegerOnly));
        assert!(matches!(result, Err(GuardError::DataTypeMismatch { .. })));
    }

    struct NoBadWordsFactory;

    impl ValidatorFactory for NoBadWordsFactory {
        fn name(&self) -> &'static str {
            "test/no_bad_words"
        }

        fn data_type(&self) -> DataType {
            DataType::String
        }

        fn create(
            &self,
            _args: &JsonValue,
            on_fail: OnFail,
        ) -> Result<Arc<dyn Validator>, RegistryError> {
            Ok(NoBadWords::arc(on_fail))
        }
    }

    #[tokio::test]
    async fn test_from_yaml() {
        let mut registry = ValidatorRegistry::new();
        registry.register(Arc::new(NoBadWordsFactory));

        let yaml = r#"
name: "words"
validators:
  - name: "test/no_bad_words"
    on_fail: fix
"#;
        let guard = Guard::from_yaml(yaml, &registry).unwrap();
        assert_eq!(guard.name(), "words");
        assert_eq!(guard.validators().len(), 1);

        let outcome = guard.validate("bad", &Metadata::new()).await.unwrap();
        assert_eq!(outcome.validated_output.as_deref(), Some("good"));
    }

    #[test]
    fn test_from_yaml_unknown_validator() {
        let registry = ValidatorRegistry::new();
        let yaml = r#"
name: "words"
validators:
  - name: "test/missing"
"#;
        assert!(matches!(
            Guard::from_yaml(yaml, &registry),
            Err(GuardError::Registry(RegistryError::UnknownValidator { .. }))
        ));
    }
}
