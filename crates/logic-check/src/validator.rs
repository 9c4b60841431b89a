//! The `guardrails/logic_check` validator.

use async_trait::async_trait;
use guardrail_core::{
    DataType, Metadata, OnFail, RegistryError, ValidationResult, Validator, ValidatorFactory,
};
use serde_json::Value as JsonValue;
use std::sync::Arc;

use crate::config::{ConfigError, LogicCheckConfig};
use crate::prompts::{call_error, fallacy_prompt};
use crate::providers::{
    ChatMessage, CompletionConfig, LlmProvider, ProviderError, ProviderRegistry,
};
use crate::verdict::{interpret, SentinelMatch};

/// Registered name of the validator.
pub const LOGIC_CHECK_NAME: &str = "guardrails/logic_check";

/// Detects logical fallacies in text by asking a chat model.
///
/// # Contract
/// - Exactly one provider call per `validate`
/// - Every path ends in `Pass` or `Fail`; provider errors become `Fail`
/// - No state is kept between calls
pub struct LogicCheck {
    provider: Arc<dyn LlmProvider>,
    completion: CompletionConfig,
    sentinel_match: SentinelMatch,
    on_fail: OnFail,
}

impl LogicCheck {
    /// Create a validator over an existing provider.
    pub fn new(provider: Arc<dyn LlmProvider>, config: LogicCheckConfig, on_fail: OnFail) -> Self {
        Self {
            provider,
            completion: config.completion(),
            sentinel_match: config.sentinel_match,
            on_fail,
        }
    }

    /// Create a validator, building the provider named in `config`.
    ///
    /// `provider_args` carries provider keys such as `api_key` and `base_url`.
    pub fn from_config(
        config: LogicCheckConfig,
        provider_args: &JsonValue,
        on_fail: OnFail,
    ) -> Result<Self, ProviderError> {
        let provider = ProviderRegistry::with_defaults().create(&config.provider, provider_args)?;
        Ok(Self::new(provider, config, on_fail))
    }

    /// Model the validator asks.
    pub fn model(&self) -> &str {
        &self.completion.model
    }

    async fn check(&self, value: &str) -> Result<ValidationResult, ProviderError> {
        let messages = vec![ChatMessage::system(fallacy_prompt(value))];

        tracing::debug!(
            validator = LOGIC_CHECK_NAME,
            provider = self.provider.name(),
            model = %self.completion.model,
            "Requesting fallacy check"
        );
        let response = self.provider.complete(messages, &self.completion).await?;
        tracing::debug!(
            validator = LOGIC_CHECK_NAME,
            model = %response.model,
            tokens = response.usage.total(),
            "Fallacy check answered"
        );

        Ok(interpret(value, &response.content, self.sentinel_match))
    }
}

impl std::fmt::Debug for LogicCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogicCheck")
            .field("provider", &self.provider.name())
            .field("completion", &self.completion)
            .field("sentinel_match", &self.sentinel_match)
            .field("on_fail", &self.on_fail)
            .finish()
    }
}

#[async_trait]
impl Validator for LogicCheck {
    fn name(&self) -> &str {
        LOGIC_CHECK_NAME
    }

    fn data_type(&self) -> DataType {
        DataType::String
    }

    fn on_fail(&self) -> &OnFail {
        &self.on_fail
    }

    async fn validate(&self, value: &str, _metadata: &Metadata) -> ValidationResult {
        match self.check(value).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(
                    validator = LOGIC_CHECK_NAME,
                    model = %self.completion.model,
                    error = %e,
                    "Fallacy check failed"
                );
                ValidationResult::fail(call_error(&e))
            }
        }
    }
}

/// Builds [`LogicCheck`] validators from guard arguments.
pub struct LogicCheckFactory {
    providers: Arc<ProviderRegistry>,
}

impl LogicCheckFactory {
    /// Factory using the built-in providers.
    pub fn new() -> Self {
        Self::with_providers(ProviderRegistry::with_defaults())
    }

    /// Factory using a custom provider registry.
    pub fn with_providers(providers: ProviderRegistry) -> Self {
        Self {
            providers: Arc::new(providers),
        }
    }

    fn invalid(message: impl std::fmt::Display) -> RegistryError {
        RegistryError::InvalidArguments {
            validator: LOGIC_CHECK_NAME.to_string(),
            message: message.to_string(),
        }
    }
}

impl Default for LogicCheckFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidatorFactory for LogicCheckFactory {
    fn name(&self) -> &'static str {
        LOGIC_CHECK_NAME
    }

    fn data_type(&self) -> DataType {
        DataType::String
    }

    fn create(
        &self,
        args: &JsonValue,
        on_fail: OnFail,
    ) -> Result<Arc<dyn Validator>, RegistryError> {
        let config = LogicCheckConfig::from_args(args).map_err(|e: ConfigError| Self::invalid(e))?;
        let provider = self
            .providers
            .create(&config.provider, args)
            .map_err(|e| RegistryError::Construction {
                validator: LOGIC_CHECK_NAME.to_string(),
                message: e.to_string(),
            })?;

        Ok(Arc::new(LogicCheck::new(provider, config, on_fail)))
    }

    fn description(&self) -> &'static str {
        "Detects logical fallacies in text and suggests a corrected version"
    }
}
