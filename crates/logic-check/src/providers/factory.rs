//! Provider lookup by name.
//!
//! The validator's `provider` argument (default `"openai"`) picks a factory;
//! the whole argument object is handed to it, so provider keys such as
//! `api_key` sit next to `model` in the guard configuration.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value as JsonValue;

use super::{LlmProvider, ProviderError};

/// Builds an [`LlmProvider`] from validator arguments.
pub trait ProviderFactory: Send + Sync {
    /// Name used in the `provider` argument.
    fn provider_type(&self) -> &'static str;

    /// Check `args` and build the provider.
    fn create(&self, args: &JsonValue) -> Result<Arc<dyn LlmProvider>, ProviderError>;

    /// Check `args` without building anything.
    fn validate_config(&self, args: &JsonValue) -> Result<(), ProviderError>;
}

/// Provider factories keyed by [`ProviderFactory::provider_type`].
#[derive(Default)]
pub struct ProviderRegistry {
    factories: BTreeMap<&'static str, Arc<dyn ProviderFactory>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in providers: `openai` when the `openai` feature is on.
    pub fn with_defaults() -> Self {
        #[allow(unused_mut)]
        let mut registry = Self::new();
        #[cfg(feature = "openai")]
        registry.register(Arc::new(super::OpenAiProviderFactory));
        registry
    }

    /// Add a factory. A later factory with the same name wins.
    pub fn register(&mut self, factory: Arc<dyn ProviderFactory>) {
        self.factories.insert(factory.provider_type(), factory);
    }

    /// Build the provider called `provider_type`.
    pub fn create(
        &self,
        provider_type: &str,
        args: &JsonValue,
    ) -> Result<Arc<dyn LlmProvider>, ProviderError> {
        let factory = self.factories.get(provider_type).ok_or_else(|| {
            ProviderError::NotConfigured(format!(
                "Unknown provider type: '{}'. Available: {:?}",
                provider_type,
                self.available_types()
            ))
        })?;
        factory.create(args)
    }

    pub fn available_types(&self) -> Vec<&'static str> {
        self.factories.keys().copied().collect()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.available_types())
            .finish()
    }
}
