//! Validator registration by name.
//!
//! Validators are registered explicitly at process start. Each registration
//! maps a name such as `guardrails/logic_check` to a factory that builds the
//! validator from JSON arguments and an on-fail policy.
//!
//! ## Usage
//!
//! ```ignore
//! guardrail_core::register_validator(Arc::new(LogicCheckFactory::default()));
//!
//! let validator = guardrail_core::create_validator(
//!     "guardrails/logic_check",
//!     &serde_json::json!({"model": "gpt-4o"}),
//!     OnFail::from(OnFailAction::Exception),
//! )?;
//! ```

use lazy_static::lazy_static;
use parking_lot::RwLock;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

use crate::on_fail::OnFail;
use crate::validator::{DataType, Validator};

/// Errors from validator lookup and construction.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Unknown validator: '{name}'. Registered: {registered:?}")]
    UnknownValidator {
        name: String,
        registered: Vec<String>,
    },

    #[error("Invalid arguments for {validator}: {message}")]
    InvalidArguments { validator: String, message: String },

    #[error("Failed to construct {validator}: {message}")]
    Construction { validator: String, message: String },
}

/// Builds validator instances from configuration.
pub trait ValidatorFactory: Send + Sync {
    /// Registered name of the validator.
    fn name(&self) -> &'static str;

    /// Data type the validator accepts.
    fn data_type(&self) -> DataType;

    /// Create a validator from JSON arguments.
    fn create(
        &self,
        args: &JsonValue,
        on_fail: OnFail,
    ) -> Result<Arc<dyn Validator>, RegistryError>;

    /// Human-readable description of the validator.
    fn description(&self) -> &'static str {
        "Validator"
    }
}

/// Summary of a registered validator.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct RegisteredValidator {
    pub name: String,
    pub data_type: DataType,
    pub description: String,
}

/// Name-to-factory table.
#[derive(Default)]
pub struct ValidatorRegistry {
    factories: BTreeMap<String, Arc<dyn ValidatorFactory>>,
}

impl ValidatorRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory, replacing any existing one with the same name.
    pub fn register(&mut self, factory: Arc<dyn ValidatorFactory>) {
        let name = factory.name().to_string();
        if self.factories.insert(name.clone(), factory).is_some() {
            tracing::debug!(validator = %name, "Replaced existing validator registration");
        } else {
            tracing::debug!(validator = %name, "Registered validator");
        }
    }

    /// Build a validator by name.
    pub fn create(
        &self,
        name: &str,
        args: &JsonValue,
        on_fail: OnFail,
    ) -> Result<Arc<dyn Validator>, RegistryError> {
        self.factories
            .get(name)
            .ok_or_else(|| RegistryError::UnknownValidator {
                name: name.to_string(),
                registered: self.names(),
            })?
            .create(args, on_fail)
    }

    /// Check if a validator name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.factories.keys().cloned().collect()
    }

    /// Get the factory for a validator name.
    pub fn get_factory(&self, name: &str) -> Option<&Arc<dyn ValidatorFactory>> {
        self.factories.get(name)
    }

    /// Describe every registered validator.
    pub fn list(&self) -> Vec<RegisteredValidator> {
        self.factories
            .values()
            .map(|f| RegisteredValidator {
                name: f.name().to_string(),
                data_type: f.data_type(),
                description: f.description().to_string(),
            })
            .collect()
    }
}

impl std::fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatorRegistry")
            .field("validators", &self.names())
            .finish()
    }
}

lazy_static! {
    static ref GLOBAL_REGISTRY: RwLock<ValidatorRegistry> = RwLock::new(ValidatorRegistry::new());
}

/// Register a factory in the process-wide registry.
pub fn register_validator(factory: Arc<dyn ValidatorFactory>) {
    GLOBAL_REGISTRY.write().register(factory);
}

/// Build a validator from the process-wide registry.
pub fn create_validator(
    name: &str,
    args: &JsonValue,
    on_fail: OnFail,
) -> Result<Arc<dyn Validator>, RegistryError> {
    GLOBAL_REGISTRY.read().create(name, args, on_fail)
}

/// Describe every validator in the process-wide registry.
pub fn registered_validators() -> Vec<RegisteredValidator> {
    GLOBAL_REGISTRY.read().list()
}

/// Run `f` with shared access to the process-wide registry.
pub fn with_global_registry<R>(f: impl FnOnce(&ValidatorRegistry) -> R) -> R {
    f(&GLOBAL_REGISTRY.read())
}
