//! # logic-check
//!
//! The `guardrails/logic_check` validator: asks a chat model whether a text
//! contains logical fallacies and reports `Pass` or `Fail`.
//!
//! The model is told to answer `No fallacies found.` for sound text and to
//! return a corrected version otherwise. A correction becomes a `Fail`
//! whose fix value pairs the original and the corrected text. A failed
//! remote call also becomes a `Fail`; it never escapes as an error.
//!
//! ## Example
//!
//! ```rust,ignore
//! use guardrail_core::{Metadata, OnFailAction, Validator};
//! use logic_check::{LogicCheck, LogicCheckConfig};
//!
//! let check = LogicCheck::from_config(
//!     LogicCheckConfig::new("gpt-4o"),
//!     &serde_json::json!({}),   // api_key from OPENAI_API_KEY
//!     OnFailAction::Exception.into(),
//! )?;
//!
//! let result = check.validate("The earth is flat.", &Metadata::new()).await;
//! ```
//!
//! ## Registration
//!
//! Call [`register`] once at start-up to make the validator available by
//! name through the process-wide registry.

pub mod config;
pub mod prompts;
pub mod providers;
pub mod validator;
pub mod verdict;

pub use config::{ConfigError, LogicCheckConfig};
pub use prompts::{FALLACY_ERROR_MESSAGE, SENTINEL};
pub use providers::{ChatMessage, CompletionConfig, LlmProvider, ProviderError, ProviderRegistry};
pub use validator::{LogicCheck, LogicCheckFactory, LOGIC_CHECK_NAME};
pub use verdict::SentinelMatch;

use std::sync::Arc;

/// Register `guardrails/logic_check` in the process-wide validator registry.
pub fn register() {
    guardrail_core::register_validator(Arc::new(LogicCheckFactory::new()));
}

/// Register `guardrails/logic_check` in a specific registry.
pub fn register_into(registry: &mut guardrail_core::ValidatorRegistry) {
    registry.register(Arc::new(LogicCheckFactory::new()));
}
