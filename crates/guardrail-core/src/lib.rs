//! # guardrail-core
//!
//! The host side of output validation: the contract validators implement,
//! the policies applied when they fail, and the registry they are built from.
//!
//! ## Key Guarantees
//!
//! 1. **One outcome**: every validation yields exactly `Pass` or `Fail`
//! 2. **Explicit registration**: validators are added to a registry at start-up,
//!    looked up by name (e.g. `guardrails/logic_check`)
//! 3. **Host-owned policy**: validators report failures; the [`Guard`] decides
//!    whether to fix, filter, refrain, reask, raise, or do nothing
//!
//! ## Example
//!
//! ```rust,ignore
//! use guardrail_core::{Guard, Metadata, OnFailAction};
//!
//! let guard = Guard::new("fallacy-guard").with_validator(validator)?;
//! let outcome = guard.validate("The earth is flat.", &Metadata::new()).await?;
//!
//! match outcome.validated_output {
//!     Some(text) => println!("OK: {}", text),
//!     None => println!("Output withheld"),
//! }
//! ```

pub mod guard;
pub mod on_fail;
pub mod registry;
pub mod result;
pub mod validator;

// Re-export main types at crate root
pub use guard::{
    Guard, GuardConfig, GuardError, GuardOutcome, ReaskRequest, ValidatorSpec, ValidatorSummary,
};
pub use on_fail::{OnFail, OnFailAction, OnFailCallback, ParseOnFailError, Resolution};
pub use registry::{
    create_validator, register_validator, registered_validators, with_global_registry,
    RegisteredValidator, RegistryError, ValidatorFactory, ValidatorRegistry,
};
pub use result::{FailResult, ValidationResult};
pub use validator::{DataType, Metadata, Validator};
