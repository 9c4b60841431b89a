//! On-fail policies.
//!
//! A validator carries the policy the guard applies when it reports `Fail`.
//! The policy is either one of the named [`OnFailAction`]s or a
//! user-supplied callback.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

use crate::result::FailResult;

/// Named on-fail behaviors understood by the guard.
///
/// Deserializes through [`FromStr`], so configuration files accept the same
/// spellings as the command line (`RAISE`, `fix-reask`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum OnFailAction {
    /// Ask the model to regenerate, passing the error back
    Reask,

    /// Replace the value with the validator's fix value
    Fix,

    /// Drop the failing value from the output
    Filter,

    /// Refuse to return any output at all
    Refrain,

    /// Record the failure and keep the value unchanged
    #[default]
    Noop,

    /// Abort the guard with an error
    Exception,

    /// Apply the fix, revalidate, and reask if it still fails
    FixReask,
}

impl OnFailAction {
    /// All named actions, in declaration order.
    pub const ALL: [OnFailAction; 7] = [
        OnFailAction::Reask,
        OnFailAction::Fix,
        OnFailAction::Filter,
        OnFailAction::Refrain,
        OnFailAction::Noop,
        OnFailAction::Exception,
        OnFailAction::FixReask,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OnFailAction::Reask => "reask",
            OnFailAction::Fix => "fix",
            OnFailAction::Filter => "filter",
            OnFailAction::Refrain => "refrain",
            OnFailAction::Noop => "noop",
            OnFailAction::Exception => "exception",
            OnFailAction::FixReask => "fix_reask",
        }
    }
}

impl fmt::Display for OnFailAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown on-fail action.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown on_fail action '{0}': expected one of reask, fix, filter, refrain, noop, exception, fix_reask")]
pub struct ParseOnFailError(pub String);

impl FromStr for OnFailAction {
    type Err = ParseOnFailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "reask" => Ok(OnFailAction::Reask),
            "fix" => Ok(OnFailAction::Fix),
            "filter" => Ok(OnFailAction::Filter),
            "refrain" => Ok(OnFailAction::Refrain),
            "noop" => Ok(OnFailAction::Noop),
            "exception" | "raise" => Ok(OnFailAction::Exception),
            "fix_reask" => Ok(OnFailAction::FixReask),
            _ => Err(ParseOnFailError(s.to_string())),
        }
    }
}

impl TryFrom<String> for OnFailAction {
    type Error = ParseOnFailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Callback invoked with the failing value and the failure.
///
/// Returning `Some` replaces the value; returning `None` filters it.
pub type OnFailCallback = dyn Fn(&str, &FailResult) -> Option<String> + Send + Sync;

/// The policy a guard applies when a validator fails.
#[derive(Clone)]
pub enum OnFail {
    /// A named policy
    Action(OnFailAction),

    /// A user-supplied callback
    Custom(Arc<OnFailCallback>),
}

impl OnFail {
    /// Wrap a closure as a custom policy.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&str, &FailResult) -> Option<String> + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// The named action, if this is not a custom callback.
    pub fn action(&self) -> Option<OnFailAction> {
        match self {
            OnFail::Action(action) => Some(*action),
            OnFail::Custom(_) => None,
        }
    }

    /// Decide what happens to `value` after it failed with `fail`.
    pub fn resolve(&self, value: &str, fail: &FailResult) -> Resolution {
        match self {
            OnFail::Custom(callback) => match callback(value, fail) {
                Some(replacement) => Resolution::Fixed(replacement),
                None => Resolution::Filtered,
            },
            OnFail::Action(action) => match action {
                OnFailAction::Noop => Resolution::Keep(value.to_string()),
                OnFailAction::Fix => Resolution::Fixed(
                    fail.fix_value.clone().unwrap_or_else(|| value.to_string()),
                ),
                OnFailAction::Filter => Resolution::Filtered,
                OnFailAction::Refrain => Resolution::Refrained,
                OnFailAction::Reask => Resolution::Reask {
                    value: value.to_string(),
                    fail: fail.clone(),
                },
                OnFailAction::Exception => Resolution::Raise(fail.error_message.clone()),
                OnFailAction::FixReask => match &fail.fix_value {
                    Some(fixed) => Resolution::Revalidate(fixed.clone()),
                    None => Resolution::Reask {
                        value: value.to_string(),
                        fail: fail.clone(),
                    },
                },
            },
        }
    }
}

impl Default for OnFail {
    fn default() -> Self {
        OnFail::Action(OnFailAction::default())
    }
}

impl From<OnFailAction> for OnFail {
    fn from(action: OnFailAction) -> Self {
        OnFail::Action(action)
    }
}

impl FromStr for OnFail {
    type Err = ParseOnFailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<OnFailAction>().map(OnFail::Action)
    }
}

impl fmt::Debug for OnFail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OnFail::Action(action) => f.debug_tuple("Action").field(action).finish(),
            OnFail::Custom(_) => f.debug_tuple("Custom").field(&"<callback>").finish(),
        }
    }
}

impl fmt::Display for OnFail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OnFail::Action(action) => write!(f, "{}", action),
            OnFail::Custom(_) => write!(f, "custom"),
        }
    }
}

/// What the guard should do with a failed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Keep the value as-is
    Keep(String),

    /// Continue with a replacement value
    Fixed(String),

    /// Drop the value
    Filtered,

    /// Return no output at all
    Refrained,

    /// Hand the failure back to the caller for regeneration
    Reask { value: String, fail: FailResult },

    /// Validate the fixed value once more before accepting it
    Revalidate(String),

    /// Abort with the given message
    Raise(String),
}
