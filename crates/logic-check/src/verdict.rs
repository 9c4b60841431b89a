//! Interpreting the model's reply as Pass or Fail.
//!
//! The model is asked to reply with [`SENTINEL`] when the text is sound and
//! with the corrected text otherwise. Anything that is not the sentinel is
//! treated as a correction.

use guardrail_core::ValidationResult;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::prompts::{fix_value, FALLACY_ERROR_MESSAGE, SENTINEL};

lazy_static! {
    /// "No fallacies found." give or take case, quotes, the word "logical",
    /// and trailing punctuation.
    static ref LENIENT_SENTINEL: Regex = Regex::new(
        r#"(?i)^["'`*\s]*no\s+(?:logical\s+)?fallac(?:y|ies)\s+(?:were\s+|was\s+)?(?:found|detected)[.!\s"'`*]*$"#
    ).unwrap();
}

/// How strictly the reply must match the sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SentinelMatch {
    /// Trimmed reply must equal the sentinel byte for byte
    #[default]
    Exact,

    /// Case-insensitive, tolerant of quoting and punctuation
    Lenient,
}

impl SentinelMatch {
    /// Whether `reply` signals a logically sound text.
    pub fn is_sound(&self, reply: &str) -> bool {
        let reply = reply.trim();
        match self {
            SentinelMatch::Exact => reply == SENTINEL,
            SentinelMatch::Lenient => LENIENT_SENTINEL.is_match(reply),
        }
    }
}

/// Turn the model's reply into a validation result.
pub fn interpret(value: &str, reply: &str, mode: SentinelMatch) -> ValidationResult {
    if mode.is_sound(reply) {
        ValidationResult::Pass
    } else {
        ValidationResult::fail_with_fix(FALLACY_ERROR_MESSAGE, fix_value(value, reply.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_exact_sentinel_passes() {
        assert!(interpret("Water is wet.", "No fallacies found.", SentinelMatch::Exact).is_pass());
        assert!(
            interpret("Water is wet.", "\n  No fallacies found.\t", SentinelMatch::Exact).is_pass()
        );
    }

    #[test]
    fn test_exact_rejects_variants() {
        for reply in [
            "no fallacies found.",
            "No fallacies found",
            "\"No fallacies found.\"",
            "No fallacies found. The text is sound.",
        ] {
            assert!(
                interpret("x", reply, SentinelMatch::Exact).is_fail(),
                "exact mode accepted {reply:?}"
            );
        }
    }

    #[test]
    fn test_lenient_accepts_variants() {
        for reply in [
            "No fallacies found.",
            "no fallacies found",
            "\"No fallacies found.\"",
            "No logical fallacies found!",
            "**No fallacies were found.**",
            "No fallacy detected.",
        ] {
            assert!(
                interpret("x", reply, SentinelMatch::Lenient).is_pass(),
                "lenient mode rejected {reply:?}"
            );
        }
    }

    #[test]
    fn test_lenient_rejects_corrections() {
        assert!(interpret(
            "x",
            "No fallacies found. However, the claim is unsupported.",
            SentinelMatch::Lenient
        )
        .is_fail());
        assert!(interpret("x", "The sky is blue.", SentinelMatch::Lenient).is_fail());
    }

    #[test]
    fn test_fail_carries_fix_value() {
        let result = interpret(
            "The sky is blue because my grandmother said it is.",
            "  The sky is blue.  ",
            SentinelMatch::Exact,
        );
        assert_eq!(result.error_message(), Some(FALLACY_ERROR_MESSAGE));
        assert_eq!(
            result.fix_value(),
            Some("Original: The sky is blue because my grandmother said it is.\nCorrected: The sky is blue.")
        );
    }

    #[test]
    fn test_mode_deserializes() {
        let mode: SentinelMatch = serde_json::from_str("\"lenient\"").unwrap();
        assert_eq!(mode, SentinelMatch::Lenient);
        assert_eq!(SentinelMatch::default(), SentinelMatch::Exact);
    }

    proptest! {
        #[test]
        fn prop_non_sentinel_reply_fails_with_labeled_fix(
            value in ".{0,80}",
            reply in "[A-Za-z ,.]{1,80}",
        ) {
            prop_assume!(reply.trim() != SENTINEL);
            let result = interpret(&value, &reply, SentinelMatch::Exact);
            prop_assert_eq!(result.error_message(), Some(FALLACY_ERROR_MESSAGE));
            let expected = format!("Original: {}\nCorrected: {}", value, reply.trim());
            prop_assert_eq!(result.fix_value(), Some(expected.as_str()));
        }

        #[test]
        fn prop_padded_sentinel_passes(pad_left in "[ \t\n]{0,5}", pad_right in "[ \t\n]{0,5}") {
            let reply = format!("{pad_left}{SENTINEL}{pad_right}");
            prop_assert!(interpret("anything", &reply, SentinelMatch::Exact).is_pass());
            prop_assert!(interpret("anything", &reply, SentinelMatch::Lenient).is_pass());
        }

        #[test]
        fn prop_result_is_exactly_one_kind(reply in ".{0,60}") {
            let result = interpret("v", &reply, SentinelMatch::Exact);
            // Pass never carries failure attributes
            prop_assert_eq!(result.is_pass(), result.error_message().is_none());
            prop_assert_eq!(result.is_pass(), result.fix_value().is_none());
        }
    }
}
