//! Terminal rendering of guard outcomes.

use guardrail_core::{GuardOutcome, RegisteredValidator, ValidationResult};
use std::fmt::Write as _;

/// Human-readable report of a guard run.
pub fn render_outcome(outcome: &GuardOutcome) -> String {
    let mut out = String::new();

    let verdict = if outcome.validation_passed { "PASS" } else { "FAIL" };
    let _ = writeln!(out, "{} ({})", verdict, outcome.guard);

    for summary in &outcome.summaries {
        match &summary.result {
            ValidationResult::Pass => {
                let _ = writeln!(out, "  {}: pass", summary.validator);
            }
            ValidationResult::Fail(fail) => {
                let _ = writeln!(
                    out,
                    "  {}: {} [on_fail: {}]",
                    summary.validator,
                    fail.error_message,
                    summary.on_fail_applied.as_deref().unwrap_or("-")
                );
                if let Some(fix) = &fail.fix_value {
                    for line in fix.lines() {
                        let _ = writeln!(out, "    {}", line);
                    }
                }
            }
        }
    }

    for reask in &outcome.reasks {
        let _ = writeln!(
            out,
            "  reask requested by {}: {}",
            reask.validator, reask.fail.error_message
        );
    }

    match &outcome.validated_output {
        Some(text) => {
            let _ = writeln!(out, "\nValidated output:\n{}", text);
        }
        None => {
            let _ = writeln!(out, "\nOutput withheld");
        }
    }

    out
}

/// Table of registered validators.
pub fn render_validators(validators: &[RegisteredValidator]) -> String {
    let width = validators.iter().map(|v| v.name.len()).max().unwrap_or(0);
    validators
        .iter()
        .map(|v| {
            format!(
                "{:<width$}  {:<7}  {}\n",
                v.name,
                v.data_type.to_string(),
                v.description,
                width = width
            )
        })
        .collect()
}
