//! Prompt and message text for the logic check.

/// Reply the model gives when the text is logically sound.
pub const SENTINEL: &str = "No fallacies found.";

/// Error message reported when the model returns a correction.
pub const FALLACY_ERROR_MESSAGE: &str = "Potential logical fallacies detected in the model output";

/// Prefix of the error message reported when the remote call fails.
pub const CALL_ERROR_PREFIX: &str = "Error during validation";

/// Build the single system instruction sent to the model.
pub fn fallacy_prompt(value: &str) -> String {
    format!(
        "Detect any logical fallacies in the following text:\n\n\
         Original: {value}\n\n\
         Return '{SENTINEL}' if the text is logically sound. \
         If any logical fallacies are found, return only the corrected text."
    )
}

/// Fix value pairing the original text with the model's correction.
pub fn fix_value(original: &str, corrected: &str) -> String {
    format!("Original: {original}\nCorrected: {corrected}")
}

/// Error message for a failed remote call.
pub fn call_error(error: &dyn std::fmt::Display) -> String {
    format!("{CALL_ERROR_PREFIX}: {error}")
}
