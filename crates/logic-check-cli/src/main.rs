//! `logic-check`: run the logical fallacy validator from the command line.

mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use guardrail_core::{
    create_validator, registered_validators, with_global_registry, Guard, GuardError, Metadata,
    OnFailAction,
};
use logic_check::LOGIC_CHECK_NAME;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "logic-check", version, about = "Detect logical fallacies in text")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check one text with guardrails/logic_check
    Check {
        /// Text to check, or "-" to read stdin
        text: String,

        /// Model to ask
        #[arg(long, default_value = "gpt-4o")]
        model: String,

        /// Policy when the check fails
        #[arg(long, default_value = "noop")]
        on_fail: OnFailAction,

        /// Accept variations of the "No fallacies found." reply
        #[arg(long)]
        lenient: bool,

        /// Request timeout (e.g. "30s", "2m")
        #[arg(long)]
        timeout: Option<String>,

        /// OpenAI-compatible API base URL
        #[arg(long)]
        base_url: Option<String>,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run a guard described by a YAML file
    Guard {
        /// Guard configuration file
        #[arg(short, long)]
        config: PathBuf,

        /// Text to validate, or "-" to read stdin
        text: String,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// List registered validators
    Validators {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Exit status when every validator passed.
const EXIT_PASSED: u8 = 0;

/// Exit status when validation did not pass.
const EXIT_FAILED: u8 = 1;

/// `text` itself, or everything on `input` when `text` is "-".
fn read_text(text: String, mut input: impl Read) -> Result<String> {
    if text != "-" {
        return Ok(text);
    }
    let mut buffer = String::new();
    input
        .read_to_string(&mut buffer)
        .context("Failed to read text from stdin")?;
    Ok(buffer)
}

/// Validator arguments for the `check` subcommand.
fn check_args(
    model: &str,
    lenient: bool,
    timeout: Option<String>,
    base_url: Option<String>,
) -> serde_json::Value {
    let sentinel_match = if lenient { "lenient" } else { "exact" };
    let mut args = serde_json::json!({
        "model": model,
        "sentinel_match": sentinel_match,
    });
    if let Some(timeout) = timeout {
        args["timeout"] = serde_json::Value::String(timeout);
    }
    if let Some(base_url) = base_url {
        args["base_url"] = serde_json::Value::String(base_url);
    }
    args
}

/// Run `guard` over `text`, print the result, and return the exit status.
async fn run_guard(guard: &Guard, text: &str, json: bool) -> Result<u8> {
    match guard.validate(text, &Metadata::new()).await {
        Ok(outcome) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                print!("{}", output::render_outcome(&outcome));
            }
            Ok(if outcome.validation_passed {
                EXIT_PASSED
            } else {
                EXIT_FAILED
            })
        }
        Err(GuardError::ValidationFailed { validator, message }) => {
            if json {
                let body = serde_json::json!({
                    "guard": guard.name(),
                    "validation_passed": false,
                    "validator": validator,
                    "error_message": message,
                });
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                println!("FAIL ({})\n  {}: {}", guard.name(), validator, message);
            }
            Ok(EXIT_FAILED)
        }
        Err(e) => Err(e.into()),
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    logic_check::register();

    match cli.command {
        Command::Check {
            text,
            model,
            on_fail,
            lenient,
            timeout,
            base_url,
            json,
        } => {
            let text = read_text(text, std::io::stdin())?;
            let args = check_args(&model, lenient, timeout, base_url);

            let validator = create_validator(LOGIC_CHECK_NAME, &args, on_fail.into())
                .context("Failed to create logic check validator")?;
            let guard = Guard::new("logic-check").with_validator(validator)?;

            tracing::info!(model = %model, on_fail = %on_fail, "Checking text");
            Ok(ExitCode::from(run_guard(&guard, &text, json).await?))
        }
        Command::Guard { config, text, json } => {
            let text = read_text(text, std::io::stdin())?;
            let guard = with_global_registry(|registry| Guard::from_yaml_file(&config, registry))
                .with_context(|| format!("Failed to load guard from {}", config.display()))?;

            Ok(ExitCode::from(run_guard(&guard, &text, json).await?))
        }
        Command::Validators { json } => {
            let validators = registered_validators();
            if json {
                println!("{}", serde_json::to_string_pretty(&validators)?);
            } else {
                print!("{}", output::render_validators(&validators));
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use guardrail_core::{OnFail, ValidationResult, Validator};
    use std::sync::Arc;

    /// Fails any text containing "flat".
    struct FlatEarth {
        on_fail: OnFail,
    }

    #[async_trait]
    impl Validator for FlatEarth {
        fn name(&self) -> &str {
            "test/flat_earth"
        }

        fn on_fail(&self) -> &OnFail {
            &self.on_fail
        }

        async fn validate(&self, value: &str, _metadata: &Metadata) -> ValidationResult {
            if value.contains("flat") {
                ValidationResult::fail_with_fix("The earth is flat", "The earth is round.")
            } else {
                ValidationResult::Pass
            }
        }
    }

    fn guard(on_fail: OnFailAction) -> Guard {
        Guard::new("cli")
            .with_validator(Arc::new(FlatEarth {
                on_fail: on_fail.into(),
            }))
            .unwrap()
    }

    #[tokio::test]
    async fn test_exit_status_pass() {
        let status = run_guard(&guard(OnFailAction::Noop), "The earth is round.", false)
            .await
            .unwrap();
        assert_eq!(status, EXIT_PASSED);
    }

    #[tokio::test]
    async fn test_exit_status_fail() {
        for on_fail in [OnFailAction::Noop, OnFailAction::Fix, OnFailAction::Filter] {
            let status = run_guard(&guard(on_fail), "The earth is flat.", true)
                .await
                .unwrap();
            assert_eq!(status, 1, "on_fail {on_fail}");
        }
    }

    #[tokio::test]
    async fn test_exit_status_exception() {
        for json in [false, true] {
            let status = run_guard(&guard(OnFailAction::Exception), "The earth is flat.", json)
                .await
                .unwrap();
            assert_eq!(status, EXIT_FAILED);
        }
    }

    #[test]
    fn test_read_text_argument() {
        let text = read_text("Water is wet.".to_string(), &b"ignored"[..]).unwrap();
        assert_eq!(text, "Water is wet.");
    }

    #[test]
    fn test_read_text_stdin() {
        let text = read_text("-".to_string(), &b"from stdin\n"[..]).unwrap();
        assert_eq!(text, "from stdin\n");
    }

    #[test]
    fn test_check_args_defaults() {
        let args = check_args("gpt-4o", false, None, None);
        assert_eq!(
            args,
            serde_json::json!({"model": "gpt-4o", "sentinel_match": "exact"})
        );
    }

    #[test]
    fn test_check_args_options() {
        let args = check_args(
            "gpt-4o-mini",
            true,
            Some("30s".to_string()),
            Some("http://localhost:8080/v1".to_string()),
        );
        assert_eq!(args["model"], "gpt-4o-mini");
        assert_eq!(args["sentinel_match"], "lenient");
        assert_eq!(args["timeout"], "30s");
        assert_eq!(args["base_url"], "http://localhost:8080/v1");

        let config = logic_check::LogicCheckConfig::from_args(&args).unwrap();
        assert_eq!(config.sentinel_match, logic_check::SentinelMatch::Lenient);
        assert_eq!(config.timeout, std::time::Duration::from_secs(30));
    }
}
