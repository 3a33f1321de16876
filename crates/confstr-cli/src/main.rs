use std::fs;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use confstr_check::validate;
use thiserror::Error;

#[derive(Debug, Error)]
enum CliError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error("logging error: {0}")]
    Logging(String),
}

#[derive(Parser, Debug)]
#[command(name = "confstr", version, about = "Config string validation CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Validate(ValidateArgs),
}

#[derive(Args, Debug)]
struct ValidateArgs {
    /// Check string (inline form).
    #[arg(long, value_name = "CHECKS", conflicts_with = "checks_file")]
    checks: Option<String>,
    /// Path to a file holding the check string.
    #[arg(long, value_name = "PATH", required_unless_present = "checks")]
    checks_file: Option<PathBuf>,
    /// Config string (inline form).
    #[arg(long, value_name = "CONFIG", conflicts_with = "config_file")]
    config: Option<String>,
    /// Path to a file holding the config string.
    #[arg(long, value_name = "PATH")]
    config_file: Option<PathBuf>,
    /// Emit the result as JSON on stdout.
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> Result<(), CliError> {
    init_logging()?;
    let cli = Cli::parse();

    match cli.command {
        Command::Validate(args) => run_validate(args),
    }
}

fn run_validate(args: ValidateArgs) -> Result<(), CliError> {
    let checks = source(args.checks, args.checks_file, "checks")?.ok_or_else(|| {
        CliError::InvalidArgs("--checks or --checks-file is required".to_string())
    })?;
    // An absent config is the vacuous-success case.
    let config = source(args.config, args.config_file, "config")?.unwrap_or_default();

    tracing::info!(
        event = "validate_started",
        checks_len = checks.len(),
        config_len = config.len()
    );

    match validate(&checks, &config) {
        Ok(()) => {
            tracing::info!(event = "validate_finished", status = "success");
            if args.json {
                println!("{}", serde_json::json!({ "ok": true }));
            }
            Ok(())
        }
        Err(err) => {
            let issue = err.to_issue();
            tracing::info!(event = "validate_failed", code = issue.code);
            if args.json {
                println!("{}", serde_json::to_string(&issue)?);
            } else {
                eprintln!("{err}");
            }
            std::process::exit(1);
        }
    }
}

/// Resolve an inline-or-file argument pair to its contents.
fn source(
    inline: Option<String>,
    file: Option<PathBuf>,
    flag: &str,
) -> Result<Option<String>, CliError> {
    match (inline, file) {
        (Some(value), None) => Ok(Some(value)),
        (None, Some(path)) => Ok(Some(fs::read_to_string(path)?.trim_end().to_string())),
        (Some(_), Some(_)) => Err(CliError::InvalidArgs(format!(
            "use either --{flag} or --{flag}-file"
        ))),
        (None, None) => Ok(None),
    }
}

fn init_logging() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| CliError::Logging(err.to_string()))
}
