//! The `evaluate` subcommand: run every gate and render the verdict.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Args;
use tracing::error;

use verdict_adapters::ReportSet;
use verdict_core::EvalConfig;
use verdict_engine::evaluate;
use verdict_policy::resolve_policy;
use verdict_report::{annotation_lines, console_summary, write_json};

use crate::ExitCode;

/// Arguments for `verdict evaluate`.
#[derive(Debug, Args)]
pub struct EvaluateArgs {
    /// Where to write the JSON report.
    #[arg(long, default_value = "reports/quality-gate-report.json")]
    pub output: PathBuf,

    /// Threshold-override document; takes precedence over the
    /// THRESHOLDS_CONFIG environment variable.
    #[arg(long)]
    pub policy: Option<PathBuf>,

    /// Stamp the report with the current RFC 3339 timestamp. Off by
    /// default so identical inputs produce byte-identical reports.
    #[arg(long)]
    pub timestamp: bool,

    /// Print one flat annotation line per violation after the summary.
    #[arg(long)]
    pub annotations: bool,
}

/// Executes the evaluation and maps the outcome to an exit code.
///
/// Configuration and policy errors are fatal before any gate runs and map
/// to [`ExitCode::ConfigError`]; report input problems never are, they were
/// downgraded to gate diagnostics during loading.
///
/// # Errors
///
/// Returns an error only for engine-level failures (report writing); the
/// caller maps those to [`ExitCode::EngineError`].
pub fn execute(args: EvaluateArgs) -> Result<ExitCode> {
    let config = match EvalConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("invalid configuration: {err}");
            return Ok(ExitCode::ConfigError);
        }
    };

    let policy_path = args.policy.clone().or_else(|| config.policy_path.clone());
    let policy = match resolve_policy(policy_path.as_deref()) {
        Ok(policy) => policy,
        Err(err) => {
            error!("policy error: {err}");
            return Ok(ExitCode::ConfigError);
        }
    };

    let reports = ReportSet::load(&config);
    let mut result = evaluate(&config, &policy, &reports);
    if args.timestamp {
        result = result.with_timestamp(chrono::Utc::now().to_rfc3339());
    }

    write_json(&args.output, &result)
        .with_context(|| format!("failed to write report to {}", args.output.display()))?;

    print!("{}", console_summary(&result));
    if args.annotations {
        for line in annotation_lines(&result) {
            println!("{line}");
        }
    }

    Ok(if result.exit_success() {
        ExitCode::Pass
    } else {
        ExitCode::GateFail
    })
}
