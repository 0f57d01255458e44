use clap::{Parser, Subcommand};

use verdict_cli::commands;

/// Verdict -- CI quality-gate evaluator.
#[derive(Parser)]
#[command(name = "verdict", about = "Verdict -- CI quality-gate evaluator")]
#[command(version)]
struct Cli {
    /// Enable trace-level logging.
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Log errors only.
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Emit JSON-formatted log lines.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate all quality gates against the loaded reports.
    Evaluate(commands::evaluate::EvaluateArgs),
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    if let Err(err) = verdict_core::init_tracing(cli.verbose, cli.quiet, cli.json_logs) {
        eprintln!("verdict: failed to initialize logging: {err}");
        return verdict_cli::terminate(verdict_cli::ExitCode::EngineError);
    }

    let result = match cli.command {
        Commands::Evaluate(args) => commands::evaluate::execute(args),
    };

    match result {
        Ok(code) => verdict_cli::terminate(code),
        Err(err) => {
            eprintln!("verdict: error: {err:#}");
            verdict_cli::terminate(verdict_cli::ExitCode::EngineError)
        }
    }
}
