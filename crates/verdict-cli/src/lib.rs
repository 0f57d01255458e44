//! Verdict CLI -- command-line interface for the Verdict quality-gate
//! evaluator.
//!
//! This crate provides the entry point, argument parsing, exit code
//! definitions, and the orchestration that ties together configuration,
//! report loading, policy resolution, gate evaluation, and reporting.

use std::fmt;

pub mod commands;

// ---------------------------------------------------------------------------
// Exit codes
// ---------------------------------------------------------------------------

/// Verdict process exit codes.
///
/// CI pipelines and shell scripts distinguish termination reasons by code
/// without parsing output.
///
/// | Code | Meaning                                          |
/// |------|--------------------------------------------------|
/// | 0    | Evaluation passed, or a failure was overridden   |
/// | 1    | Evaluation completed, one or more gates failed   |
/// | 2    | Engine error (report writing, internal failure)  |
/// | 3    | Configuration or policy error                    |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ExitCode {
    /// Evaluation passed, or the override absorbed a failure.
    Pass = 0,
    /// Evaluation completed and a gate failed.
    GateFail = 1,
    /// Engine error (report writing, internal failure).
    EngineError = 2,
    /// Configuration or policy error; no gate ran.
    ConfigError = 3,
}

impl ExitCode {
    /// Returns the numeric exit code as a `u8`.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Returns all exit code variants.
    #[must_use]
    pub const fn all() -> &'static [ExitCode] {
        &[Self::Pass, Self::GateFail, Self::EngineError, Self::ConfigError]
    }

    /// Returns a human-readable description of this exit code.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Pass => "evaluation passed, or a failure was overridden",
            Self::GateFail => "evaluation completed, one or more gates failed",
            Self::EngineError => "engine error (report writing, internal failure)",
            Self::ConfigError => "configuration or policy error",
        }
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "exit code {} ({})", self.as_u8(), self.description())
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code.as_u8())
    }
}

/// Terminate the process with the given [`ExitCode`].
///
/// Logs the exit reason (info for [`ExitCode::Pass`], error for everything
/// else) and returns the corresponding [`std::process::ExitCode`] suitable
/// as a `main` return value.
pub fn terminate(code: ExitCode) -> std::process::ExitCode {
    match code {
        ExitCode::Pass => {
            tracing::info!(%code, "verdict exiting");
        }
        _ => {
            tracing::error!(%code, "verdict exiting with error");
        }
    }
    code.into()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
