//! Verdict Core -- shared types for the Verdict CI quality-gate evaluator.
//!
//! This crate defines the canonical data model that every report adapter
//! normalizes into and every gate evaluator consumes: severity buckets,
//! finding categories, tool identifiers, gate names, findings, metric
//! samples, and the per-evaluation configuration.

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod config;
pub mod finding;

pub use config::EvalConfig;
pub use finding::{Finding, MetricSample, MetricUnit};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Top-level error type for the verdict-core crate.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An I/O error occurred during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Tracing/logging initialization failed.
    #[error("tracing initialization error: {0}")]
    TracingInit(String),
}

/// Convenience alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

// ---------------------------------------------------------------------------
// Tracing / Logging
// ---------------------------------------------------------------------------

/// Installs the process-global tracing subscriber.
///
/// `verbose` selects TRACE, `quiet` selects ERROR, otherwise INFO.
/// `json_output` switches from compact human-readable lines to JSON log
/// lines for CI log collectors. A `RUST_LOG` value in the environment wins
/// over the flag-derived level, so per-module filters need no rebuild.
///
/// # Errors
///
/// Returns [`CoreError::TracingInit`] when a subscriber is already
/// installed; the subscriber can be set only once per process.
pub fn init_tracing(verbose: bool, quiet: bool, json_output: bool) -> Result<(), CoreError> {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose {
        "trace"
    } else if quiet {
        "error"
    } else {
        "info"
    };

    // Allow RUST_LOG to override the programmatic default.
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if json_output {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .try_init()
            .map_err(|e| CoreError::TracingInit(e.to_string()))
    } else {
        fmt()
            .compact()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .try_init()
            .map_err(|e| CoreError::TracingInit(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// Canonical severity buckets, ordered from highest to lowest impact.
///
/// Every tool-native severity vocabulary maps onto exactly one of these four
/// buckets. Native values an adapter does not recognize fail closed into
/// [`Severity::Critical`]; they are never silently dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocks the build outright under the default policy.
    Critical,
    /// Serious enough that only a small budgeted count is tolerated.
    High,
    /// Worth tracking; wider budget before the gate trips.
    Medium,
    /// Lowest bucket; large budget, still counted.
    Low,
}

impl Severity {
    /// Numeric rank of this bucket, `Critical` = 3 down to `Low` = 0.
    #[must_use]
    pub const fn numeric_score(self) -> u8 {
        match self {
            Self::Critical => 3,
            Self::High => 2,
            Self::Medium => 1,
            Self::Low => 0,
        }
    }

    /// Returns all severity buckets in descending order (Critical first).
    #[must_use]
    pub const fn all() -> &'static [Severity] {
        &[Self::Critical, Self::High, Self::Medium, Self::Low]
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        };
        f.write_str(label)
    }
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Finding category that groups findings by their detection domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Security vulnerabilities (dependency CVEs, SAST findings, etc.).
    Security,
    /// Code quality issues (bugs, code smells, complexity).
    Quality,
    /// Hard-coded secrets and credentials.
    Secret,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Security => "security",
            Self::Quality => "quality",
            Self::Secret => "secret",
        };
        f.write_str(label)
    }
}

// ---------------------------------------------------------------------------
// ToolId
// ---------------------------------------------------------------------------

/// Identifier for a known report source tool.
///
/// Each variant corresponds to exactly one report schema and one adapter.
/// Adapter selection is a tagged dispatch on this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolId {
    /// Snyk dependency vulnerability scan.
    Snyk,
    /// Trivy container image scan.
    Trivy,
    /// Anchore container image scan.
    Anchore,
    /// OWASP Dependency-Check scan (CVSS-scored).
    DependencyCheck,
    /// Semgrep static analysis.
    Semgrep,
    /// SonarQube code-quality analysis.
    Sonarqube,
    /// Gitleaks secret scan.
    Gitleaks,
    /// TruffleHog secret scan.
    Trufflehog,
    /// Istanbul-style coverage summary.
    Coverage,
    /// Mocha-style test-runner report.
    TestRunner,
    /// Load-test / performance report.
    Performance,
    /// Dependency freshness and license audit.
    DependencyAudit,
}

impl ToolId {
    /// Returns the kebab-case identifier used in configuration and reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Snyk => "snyk",
            Self::Trivy => "trivy",
            Self::Anchore => "anchore",
            Self::DependencyCheck => "dependency-check",
            Self::Semgrep => "semgrep",
            Self::Sonarqube => "sonarqube",
            Self::Gitleaks => "gitleaks",
            Self::Trufflehog => "trufflehog",
            Self::Coverage => "coverage",
            Self::TestRunner => "test-runner",
            Self::Performance => "performance",
            Self::DependencyAudit => "dependency-audit",
        }
    }

    /// Parses a kebab-case tool identifier.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|t| t.as_str() == name)
    }

    /// Returns all known tools in deterministic evaluation order.
    #[must_use]
    pub const fn all() -> &'static [ToolId] {
        &[
            Self::Snyk,
            Self::Trivy,
            Self::Anchore,
            Self::DependencyCheck,
            Self::Semgrep,
            Self::Sonarqube,
            Self::Gitleaks,
            Self::Trufflehog,
            Self::Coverage,
            Self::TestRunner,
            Self::Performance,
            Self::DependencyAudit,
        ]
    }
}

impl fmt::Display for ToolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// GateName
// ---------------------------------------------------------------------------

/// One domain-scoped pass/fail check.
///
/// Declaration order is the deterministic evaluation order; the derived `Ord`
/// keeps `BTreeMap<GateName, _>` output stable across runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateName {
    /// Security findings from vulnerability, SAST, and secret scanners.
    Security,
    /// Code coverage percentages.
    Coverage,
    /// Test-runner pass/skip rates and counts.
    Tests,
    /// Build time, bundle size, response time, error rate.
    Performance,
    /// Code-quality metrics (bugs, smells, complexity).
    Quality,
    /// Dependency freshness and licensing.
    Dependencies,
}

impl GateName {
    /// Returns all gates in deterministic evaluation order.
    #[must_use]
    pub const fn all() -> &'static [GateName] {
        &[
            Self::Security,
            Self::Coverage,
            Self::Tests,
            Self::Performance,
            Self::Quality,
            Self::Dependencies,
        ]
    }
}

impl fmt::Display for GateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Security => "security",
            Self::Coverage => "coverage",
            Self::Tests => "tests",
            Self::Performance => "performance",
            Self::Quality => "quality",
            Self::Dependencies => "dependencies",
        };
        f.write_str(label)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
