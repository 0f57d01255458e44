//! Per-evaluation configuration.
//!
//! Verdict resolves its configuration from environment variables once at
//! process start. The resulting [`EvalConfig`] is passed by reference into
//! every component; no evaluator performs ambient environment lookups.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{CoreError, ToolId};

// ---------------------------------------------------------------------------
// Environment variable names
// ---------------------------------------------------------------------------

/// Build identifier (CI build number). Defaults to `"local"`.
pub const ENV_BUILD_ID: &str = "BUILD_NUMBER";
/// Branch name. Defaults to `"unknown"`.
pub const ENV_BRANCH: &str = "GIT_BRANCH";
/// Override switch: `"true"` flips the exit decision, never the verdict.
pub const ENV_OVERRIDE: &str = "OVERRIDE_QUALITY_GATES";
/// Build duration in seconds, fed into the performance gate.
pub const ENV_BUILD_DURATION: &str = "BUILD_DURATION";
/// Comma-separated list of tool ids whose reports are mandatory.
pub const ENV_REQUIRED_REPORTS: &str = "REQUIRED_REPORTS";
/// Path to the JSON threshold-override document.
pub const ENV_POLICY_FILE: &str = "THRESHOLDS_CONFIG";

/// Returns the environment variable that selects a tool's report path.
#[must_use]
pub const fn report_env_var(tool: ToolId) -> &'static str {
    match tool {
        ToolId::Snyk => "SNYK_REPORT",
        ToolId::Trivy => "TRIVY_REPORT",
        ToolId::Anchore => "ANCHORE_REPORT",
        ToolId::DependencyCheck => "DEPENDENCY_CHECK_REPORT",
        ToolId::Semgrep => "SEMGREP_REPORT",
        ToolId::Sonarqube => "SONAR_REPORT",
        ToolId::Gitleaks => "GITLEAKS_REPORT",
        ToolId::Trufflehog => "TRUFFLEHOG_REPORT",
        ToolId::Coverage => "COVERAGE_REPORT",
        ToolId::TestRunner => "TEST_REPORT",
        ToolId::Performance => "PERF_REPORT",
        ToolId::DependencyAudit => "DEPENDENCY_AUDIT_REPORT",
    }
}

/// Returns the default report path for a tool when its variable is unset.
#[must_use]
pub fn default_report_path(tool: ToolId) -> PathBuf {
    let path = match tool {
        ToolId::Snyk => "reports/snyk-vulnerabilities.json",
        ToolId::Trivy => "reports/trivy-scan.json",
        ToolId::Anchore => "reports/anchore-report.json",
        ToolId::DependencyCheck => "reports/dependency-check-report.json",
        ToolId::Semgrep => "reports/semgrep-report.json",
        ToolId::Sonarqube => "reports/sonar-report.json",
        ToolId::Gitleaks => "reports/gitleaks-report.json",
        ToolId::Trufflehog => "reports/trufflehog-report.json",
        ToolId::Coverage => "coverage/coverage-final.json",
        ToolId::TestRunner => "reports/test-report.json",
        ToolId::Performance => "reports/performance-report.json",
        ToolId::DependencyAudit => "reports/dependency-audit.json",
    };
    PathBuf::from(path)
}

// ---------------------------------------------------------------------------
// EvalConfig
// ---------------------------------------------------------------------------

/// Configuration for one evaluation run.
///
/// Constructed once (from the environment or programmatically) and passed by
/// reference into every component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalConfig {
    /// CI build identifier.
    pub build_id: String,

    /// Branch name.
    pub branch: String,

    /// When `true`, the process exits successfully even on a failing
    /// verdict. The recorded verdict is never altered.
    pub override_gates: bool,

    /// Build duration in seconds, when the CI system provides it.
    pub build_duration_secs: Option<f64>,

    /// Report path per known tool.
    pub report_paths: BTreeMap<ToolId, PathBuf>,

    /// Tools whose reports are mandatory: an absent report becomes a
    /// `missing-report` violation instead of a skipped gate. This is
    /// explicit configuration, never inferred.
    pub required_tools: BTreeSet<ToolId>,

    /// Optional path to the JSON threshold-override document.
    pub policy_path: Option<PathBuf>,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            build_id: "local".to_string(),
            branch: "unknown".to_string(),
            override_gates: false,
            build_duration_secs: None,
            report_paths: ToolId::all()
                .iter()
                .map(|&tool| (tool, default_report_path(tool)))
                .collect(),
            required_tools: BTreeSet::new(),
            policy_path: None,
        }
    }
}

impl EvalConfig {
    /// Builds the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Config`] if `REQUIRED_REPORTS` names an unknown
    /// tool or `BUILD_DURATION` is not a number.
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// Separated from [`EvalConfig::from_env`] so the parsing logic is a
    /// pure function of its inputs.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Config`] on an unknown tool id in
    /// `REQUIRED_REPORTS` or a non-numeric `BUILD_DURATION`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CoreError> {
        let mut config = Self::default();

        if let Some(build_id) = lookup(ENV_BUILD_ID) {
            config.build_id = build_id;
        }
        if let Some(branch) = lookup(ENV_BRANCH) {
            config.branch = branch;
        }
        config.override_gates = lookup(ENV_OVERRIDE).as_deref() == Some("true");

        if let Some(duration) = lookup(ENV_BUILD_DURATION) {
            let secs: f64 = duration.parse().map_err(|_| {
                CoreError::Config(format!(
                    "{ENV_BUILD_DURATION} must be a number of seconds, got '{duration}'"
                ))
            })?;
            config.build_duration_secs = Some(secs);
        }

        if let Some(required) = lookup(ENV_REQUIRED_REPORTS) {
            config.required_tools = parse_required_tools(&required)?;
        }

        if let Some(policy) = lookup(ENV_POLICY_FILE) {
            config.policy_path = Some(PathBuf::from(policy));
        }

        for &tool in ToolId::all() {
            if let Some(path) = lookup(report_env_var(tool)) {
                config.report_paths.insert(tool, PathBuf::from(path));
            }
        }

        debug!(
            build = %config.build_id,
            branch = %config.branch,
            override_gates = config.override_gates,
            required = config.required_tools.len(),
            "resolved evaluation configuration"
        );

        Ok(config)
    }

    /// Returns the configured report path for a tool.
    #[must_use]
    pub fn report_path(&self, tool: ToolId) -> Option<&PathBuf> {
        self.report_paths.get(&tool)
    }

    /// Returns `true` if the tool's report is mandatory.
    #[must_use]
    pub fn is_required(&self, tool: ToolId) -> bool {
        self.required_tools.contains(&tool)
    }
}

/// Parses the comma-separated `REQUIRED_REPORTS` list.
fn parse_required_tools(raw: &str) -> Result<BTreeSet<ToolId>, CoreError> {
    let mut tools = BTreeSet::new();
    for name in raw.split(',') {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        let tool = ToolId::parse(name).ok_or_else(|| {
            CoreError::Config(format!("{ENV_REQUIRED_REPORTS} names unknown tool '{name}'"))
        })?;
        tools.insert(tool);
    }
    Ok(tools)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
