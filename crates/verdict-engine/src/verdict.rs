//! Verdict aggregation.
//!
//! Runs every gate in deterministic order, folds the per-gate outcomes into
//! one [`EvaluationResult`], ranks the overall status from the normalized
//! findings, and stamps the override flag. The recorded verdict is a pure
//! function of the inputs; the override never rewrites it.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use verdict_adapters::ReportSet;
use verdict_core::{EvalConfig, Finding, GateName, Severity, ToolId};
use verdict_policy::ThresholdPolicy;

use crate::eval::{
    coverage_gate, dependencies_gate, performance_gate, quality_gate, security_gate, tests_gate,
};
use crate::gate::{GateResult, GateStatus, Violation};

// ---------------------------------------------------------------------------
// OverallStatus
// ---------------------------------------------------------------------------

/// Severity-ranked status across all normalized findings.
///
/// Strict precedence: any critical finding ranks the run CRITICAL, else any
/// high ranks it HIGH, else any medium MEDIUM, else any finding LOW, else
/// PASS. Independent of gate pass/fail: a run can pass every gate and still
/// rank HIGH.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OverallStatus {
    /// At least one critical finding.
    Critical,
    /// At least one high finding, no critical.
    High,
    /// At least one medium finding, nothing above.
    Medium,
    /// Findings exist but none above low.
    Low,
    /// No findings at all.
    Pass,
}

impl OverallStatus {
    /// Ranks a set of findings by strict severity precedence.
    #[must_use]
    pub fn rank(findings: &[Finding]) -> Self {
        let mut status = Self::Pass;
        for finding in findings {
            let candidate = match finding.severity {
                Severity::Critical => Self::Critical,
                Severity::High => Self::High,
                Severity::Medium => Self::Medium,
                Severity::Low => Self::Low,
            };
            // Earlier variants rank higher; keep the most severe seen.
            if (candidate as u8) < (status as u8) {
                status = candidate;
            }
        }
        status
    }
}

impl fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Critical => "CRITICAL",
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
            Self::Pass => "PASS",
        };
        f.write_str(label)
    }
}

// ---------------------------------------------------------------------------
// EvaluationResult
// ---------------------------------------------------------------------------

/// The complete outcome of one evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Deterministic identifier: SHA-256 over build, branch, and the
    /// effective policy. Identical inputs yield identical ids.
    pub id: String,

    /// RFC 3339 timestamp, stamped by the caller. Off by default so that
    /// identical inputs yield byte-identical output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    /// CI build identifier.
    pub build: String,

    /// Branch name.
    pub branch: String,

    /// AND over evaluated gates; gates that were not evaluated are
    /// excluded. Never altered by the override.
    pub passed: bool,

    /// Severity-ranked status over all normalized findings.
    pub overall_status: OverallStatus,

    /// Per-gate results in deterministic order.
    pub gates: BTreeMap<GateName, GateResult>,

    /// Every violation across all gates, in discovery order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<Violation>,

    /// `true` when the override switch was set for this run.
    pub overridden: bool,
}

impl EvaluationResult {
    /// Stamps the result with a timestamp. Separated from evaluation so
    /// the verdict itself stays a pure function of its inputs.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// `true` when the process should exit successfully: the run passed,
    /// or the override switch absorbed the failure.
    #[must_use]
    pub fn exit_success(&self) -> bool {
        self.passed || self.overridden
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Runs every gate and aggregates the verdict.
#[must_use]
pub fn evaluate(
    config: &EvalConfig,
    policy: &ThresholdPolicy,
    reports: &ReportSet,
) -> EvaluationResult {
    let mut gates = BTreeMap::new();
    for &name in GateName::all() {
        let gate = match name {
            GateName::Security => security_gate(config, &policy.security, reports),
            GateName::Coverage => coverage_gate(config, policy, reports),
            GateName::Tests => tests_gate(config, policy, reports),
            GateName::Performance => performance_gate(config, policy, reports),
            GateName::Quality => quality_gate(config, policy, reports),
            GateName::Dependencies => dependencies_gate(config, policy, reports),
        };
        gates.insert(name, gate);
    }

    let violations: Vec<Violation> = GateName::all()
        .iter()
        .filter_map(|name| gates.get(name))
        .flat_map(|gate| gate.violations.iter().cloned())
        .collect();

    let passed = gates
        .values()
        .filter(|gate| gate.is_evaluated())
        .all(|gate| gate.status == GateStatus::Passed);

    let findings = collect_findings(reports);
    let overall_status = OverallStatus::rank(&findings);

    if config.override_gates && !passed {
        warn!("quality-gate override is enabled; failure will not block the build");
    }
    info!(
        passed,
        %overall_status,
        violations = violations.len(),
        "evaluation complete"
    );

    EvaluationResult {
        id: evaluation_id(&config.build_id, &config.branch, policy),
        timestamp: None,
        build: config.build_id.clone(),
        branch: config.branch.clone(),
        passed,
        overall_status,
        gates,
        violations,
        overridden: config.override_gates,
    }
}

/// Gathers every normalized finding across all parsed reports, in the
/// deterministic finding order.
fn collect_findings(reports: &ReportSet) -> Vec<Finding> {
    let mut findings: Vec<Finding> = ToolId::all()
        .iter()
        .filter_map(|&tool| reports.get(tool).normalized())
        .flat_map(|normalized| normalized.findings.iter().cloned())
        .collect();
    findings.sort();
    findings
}

/// Deterministic evaluation id over build, branch, and effective policy.
fn evaluation_id(build: &str, branch: &str, policy: &ThresholdPolicy) -> String {
    let mut hasher = Sha256::new();
    hasher.update(build.as_bytes());
    hasher.update([0]);
    hasher.update(branch.as_bytes());
    hasher.update([0]);
    // Struct field order makes the policy serialization stable.
    if let Ok(policy_json) = serde_json::to_vec(policy) {
        hasher.update(&policy_json);
    }
    hex::encode(hasher.finalize())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use verdict_adapters::{Normalized, ReportInput};
    use verdict_core::Category;
    use verdict_policy::builtin_policy;

    fn finding(tool: ToolId, severity: Severity, id: &str) -> Finding {
        Finding::new(tool, Category::Security, severity, severity.to_string(), id)
    }

    fn reports_with(tool: ToolId, findings: Vec<Finding>) -> ReportSet {
        ReportSet::from_inputs([(tool, ReportInput::Parsed(Normalized::findings(findings)))])
    }

    #[test]
    fn empty_run_passes_with_pass_status() {
        let config = EvalConfig::default();
        let policy = builtin_policy();
        let result = evaluate(&config, &policy, &ReportSet::from_inputs([]));

        assert!(result.passed);
        assert_eq!(result.overall_status, OverallStatus::Pass);
        assert!(result.violations.is_empty());
        assert!(result
            .gates
            .values()
            .all(|g| g.status == GateStatus::NotEvaluated));
    }

    #[test]
    fn evaluation_is_idempotent() {
        let config = EvalConfig::default();
        let policy = builtin_policy();
        let reports = reports_with(
            ToolId::Snyk,
            vec![finding(ToolId::Snyk, Severity::High, "CVE-1")],
        );

        let first = evaluate(&config, &policy, &reports);
        let second = evaluate(&config, &policy, &reports);
        assert_eq!(first, second);

        // Byte-identical serialization, timestamp off by default.
        let a = serde_json::to_string(&first).unwrap();
        let b = serde_json::to_string(&second).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn overall_status_precedence() {
        assert_eq!(OverallStatus::rank(&[]), OverallStatus::Pass);
        assert_eq!(
            OverallStatus::rank(&[finding(ToolId::Snyk, Severity::Low, "a")]),
            OverallStatus::Low
        );
        assert_eq!(
            OverallStatus::rank(&[
                finding(ToolId::Snyk, Severity::Low, "a"),
                finding(ToolId::Snyk, Severity::Medium, "b"),
            ]),
            OverallStatus::Medium
        );
        assert_eq!(
            OverallStatus::rank(&[
                finding(ToolId::Snyk, Severity::Critical, "a"),
                finding(ToolId::Snyk, Severity::Low, "b"),
            ]),
            OverallStatus::Critical
        );
    }

    #[test]
    fn passing_gates_can_still_rank_high() {
        // Three high findings are under the limit of five, so the gate
        // passes, but the run still ranks HIGH.
        let config = EvalConfig::default();
        let policy = builtin_policy();
        let reports = reports_with(
            ToolId::Snyk,
            (0..3)
                .map(|i| finding(ToolId::Snyk, Severity::High, &format!("CVE-{i}")))
                .collect(),
        );

        let result = evaluate(&config, &policy, &reports);
        assert!(result.passed);
        assert_eq!(result.overall_status, OverallStatus::High);
    }

    #[test]
    fn override_flips_exit_only_never_the_verdict() {
        let mut config = EvalConfig::default();
        config.override_gates = true;
        let policy = builtin_policy();
        let reports = reports_with(
            ToolId::Snyk,
            vec![finding(ToolId::Snyk, Severity::Critical, "CVE-1")],
        );

        let result = evaluate(&config, &policy, &reports);
        assert!(!result.passed);
        assert!(result.overridden);
        assert!(result.exit_success());
        assert_eq!(result.overall_status, OverallStatus::Critical);
        assert!(!result.violations.is_empty());
    }

    #[test]
    fn failure_without_override_blocks_exit() {
        let config = EvalConfig::default();
        let policy = builtin_policy();
        let reports = reports_with(
            ToolId::Snyk,
            vec![finding(ToolId::Snyk, Severity::Critical, "CVE-1")],
        );

        let result = evaluate(&config, &policy, &reports);
        assert!(!result.passed);
        assert!(!result.overridden);
        assert!(!result.exit_success());
    }

    #[test]
    fn not_evaluated_gates_are_excluded_from_the_and() {
        // Only the security gate has input; its pass decides the run.
        let config = EvalConfig::default();
        let policy = builtin_policy();
        let reports = reports_with(
            ToolId::Snyk,
            vec![finding(ToolId::Snyk, Severity::Low, "CVE-1")],
        );

        let result = evaluate(&config, &policy, &reports);
        assert!(result.passed);
        assert_eq!(
            result.gates[&GateName::Security].status,
            GateStatus::Passed
        );
        assert_eq!(
            result.gates[&GateName::Coverage].status,
            GateStatus::NotEvaluated
        );
    }

    #[test]
    fn adding_findings_never_flips_failed_to_passed() {
        let config = EvalConfig::default();
        let policy = builtin_policy();

        let mut findings = vec![finding(ToolId::Snyk, Severity::Critical, "CVE-0")];
        let failing = evaluate(&config, &policy, &reports_with(ToolId::Snyk, findings.clone()));
        assert!(!failing.passed);

        findings.push(finding(ToolId::Snyk, Severity::Low, "CVE-extra"));
        let still_failing = evaluate(&config, &policy, &reports_with(ToolId::Snyk, findings));
        assert!(!still_failing.passed);
        assert!(still_failing.violations.len() >= failing.violations.len());
    }

    #[test]
    fn violations_mirror_gate_order() {
        let mut config = EvalConfig::default();
        config.build_duration_secs = Some(900.0);
        let policy = builtin_policy();
        let reports = reports_with(
            ToolId::Snyk,
            vec![finding(ToolId::Snyk, Severity::Critical, "CVE-1")],
        );

        let result = evaluate(&config, &policy, &reports);
        // Security precedes performance in the deterministic gate order.
        assert_eq!(result.violations.len(), 2);
        assert_eq!(result.violations[0].gate, GateName::Security);
        assert_eq!(result.violations[1].gate, GateName::Performance);
    }

    #[test]
    fn evaluation_id_is_stable_and_input_sensitive() {
        let policy = builtin_policy();
        let id1 = evaluation_id("42", "main", &policy);
        let id2 = evaluation_id("42", "main", &policy);
        assert_eq!(id1, id2);
        assert_eq!(id1.len(), 64);

        assert_ne!(id1, evaluation_id("43", "main", &policy));
        assert_ne!(id1, evaluation_id("42", "develop", &policy));

        let mut stricter = policy.clone();
        stricter.security.high = Some(0);
        assert_ne!(id1, evaluation_id("42", "main", &stricter));
    }

    #[test]
    fn result_serde_roundtrip() {
        let config = EvalConfig::default();
        let policy = builtin_policy();
        let reports = reports_with(
            ToolId::Snyk,
            vec![finding(ToolId::Snyk, Severity::High, "CVE-1")],
        );

        let result = evaluate(&config, &policy, &reports).with_timestamp("2026-08-27T12:00:00Z");
        let json = serde_json::to_string_pretty(&result).unwrap();
        let back: EvaluationResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result, back);
    }

    #[test]
    fn overall_status_serializes_uppercase() {
        let json = serde_json::to_string(&OverallStatus::Critical).unwrap();
        assert_eq!(json, "\"CRITICAL\"");
        assert_eq!(OverallStatus::Pass.to_string(), "PASS");
    }
}
