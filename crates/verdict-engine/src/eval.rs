//! Per-gate evaluators.
//!
//! Every gate follows the same shape: gather observations from its report
//! input, compare each against the configured limits, and emit one violation
//! per crossed limit. A limit without an observation is skipped, an
//! observation without a limit is recorded but untested.

use std::collections::BTreeMap;

use tracing::debug;

use verdict_adapters::{ReportInput, ReportSet};
use verdict_core::{EvalConfig, GateName, Severity, ToolId};
use verdict_policy::{MetricCheck, SecurityThresholds, ThresholdPolicy};

use crate::gate::{GateResult, GateStatus, Violation};

/// Tools whose findings feed the security gate. Secret scanners contribute
/// as their own tools; their detections are critical findings like any
/// other.
pub const SECURITY_TOOLS: &[ToolId] = &[
    ToolId::Snyk,
    ToolId::Trivy,
    ToolId::Anchore,
    ToolId::DependencyCheck,
    ToolId::Semgrep,
    ToolId::Gitleaks,
    ToolId::Trufflehog,
];

// ---------------------------------------------------------------------------
// Security gate
// ---------------------------------------------------------------------------

/// Evaluates the security gate over every contributing tool.
///
/// Each tool's severity counts are compared independently against the same
/// thresholds. Counts are never summed across tools and findings are never
/// deduplicated across tools: the same CVE reported by two scanners counts
/// once per scanner.
#[must_use]
pub fn security_gate(
    config: &EvalConfig,
    thresholds: &SecurityThresholds,
    reports: &ReportSet,
) -> GateResult {
    let name = GateName::Security;
    let mut metrics = BTreeMap::new();
    let mut violations = Vec::new();
    let mut diagnostics = Vec::new();
    let mut evaluated_any = false;

    for &tool in SECURITY_TOOLS {
        match reports.get(tool) {
            ReportInput::Absent => {
                if config.is_required(tool) {
                    violations.push(Violation::missing_report(name, tool, "not found"));
                }
            }
            ReportInput::Malformed(diag) => {
                diagnostics.push(diag.clone());
                if config.is_required(tool) {
                    violations.push(Violation::missing_report(name, tool, "is unusable"));
                }
            }
            ReportInput::Parsed(normalized) => {
                evaluated_any = true;
                for &severity in Severity::all() {
                    let count = normalized
                        .findings
                        .iter()
                        .filter(|f| f.severity == severity)
                        .count() as f64;
                    metrics.insert(format!("{tool}.{severity}"), count);

                    if let Some(limit) = thresholds.limit(severity) {
                        if limit.is_violated(count) {
                            violations.push(Violation::finding_count(
                                name,
                                tool,
                                severity,
                                count,
                                limit.value,
                            ));
                        }
                    }
                }
            }
        }
    }

    let status = gate_status(evaluated_any, &violations);
    debug!(gate = %name, %status, violations = violations.len(), "gate evaluated");

    GateResult {
        name,
        status,
        metrics,
        violations,
        diagnostics,
    }
}

// ---------------------------------------------------------------------------
// Metric gates
// ---------------------------------------------------------------------------

/// Evaluates a metric-driven gate fed by a single tool's report, optionally
/// seeded with observations that arrive outside any report.
fn metric_gate(
    name: GateName,
    tool: ToolId,
    config: &EvalConfig,
    reports: &ReportSet,
    checks: &[MetricCheck],
    seed: &[(&str, f64)],
) -> GateResult {
    let mut samples: BTreeMap<String, f64> = seed
        .iter()
        .map(|&(sample, value)| (sample.to_string(), value))
        .collect();
    let mut violations = Vec::new();
    let mut diagnostics = Vec::new();
    let mut evaluated_any = !samples.is_empty();

    match reports.get(tool) {
        ReportInput::Absent => {
            if config.is_required(tool) {
                violations.push(Violation::missing_report(name, tool, "not found"));
            }
        }
        ReportInput::Malformed(diag) => {
            diagnostics.push(diag.clone());
            if config.is_required(tool) {
                violations.push(Violation::missing_report(name, tool, "is unusable"));
            }
        }
        ReportInput::Parsed(normalized) => {
            evaluated_any = true;
            for metric in &normalized.metrics {
                samples.insert(metric.name.clone(), metric.value);
            }
        }
    }

    for check in checks {
        // No observation for a configured limit: the metric is untestable
        // and the check is skipped, never treated as zero.
        if let Some(&observed) = samples.get(check.sample) {
            if check.limit.is_violated(observed) {
                violations.push(Violation::metric(name, check.metric, observed, check.limit));
            }
        }
    }

    let status = gate_status(evaluated_any, &violations);
    debug!(gate = %name, %status, violations = violations.len(), "gate evaluated");

    GateResult {
        name,
        status,
        metrics: samples,
        violations,
        diagnostics,
    }
}

/// Coverage gate over the coverage summary report.
#[must_use]
pub fn coverage_gate(
    config: &EvalConfig,
    policy: &ThresholdPolicy,
    reports: &ReportSet,
) -> GateResult {
    metric_gate(
        GateName::Coverage,
        ToolId::Coverage,
        config,
        reports,
        &policy.coverage.checks(),
        &[],
    )
}

/// Tests gate over the test-runner report.
#[must_use]
pub fn tests_gate(
    config: &EvalConfig,
    policy: &ThresholdPolicy,
    reports: &ReportSet,
) -> GateResult {
    metric_gate(
        GateName::Tests,
        ToolId::TestRunner,
        config,
        reports,
        &policy.tests.checks(),
        &[],
    )
}

/// Performance gate. Build duration arrives from configuration and is
/// evaluated even when the performance report itself is absent.
#[must_use]
pub fn performance_gate(
    config: &EvalConfig,
    policy: &ThresholdPolicy,
    reports: &ReportSet,
) -> GateResult {
    let mut seed = Vec::new();
    if let Some(secs) = config.build_duration_secs {
        seed.push(("build_time", secs));
    }
    metric_gate(
        GateName::Performance,
        ToolId::Performance,
        config,
        reports,
        &policy.performance.checks(),
        &seed,
    )
}

/// Code-quality gate over the SonarQube metrics block.
#[must_use]
pub fn quality_gate(
    config: &EvalConfig,
    policy: &ThresholdPolicy,
    reports: &ReportSet,
) -> GateResult {
    metric_gate(
        GateName::Quality,
        ToolId::Sonarqube,
        config,
        reports,
        &policy.quality.checks(),
        &[],
    )
}

/// Dependencies gate over the dependency-audit report.
#[must_use]
pub fn dependencies_gate(
    config: &EvalConfig,
    policy: &ThresholdPolicy,
    reports: &ReportSet,
) -> GateResult {
    metric_gate(
        GateName::Dependencies,
        ToolId::DependencyAudit,
        config,
        reports,
        &policy.dependencies.checks(),
        &[],
    )
}

fn gate_status(evaluated_any: bool, violations: &[Violation]) -> GateStatus {
    if !violations.is_empty() {
        GateStatus::Failed
    } else if evaluated_any {
        GateStatus::Passed
    } else {
        GateStatus::NotEvaluated
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
