//! Gate results and violations.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use verdict_core::{GateName, Severity, ToolId};

// ---------------------------------------------------------------------------
// GateStatus
// ---------------------------------------------------------------------------

/// Outcome of one gate.
///
/// `NotEvaluated` is distinct from `Passed`: a gate with no usable input
/// contributes nothing to the overall verdict instead of silently passing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GateStatus {
    /// All configured limits held.
    Passed,
    /// At least one limit was crossed.
    Failed,
    /// No usable input reached the gate.
    NotEvaluated,
}

impl fmt::Display for GateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::NotEvaluated => "not-evaluated",
        };
        f.write_str(label)
    }
}

// ---------------------------------------------------------------------------
// Violation
// ---------------------------------------------------------------------------

/// What kind of limit a violation crossed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViolationKind {
    /// An observed value crossed a configured threshold.
    Threshold,
    /// A mandatory report was absent or unusable.
    MissingReport,
}

/// One crossed limit, immutable once constructed.
///
/// The optional fields depend on the kind: threshold violations carry the
/// observed value and the limit; severity-count violations additionally name
/// the tool and bucket, metric violations the metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// The gate that emitted the violation.
    pub gate: GateName,

    /// Threshold crossing or missing mandatory report.
    pub kind: ViolationKind,

    /// Severity bucket, for finding-count violations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,

    /// Metric name, for metric violations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,

    /// Contributing tool, where one is attributable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<ToolId>,

    /// The observed value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed: Option<f64>,

    /// The configured limit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,

    /// Human-readable description with exact observed value and limit.
    pub message: String,
}

impl Violation {
    /// A severity-count violation for one tool's findings.
    #[must_use]
    pub fn finding_count(
        gate: GateName,
        tool: ToolId,
        severity: Severity,
        observed: f64,
        threshold: f64,
    ) -> Self {
        Self {
            gate,
            kind: ViolationKind::Threshold,
            severity: Some(severity),
            metric: None,
            tool: Some(tool),
            observed: Some(observed),
            threshold: Some(threshold),
            message: format!(
                "{tool}: {observed} {severity} findings (threshold: {threshold})"
            ),
        }
    }

    /// A metric-threshold violation.
    #[must_use]
    pub fn metric(
        gate: GateName,
        metric: impl Into<String>,
        observed: f64,
        limit: verdict_policy::Limit,
    ) -> Self {
        let metric = metric.into();
        Self {
            message: format!("{gate}: {metric} is {observed} (threshold: {limit})"),
            gate,
            kind: ViolationKind::Threshold,
            severity: None,
            metric: Some(metric),
            tool: None,
            observed: Some(observed),
            threshold: Some(limit.value),
        }
    }

    /// A missing mandatory report.
    #[must_use]
    pub fn missing_report(gate: GateName, tool: ToolId, detail: &str) -> Self {
        Self {
            gate,
            kind: ViolationKind::MissingReport,
            severity: None,
            metric: None,
            tool: Some(tool),
            observed: None,
            threshold: None,
            message: format!("{tool}: mandatory report {detail}"),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

// ---------------------------------------------------------------------------
// GateResult
// ---------------------------------------------------------------------------

/// Everything one gate produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateResult {
    /// The gate.
    pub name: GateName,

    /// The outcome.
    pub status: GateStatus,

    /// Observed metrics, keyed deterministically.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metrics: BTreeMap<String, f64>,

    /// Crossed limits, in discovery order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<Violation>,

    /// Downgraded input errors (malformed reports), never fatal.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
}

impl GateResult {
    /// A gate with no usable input.
    #[must_use]
    pub fn not_evaluated(name: GateName) -> Self {
        Self {
            name,
            status: GateStatus::NotEvaluated,
            metrics: BTreeMap::new(),
            violations: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Returns `true` if this gate participates in the overall AND.
    #[must_use]
    pub fn is_evaluated(&self) -> bool {
        self.status != GateStatus::NotEvaluated
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
