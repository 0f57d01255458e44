//! Verdict Adapters -- one stateless adapter per scanner report schema.
//!
//! Every adapter is a pure function from a parsed JSON document to the
//! canonical model ([`Finding`]s and [`MetricSample`]s). Adapter selection
//! is a tagged dispatch on [`ToolId`]; no native tool schema crosses this
//! crate's boundary. A report missing its optional sub-structure normalizes
//! to the empty result; a structurally broken report surfaces an
//! [`AdapterError`] with no partial recovery.

use serde_json::Value;
use tracing::warn;

use verdict_core::{Finding, MetricSample, Severity, ToolId};

pub mod metrics;
pub mod report;
pub mod sast;
pub mod secrets;
pub mod vuln;

pub use report::{ReportInput, ReportSet};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors produced while loading or normalizing a scanner report.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// The report file exists but could not be read.
    #[error("{tool}: failed to read {path}: {source}")]
    Io {
        /// The tool whose report failed.
        tool: ToolId,
        /// The offending path.
        path: std::path::PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The report file is not valid JSON.
    #[error("{tool}: malformed JSON in {path}: {source}")]
    Parse {
        /// The tool whose report failed.
        tool: ToolId,
        /// The offending path.
        path: std::path::PathBuf,
        /// The underlying parse error.
        source: serde_json::Error,
    },

    /// The JSON parsed but does not match the tool's schema.
    #[error("{tool}: schema error: {detail}")]
    Schema {
        /// The tool whose report failed.
        tool: ToolId,
        /// What was wrong.
        detail: String,
    },
}

impl AdapterError {
    fn schema(tool: ToolId, detail: impl Into<String>) -> Self {
        Self::Schema {
            tool,
            detail: detail.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Normalized
// ---------------------------------------------------------------------------

/// The canonical output of one adapter run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    /// Discrete issue instances.
    pub findings: Vec<Finding>,
    /// Scalar measurements.
    pub metrics: Vec<MetricSample>,
}

impl Normalized {
    /// A result with findings only.
    #[must_use]
    pub fn findings(findings: Vec<Finding>) -> Self {
        Self {
            findings,
            metrics: Vec::new(),
        }
    }

    /// A result with metric samples only.
    #[must_use]
    pub fn metrics(metrics: Vec<MetricSample>) -> Self {
        Self {
            findings: Vec::new(),
            metrics,
        }
    }

    /// Returns `true` if the adapter produced nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.findings.is_empty() && self.metrics.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Normalizes a parsed report for the given tool.
///
/// # Errors
///
/// Returns [`AdapterError::Schema`] when the document does not match the
/// tool's schema.
pub fn normalize(tool: ToolId, report: &Value) -> Result<Normalized, AdapterError> {
    match tool {
        ToolId::Snyk => vuln::snyk(report),
        ToolId::Trivy => vuln::trivy(report),
        ToolId::Anchore => vuln::anchore(report),
        ToolId::DependencyCheck => vuln::dependency_check(report),
        ToolId::Semgrep => sast::semgrep(report),
        ToolId::Sonarqube => sast::sonarqube(report),
        ToolId::Gitleaks => secrets::gitleaks(report),
        ToolId::Trufflehog => secrets::trufflehog(report),
        ToolId::Coverage => metrics::coverage(report),
        ToolId::TestRunner => metrics::test_runner(report),
        ToolId::Performance => metrics::performance(report),
        ToolId::DependencyAudit => metrics::dependency_audit(report),
    }
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Resolves a native severity string to its canonical bucket.
///
/// Unrecognized values fail closed into [`Severity::Critical`] so that an
/// unknown vocabulary can never relax a gate, and are logged for audit.
fn bucket_or_fail_closed(tool: ToolId, raw: &str, mapped: Option<Severity>) -> Severity {
    mapped.unwrap_or_else(|| {
        warn!(%tool, raw_severity = raw, "unmapped severity, failing closed to critical");
        Severity::Critical
    })
}

/// Reads an optional numeric field from a JSON object.
fn number_field(value: &Value, key: &str) -> Option<f64> {
    value.get(key).and_then(Value::as_f64)
}

/// Reads a required string field, or reports a schema error.
fn string_field<'a>(
    tool: ToolId,
    value: &'a Value,
    key: &str,
    context: &str,
) -> Result<&'a str, AdapterError> {
    value
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| AdapterError::schema(tool, format!("{context} is missing string '{key}'")))
}

/// Reads an optional array field, treating absence as the empty slice.
fn array_field<'a>(
    tool: ToolId,
    value: &'a Value,
    key: &str,
) -> Result<&'a [Value], AdapterError> {
    match value.get(key) {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(AdapterError::schema(
            tool,
            format!("'{key}' must be an array"),
        )),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
