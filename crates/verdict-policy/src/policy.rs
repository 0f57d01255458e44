//! Policy definition, JSON loading, validation, and override merge.
//!
//! The built-in policy carries the default limits for every gate. An
//! optional JSON override document replaces only the keys it specifies:
//! the merge is shallow per category and per field, so unspecified defaults
//! always survive. A field that is `None` in both documents is untestable
//! and the corresponding check is skipped, never treated as zero.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use verdict_core::Severity;

use crate::limit::{Limit, MetricCheck};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading or validating a policy.
///
/// A policy error is fatal to the whole evaluation: no gate runs against an
/// untrustworthy policy.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    /// An I/O error occurred while reading a policy file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The JSON content could not be parsed.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The policy failed semantic validation.
    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// SecurityThresholds
// ---------------------------------------------------------------------------

/// Maximum allowed finding counts per severity bucket.
///
/// Applied independently to each contributing tool in the security gate;
/// counts are never summed across tools.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SecurityThresholds {
    /// Maximum number of critical findings allowed per tool.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub critical: Option<u32>,

    /// Maximum number of high findings allowed per tool.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<u32>,

    /// Maximum number of medium findings allowed per tool.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medium: Option<u32>,

    /// Maximum number of low findings allowed per tool.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<u32>,
}

impl SecurityThresholds {
    /// Merge two threshold sets. For each field, `other` (the override)
    /// wins when it has a value; otherwise the value from `self` is kept.
    #[must_use]
    pub fn merge(&self, other: &SecurityThresholds) -> SecurityThresholds {
        SecurityThresholds {
            critical: other.critical.or(self.critical),
            high: other.high.or(self.high),
            medium: other.medium.or(self.medium),
            low: other.low.or(self.low),
        }
    }

    /// Returns the resolved limit for a severity bucket, if configured.
    /// Security limits are always `at most`.
    #[must_use]
    pub fn limit(&self, severity: Severity) -> Option<Limit> {
        let value = match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
        };
        value.map(|v| Limit::at_most(f64::from(v)))
    }
}

// ---------------------------------------------------------------------------
// CoverageThresholds
// ---------------------------------------------------------------------------

/// Minimum coverage percentages. All limits are `at least`; the boundary
/// is an inclusive pass (exactly 80.0 against a limit of 80 passes).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CoverageThresholds {
    /// Minimum line coverage percentage. Override documents may also spell
    /// this key `overall`, the name older threshold files used for it.
    #[serde(alias = "overall", skip_serializing_if = "Option::is_none")]
    pub lines: Option<f64>,

    /// Minimum branch coverage percentage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branches: Option<f64>,

    /// Minimum function coverage percentage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub functions: Option<f64>,
}

impl CoverageThresholds {
    /// Per-field merge; the override wins when present.
    #[must_use]
    pub fn merge(&self, other: &CoverageThresholds) -> CoverageThresholds {
        CoverageThresholds {
            lines: other.lines.or(self.lines),
            branches: other.branches.or(self.branches),
            functions: other.functions.or(self.functions),
        }
    }

    /// Returns the configured metric checks for the coverage gate.
    #[must_use]
    pub fn checks(&self) -> Vec<MetricCheck> {
        let mut checks = Vec::new();
        if let Some(v) = self.lines {
            checks.push(MetricCheck::new("lines", Limit::at_least(v)));
        }
        if let Some(v) = self.branches {
            checks.push(MetricCheck::new("branches", Limit::at_least(v)));
        }
        if let Some(v) = self.functions {
            checks.push(MetricCheck::new("functions", Limit::at_least(v)));
        }
        checks
    }
}

// ---------------------------------------------------------------------------
// TestThresholds
// ---------------------------------------------------------------------------

/// Test-runner limits.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TestThresholds {
    /// Minimum test pass rate percentage (`at least`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pass_rate: Option<f64>,

    /// Maximum skipped-test percentage (`at most`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_rate: Option<f64>,

    /// Minimum number of tests (`at least`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_tests: Option<u32>,
}

impl TestThresholds {
    /// Per-field merge; the override wins when present.
    #[must_use]
    pub fn merge(&self, other: &TestThresholds) -> TestThresholds {
        TestThresholds {
            pass_rate: other.pass_rate.or(self.pass_rate),
            skip_rate: other.skip_rate.or(self.skip_rate),
            min_tests: other.min_tests.or(self.min_tests),
        }
    }

    /// Returns the configured metric checks for the tests gate.
    #[must_use]
    pub fn checks(&self) -> Vec<MetricCheck> {
        let mut checks = Vec::new();
        if let Some(v) = self.pass_rate {
            checks.push(MetricCheck::new("pass_rate", Limit::at_least(v)));
        }
        if let Some(v) = self.skip_rate {
            checks.push(MetricCheck::new("skip_rate", Limit::at_most(v)));
        }
        if let Some(v) = self.min_tests {
            // min_tests is compared against the `total` sample.
            checks.push(MetricCheck::reading(
                "min_tests",
                "total",
                Limit::at_least(f64::from(v)),
            ));
        }
        checks
    }
}

// ---------------------------------------------------------------------------
// PerformanceThresholds
// ---------------------------------------------------------------------------

/// Performance limits. All `at most`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PerformanceThresholds {
    /// Maximum build time in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_time: Option<f64>,

    /// Maximum bundle size in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundle_size: Option<u64>,

    /// Maximum P95 response time in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p95_response_time: Option<f64>,

    /// Maximum error rate percentage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_rate: Option<f64>,
}

impl PerformanceThresholds {
    /// Per-field merge; the override wins when present.
    #[must_use]
    pub fn merge(&self, other: &PerformanceThresholds) -> PerformanceThresholds {
        PerformanceThresholds {
            build_time: other.build_time.or(self.build_time),
            bundle_size: other.bundle_size.or(self.bundle_size),
            p95_response_time: other.p95_response_time.or(self.p95_response_time),
            error_rate: other.error_rate.or(self.error_rate),
        }
    }

    /// Returns the configured metric checks for the performance gate.
    #[must_use]
    pub fn checks(&self) -> Vec<MetricCheck> {
        let mut checks = Vec::new();
        if let Some(v) = self.build_time {
            checks.push(MetricCheck::new("build_time", Limit::at_most(v)));
        }
        if let Some(v) = self.bundle_size {
            #[allow(clippy::cast_precision_loss)]
            checks.push(MetricCheck::new("bundle_size", Limit::at_most(v as f64)));
        }
        if let Some(v) = self.p95_response_time {
            checks.push(MetricCheck::reading(
                "p95_response_time",
                "p95",
                Limit::at_most(v),
            ));
        }
        if let Some(v) = self.error_rate {
            checks.push(MetricCheck::new("error_rate", Limit::at_most(v)));
        }
        checks
    }
}

// ---------------------------------------------------------------------------
// QualityThresholds
// ---------------------------------------------------------------------------

/// Code-quality limits. `maintainability_index` is `at least`; everything
/// else `at most`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QualityThresholds {
    /// Maximum number of bugs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bugs: Option<u32>,

    /// Maximum number of code vulnerabilities.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vulnerabilities: Option<u32>,

    /// Maximum number of code smells.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_smells: Option<u32>,

    /// Maximum duplication percentage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplications: Option<f64>,

    /// Maximum cyclomatic complexity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complexity: Option<u32>,

    /// Minimum maintainability index.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintainability_index: Option<f64>,
}

impl QualityThresholds {
    /// Per-field merge; the override wins when present.
    #[must_use]
    pub fn merge(&self, other: &QualityThresholds) -> QualityThresholds {
        QualityThresholds {
            bugs: other.bugs.or(self.bugs),
            vulnerabilities: other.vulnerabilities.or(self.vulnerabilities),
            code_smells: other.code_smells.or(self.code_smells),
            duplications: other.duplications.or(self.duplications),
            complexity: other.complexity.or(self.complexity),
            maintainability_index: other.maintainability_index.or(self.maintainability_index),
        }
    }

    /// Returns the configured metric checks for the quality gate.
    #[must_use]
    pub fn checks(&self) -> Vec<MetricCheck> {
        let mut checks = Vec::new();
        if let Some(v) = self.bugs {
            checks.push(MetricCheck::new("bugs", Limit::at_most(f64::from(v))));
        }
        if let Some(v) = self.vulnerabilities {
            checks.push(MetricCheck::new(
                "vulnerabilities",
                Limit::at_most(f64::from(v)),
            ));
        }
        if let Some(v) = self.code_smells {
            checks.push(MetricCheck::new(
                "code_smells",
                Limit::at_most(f64::from(v)),
            ));
        }
        if let Some(v) = self.duplications {
            checks.push(MetricCheck::new("duplications", Limit::at_most(v)));
        }
        if let Some(v) = self.complexity {
            checks.push(MetricCheck::new(
                "complexity",
                Limit::at_most(f64::from(v)),
            ));
        }
        if let Some(v) = self.maintainability_index {
            checks.push(MetricCheck::new(
                "maintainability_index",
                Limit::at_least(v),
            ));
        }
        checks
    }
}

// ---------------------------------------------------------------------------
// DependencyThresholds
// ---------------------------------------------------------------------------

/// Dependency hygiene limits. All `at most`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DependencyThresholds {
    /// Maximum outdated-dependency percentage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outdated: Option<f64>,

    /// Maximum number of deprecated dependencies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<u32>,

    /// Maximum number of unlicensed dependencies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unlicensed: Option<u32>,
}

impl DependencyThresholds {
    /// Per-field merge; the override wins when present.
    #[must_use]
    pub fn merge(&self, other: &DependencyThresholds) -> DependencyThresholds {
        DependencyThresholds {
            outdated: other.outdated.or(self.outdated),
            deprecated: other.deprecated.or(self.deprecated),
            unlicensed: other.unlicensed.or(self.unlicensed),
        }
    }

    /// Returns the configured metric checks for the dependencies gate.
    #[must_use]
    pub fn checks(&self) -> Vec<MetricCheck> {
        let mut checks = Vec::new();
        if let Some(v) = self.outdated {
            checks.push(MetricCheck::reading(
                "outdated",
                "outdated_pct",
                Limit::at_most(v),
            ));
        }
        if let Some(v) = self.deprecated {
            checks.push(MetricCheck::new(
                "deprecated",
                Limit::at_most(f64::from(v)),
            ));
        }
        if let Some(v) = self.unlicensed {
            checks.push(MetricCheck::new(
                "unlicensed",
                Limit::at_most(f64::from(v)),
            ));
        }
        checks
    }
}

// ---------------------------------------------------------------------------
// ThresholdPolicy
// ---------------------------------------------------------------------------

/// The full threshold policy, one section per gate category.
///
/// `ThresholdPolicy::default()` is empty (every limit unset); the shipped
/// defaults live in [`builtin_policy`]. An override document deserializes
/// into this same type and merges over the builtin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThresholdPolicy {
    /// Security gate limits (per severity bucket, per tool).
    pub security: SecurityThresholds,
    /// Coverage gate limits.
    pub coverage: CoverageThresholds,
    /// Tests gate limits.
    pub tests: TestThresholds,
    /// Performance gate limits.
    pub performance: PerformanceThresholds,
    /// Code-quality gate limits.
    pub quality: QualityThresholds,
    /// Dependencies gate limits.
    pub dependencies: DependencyThresholds,
}

impl ThresholdPolicy {
    /// Merges an override policy over this one, per category and per field.
    /// Override entries replace only the keys they specify.
    #[must_use]
    pub fn merge(&self, other: &ThresholdPolicy) -> ThresholdPolicy {
        ThresholdPolicy {
            security: self.security.merge(&other.security),
            coverage: self.coverage.merge(&other.coverage),
            tests: self.tests.merge(&other.tests),
            performance: self.performance.merge(&other.performance),
            quality: self.quality.merge(&other.quality),
            dependencies: self.dependencies.merge(&other.dependencies),
        }
    }
}

// ---------------------------------------------------------------------------
// Built-in defaults
// ---------------------------------------------------------------------------

/// Returns the built-in default policy applied when no override is given.
#[must_use]
pub fn builtin_policy() -> ThresholdPolicy {
    ThresholdPolicy {
        security: SecurityThresholds {
            critical: Some(0),
            high: Some(5),
            medium: Some(20),
            low: Some(100),
        },
        coverage: CoverageThresholds {
            lines: Some(80.0),
            branches: Some(75.0),
            functions: Some(80.0),
        },
        tests: TestThresholds {
            pass_rate: Some(100.0),
            skip_rate: Some(5.0),
            min_tests: Some(50),
        },
        performance: PerformanceThresholds {
            build_time: Some(600.0),
            bundle_size: Some(5 * 1024 * 1024),
            p95_response_time: Some(500.0),
            error_rate: Some(1.0),
        },
        quality: QualityThresholds {
            bugs: Some(5),
            vulnerabilities: Some(0),
            code_smells: Some(50),
            duplications: Some(5.0),
            complexity: Some(15),
            maintainability_index: Some(20.0),
        },
        dependencies: DependencyThresholds {
            outdated: Some(10.0),
            deprecated: Some(0),
            unlicensed: Some(0),
        },
    }
}

// ---------------------------------------------------------------------------
// Loading and validation
// ---------------------------------------------------------------------------

/// Loads a [`ThresholdPolicy`] override document from a JSON file.
///
/// # Errors
///
/// Returns [`PolicyError::Io`] if the file cannot be read,
/// [`PolicyError::Parse`] if the JSON is malformed or contains unknown
/// keys, or [`PolicyError::Validation`] if semantic validation fails.
pub fn load_policy(path: &Path) -> Result<ThresholdPolicy, PolicyError> {
    let content = std::fs::read_to_string(path)?;
    load_policy_from_str(&content)
}

/// Parses a [`ThresholdPolicy`] override document from a JSON string.
///
/// # Errors
///
/// Returns [`PolicyError::Parse`] on malformed JSON or unknown keys, or
/// [`PolicyError::Validation`] if semantic validation fails.
pub fn load_policy_from_str(json: &str) -> Result<ThresholdPolicy, PolicyError> {
    let policy: ThresholdPolicy = serde_json::from_str(json)?;
    validate_policy(&policy)?;
    Ok(policy)
}

/// Resolves the effective policy: builtin defaults, optionally merged with
/// an override document. A missing override path is not an error; a present
/// but unreadable or malformed one is fatal.
///
/// # Errors
///
/// Propagates any [`PolicyError`] from loading the override document.
pub fn resolve_policy(override_path: Option<&Path>) -> Result<ThresholdPolicy, PolicyError> {
    let builtin = builtin_policy();
    match override_path {
        Some(path) => {
            let overlay = load_policy(path)?;
            info!(path = %path.display(), "merged threshold overrides");
            Ok(builtin.merge(&overlay))
        }
        None => Ok(builtin),
    }
}

/// Validates semantic invariants on a parsed policy.
fn validate_policy(policy: &ThresholdPolicy) -> Result<(), PolicyError> {
    let percentages = [
        ("coverage.lines", policy.coverage.lines),
        ("coverage.branches", policy.coverage.branches),
        ("coverage.functions", policy.coverage.functions),
        ("tests.pass_rate", policy.tests.pass_rate),
        ("tests.skip_rate", policy.tests.skip_rate),
        ("performance.error_rate", policy.performance.error_rate),
        ("quality.duplications", policy.quality.duplications),
        ("dependencies.outdated", policy.dependencies.outdated),
    ];
    for (name, value) in percentages {
        if let Some(v) = value {
            if !(0.0..=100.0).contains(&v) {
                return Err(PolicyError::Validation(format!(
                    "{name} must be a percentage in 0..=100, got {v}"
                )));
            }
        }
    }

    let non_negative = [
        ("performance.build_time", policy.performance.build_time),
        (
            "performance.p95_response_time",
            policy.performance.p95_response_time,
        ),
        (
            "quality.maintainability_index",
            policy.quality.maintainability_index,
        ),
    ];
    for (name, value) in non_negative {
        if let Some(v) = value {
            if !v.is_finite() || v < 0.0 {
                return Err(PolicyError::Validation(format!(
                    "{name} must be a non-negative number, got {v}"
                )));
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    // -- defaults ------------------------------------------------------------

    #[test]
    fn default_policy_is_empty() {
        let policy = ThresholdPolicy::default();
        assert_eq!(policy.security.critical, None);
        assert_eq!(policy.coverage.lines, None);
        assert!(policy.tests.checks().is_empty());
        assert!(policy.performance.checks().is_empty());
        assert!(policy.quality.checks().is_empty());
        assert!(policy.dependencies.checks().is_empty());
    }

    #[test]
    fn builtin_policy_values() {
        let policy = builtin_policy();
        assert_eq!(policy.security.critical, Some(0));
        assert_eq!(policy.security.high, Some(5));
        assert_eq!(policy.security.medium, Some(20));
        assert_eq!(policy.security.low, Some(100));
        assert_eq!(policy.coverage.lines, Some(80.0));
        assert_eq!(policy.coverage.branches, Some(75.0));
        assert_eq!(policy.coverage.functions, Some(80.0));
        assert_eq!(policy.tests.pass_rate, Some(100.0));
        assert_eq!(policy.tests.skip_rate, Some(5.0));
        assert_eq!(policy.tests.min_tests, Some(50));
        assert_eq!(policy.performance.build_time, Some(600.0));
        assert_eq!(policy.performance.bundle_size, Some(5_242_880));
        assert_eq!(policy.performance.p95_response_time, Some(500.0));
        assert_eq!(policy.performance.error_rate, Some(1.0));
        assert_eq!(policy.quality.bugs, Some(5));
        assert_eq!(policy.quality.vulnerabilities, Some(0));
        assert_eq!(policy.quality.code_smells, Some(50));
        assert_eq!(policy.quality.duplications, Some(5.0));
        assert_eq!(policy.quality.complexity, Some(15));
        assert_eq!(policy.quality.maintainability_index, Some(20.0));
        assert_eq!(policy.dependencies.outdated, Some(10.0));
        assert_eq!(policy.dependencies.deprecated, Some(0));
        assert_eq!(policy.dependencies.unlicensed, Some(0));
    }

    // -- security limits -----------------------------------------------------

    #[test]
    fn security_limit_per_bucket() {
        let policy = builtin_policy();
        let critical = policy.security.limit(Severity::Critical).unwrap();
        assert_eq!(critical.value, 0.0);
        assert!(critical.is_violated(1.0));
        assert!(!critical.is_violated(0.0));

        let high = policy.security.limit(Severity::High).unwrap();
        assert_eq!(high.value, 5.0);
    }

    #[test]
    fn security_limit_unset_bucket_is_none() {
        let thresholds = SecurityThresholds {
            critical: Some(0),
            ..SecurityThresholds::default()
        };
        assert!(thresholds.limit(Severity::Critical).is_some());
        assert!(thresholds.limit(Severity::High).is_none());
        assert!(thresholds.limit(Severity::Medium).is_none());
        assert!(thresholds.limit(Severity::Low).is_none());
    }

    // -- merge ---------------------------------------------------------------

    #[test]
    fn merge_override_wins_per_field() {
        let base = builtin_policy();
        let overlay = load_policy_from_str(r#"{"security": {"high": 10}}"#).unwrap();
        let merged = base.merge(&overlay);

        // Overridden key replaced.
        assert_eq!(merged.security.high, Some(10));
        // Unspecified keys in the same category survive.
        assert_eq!(merged.security.critical, Some(0));
        assert_eq!(merged.security.medium, Some(20));
        // Untouched categories survive entirely.
        assert_eq!(merged.coverage.lines, Some(80.0));
    }

    #[test]
    fn merge_multiple_categories() {
        let base = builtin_policy();
        let overlay = load_policy_from_str(
            r#"{
                "coverage": {"lines": 90.0},
                "tests": {"min_tests": 10},
                "dependencies": {"outdated": 25.0}
            }"#,
        )
        .unwrap();
        let merged = base.merge(&overlay);

        assert_eq!(merged.coverage.lines, Some(90.0));
        assert_eq!(merged.coverage.branches, Some(75.0));
        assert_eq!(merged.tests.min_tests, Some(10));
        assert_eq!(merged.tests.pass_rate, Some(100.0));
        assert_eq!(merged.dependencies.outdated, Some(25.0));
        assert_eq!(merged.dependencies.deprecated, Some(0));
    }

    #[test]
    fn merge_empty_override_is_identity() {
        let base = builtin_policy();
        let merged = base.merge(&ThresholdPolicy::default());
        assert_eq!(merged, base);
    }

    // -- loading -------------------------------------------------------------

    #[test]
    fn load_empty_document() {
        let policy = load_policy_from_str("{}").unwrap();
        assert_eq!(policy, ThresholdPolicy::default());
    }

    #[test]
    fn load_rejects_malformed_json() {
        let err = load_policy_from_str("{not json").unwrap_err();
        assert!(matches!(err, PolicyError::Parse(_)));
    }

    #[test]
    fn load_rejects_unknown_category() {
        let err = load_policy_from_str(r#"{"secuirty": {"critical": 0}}"#).unwrap_err();
        assert!(matches!(err, PolicyError::Parse(_)));
    }

    #[test]
    fn load_rejects_unknown_metric() {
        let err = load_policy_from_str(r#"{"coverage": {"line": 80}}"#).unwrap_err();
        assert!(matches!(err, PolicyError::Parse(_)));
    }

    #[test]
    fn load_accepts_overall_as_line_coverage() {
        let policy = load_policy_from_str(r#"{"coverage": {"overall": 85}}"#).unwrap();
        assert_eq!(policy.coverage.lines, Some(85.0));
    }

    #[test]
    fn load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"security": {"critical": 2}}"#).unwrap();
        file.flush().unwrap();

        let policy = load_policy(file.path()).unwrap();
        assert_eq!(policy.security.critical, Some(2));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = load_policy(Path::new("/nonexistent/thresholds.json")).unwrap_err();
        assert!(matches!(err, PolicyError::Io(_)));
    }

    // -- validation ----------------------------------------------------------

    #[test]
    fn validation_rejects_out_of_range_percentage() {
        let err = load_policy_from_str(r#"{"coverage": {"lines": 120.0}}"#).unwrap_err();
        match err {
            PolicyError::Validation(msg) => {
                assert!(msg.contains("coverage.lines"), "got: {msg}");
            }
            other => panic!("expected Validation, got: {other}"),
        }
    }

    #[test]
    fn validation_rejects_negative_percentage() {
        let err = load_policy_from_str(r#"{"tests": {"skip_rate": -1.0}}"#).unwrap_err();
        assert!(matches!(err, PolicyError::Validation(_)));
    }

    #[test]
    fn validation_rejects_negative_build_time() {
        let err = load_policy_from_str(r#"{"performance": {"build_time": -5.0}}"#).unwrap_err();
        assert!(matches!(err, PolicyError::Validation(_)));
    }

    #[test]
    fn validation_accepts_boundary_percentages() {
        assert!(load_policy_from_str(r#"{"coverage": {"lines": 0.0}}"#).is_ok());
        assert!(load_policy_from_str(r#"{"coverage": {"lines": 100.0}}"#).is_ok());
    }

    // -- resolve -------------------------------------------------------------

    #[test]
    fn resolve_without_override_is_builtin() {
        let policy = resolve_policy(None).unwrap();
        assert_eq!(policy, builtin_policy());
    }

    #[test]
    fn resolve_with_override_merges() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"security": {"high": 0}}"#).unwrap();
        file.flush().unwrap();

        let policy = resolve_policy(Some(file.path())).unwrap();
        assert_eq!(policy.security.high, Some(0));
        assert_eq!(policy.security.critical, Some(0));
        assert_eq!(policy.coverage.lines, Some(80.0));
    }

    #[test]
    fn resolve_with_malformed_override_is_fatal() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{broken").unwrap();
        file.flush().unwrap();

        let err = resolve_policy(Some(file.path())).unwrap_err();
        assert!(matches!(err, PolicyError::Parse(_)));
    }

    // -- checks --------------------------------------------------------------

    #[test]
    fn coverage_checks_only_configured_fields() {
        let thresholds = CoverageThresholds {
            lines: Some(80.0),
            branches: None,
            functions: None,
        };
        let checks = thresholds.checks();
        assert_eq!(checks.len(), 1);
        assert_eq!(checks[0].metric, "lines");
        assert_eq!(checks[0].limit, Limit::at_least(80.0));
    }

    #[test]
    fn tests_checks_read_min_tests_from_total() {
        let checks = builtin_policy().tests.checks();
        let min_tests = checks.iter().find(|c| c.metric == "min_tests").unwrap();
        assert_eq!(min_tests.sample, "total");
        assert_eq!(min_tests.limit, Limit::at_least(50.0));
    }

    #[test]
    fn performance_checks_read_p95_sample() {
        let checks = builtin_policy().performance.checks();
        let p95 = checks
            .iter()
            .find(|c| c.metric == "p95_response_time")
            .unwrap();
        assert_eq!(p95.sample, "p95");
        assert_eq!(p95.limit, Limit::at_most(500.0));
    }

    #[test]
    fn quality_maintainability_is_at_least() {
        let checks = builtin_policy().quality.checks();
        let mi = checks
            .iter()
            .find(|c| c.metric == "maintainability_index")
            .unwrap();
        assert_eq!(mi.limit, Limit::at_least(20.0));
        // Everything else in the section is at-most.
        let bugs = checks.iter().find(|c| c.metric == "bugs").unwrap();
        assert_eq!(bugs.limit, Limit::at_most(5.0));
    }

    #[test]
    fn dependencies_outdated_reads_percentage_sample() {
        let checks = builtin_policy().dependencies.checks();
        let outdated = checks.iter().find(|c| c.metric == "outdated").unwrap();
        assert_eq!(outdated.sample, "outdated_pct");
    }

    // -- serde ---------------------------------------------------------------

    #[test]
    fn policy_serde_roundtrip() {
        let policy = builtin_policy();
        let json = serde_json::to_string(&policy).unwrap();
        let back: ThresholdPolicy = serde_json::from_str(&json).unwrap();
        assert_eq!(policy, back);
    }

    #[test]
    fn policy_serialization_omits_unset_fields() {
        let policy = load_policy_from_str(r#"{"security": {"critical": 0}}"#).unwrap();
        let value: serde_json::Value = serde_json::to_value(&policy).unwrap();
        assert!(value["security"].get("high").is_none());
    }
}
