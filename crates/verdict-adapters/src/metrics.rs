//! Metric-producing reports: coverage, test runner, performance, and the
//! dependency audit.
//!
//! These adapters emit no findings, only [`MetricSample`]s for the
//! metric-driven gates.

use serde_json::Value;

use verdict_core::{Category, MetricSample, MetricUnit, ToolId};

use crate::{number_field, AdapterError, Normalized};

fn sample(name: &str, value: f64, unit: MetricUnit) -> MetricSample {
    MetricSample::new(Category::Quality, name, value, unit)
}

// ---------------------------------------------------------------------------
// Coverage
// ---------------------------------------------------------------------------

/// Istanbul-style coverage summary: the `total` block with per-dimension
/// `pct` fields. A report without `total` normalizes to the empty result.
pub fn coverage(report: &Value) -> Result<Normalized, AdapterError> {
    let tool = ToolId::Coverage;
    let mut samples = Vec::new();

    if let Some(total) = report.get("total") {
        for dimension in ["lines", "branches", "functions", "statements"] {
            let pct = total.get(dimension).and_then(|d| number_field(d, "pct"));
            match pct {
                Some(pct) => samples.push(sample(dimension, pct, MetricUnit::Percent)),
                None => {
                    return Err(AdapterError::Schema {
                        tool,
                        detail: format!("'total.{dimension}.pct' is missing or not a number"),
                    })
                }
            }
        }
    }

    Ok(Normalized::metrics(samples))
}

// ---------------------------------------------------------------------------
// Test runner
// ---------------------------------------------------------------------------

/// Mocha-style test report: the `stats` block with counts and duration.
///
/// Pass and skip rates are derived here so every downstream consumer sees
/// the same arithmetic. When zero tests ran the rates are omitted
/// (undefined, not 0 and not 100); the `total` sample still reports zero
/// so a minimum-test-count limit can fire.
pub fn test_runner(report: &Value) -> Result<Normalized, AdapterError> {
    let tool = ToolId::TestRunner;
    let mut samples = Vec::new();

    if let Some(stats) = report.get("stats") {
        let total = number_field(stats, "tests").ok_or_else(|| AdapterError::Schema {
            tool,
            detail: "'stats.tests' is missing or not a number".to_string(),
        })?;
        let passed = number_field(stats, "passes").unwrap_or(0.0);
        let failed = number_field(stats, "failures").unwrap_or(0.0);
        let skipped = number_field(stats, "pending").unwrap_or(0.0);

        samples.push(sample("total", total, MetricUnit::Count));
        samples.push(sample("passed", passed, MetricUnit::Count));
        samples.push(sample("failed", failed, MetricUnit::Count));
        samples.push(sample("skipped", skipped, MetricUnit::Count));

        if total > 0.0 {
            samples.push(sample("pass_rate", passed / total * 100.0, MetricUnit::Percent));
            samples.push(sample("skip_rate", skipped / total * 100.0, MetricUnit::Percent));
        }

        if let Some(duration) = number_field(stats, "duration") {
            samples.push(sample("duration", duration, MetricUnit::Milliseconds));
        }
    }

    Ok(Normalized::metrics(samples))
}

// ---------------------------------------------------------------------------
// Performance
// ---------------------------------------------------------------------------

/// Load-test report: `p95` response time, `errorRate`, and `bundleSize`,
/// each optional. Build duration arrives via configuration, not here.
pub fn performance(report: &Value) -> Result<Normalized, AdapterError> {
    let mut samples = Vec::new();

    if let Some(p95) = number_field(report, "p95") {
        samples.push(sample("p95", p95, MetricUnit::Milliseconds));
    }
    if let Some(error_rate) = number_field(report, "errorRate") {
        samples.push(sample("error_rate", error_rate, MetricUnit::Percent));
    }
    if let Some(bundle_size) = number_field(report, "bundleSize") {
        samples.push(sample("bundle_size", bundle_size, MetricUnit::Bytes));
    }

    Ok(Normalized::metrics(samples))
}

// ---------------------------------------------------------------------------
// Dependency audit
// ---------------------------------------------------------------------------

/// Dependency freshness and license audit: `total`, `outdated`,
/// `deprecated`, `unlicensed` counts. The outdated percentage is derived
/// when the total is known and positive.
pub fn dependency_audit(report: &Value) -> Result<Normalized, AdapterError> {
    let mut samples = Vec::new();

    let total = number_field(report, "total");
    let outdated = number_field(report, "outdated");

    if let Some(total) = total {
        samples.push(sample("total", total, MetricUnit::Count));
    }
    if let Some(outdated) = outdated {
        samples.push(sample("outdated", outdated, MetricUnit::Count));
    }
    if let Some(deprecated) = number_field(report, "deprecated") {
        samples.push(sample("deprecated", deprecated, MetricUnit::Count));
    }
    if let Some(unlicensed) = number_field(report, "unlicensed") {
        samples.push(sample("unlicensed", unlicensed, MetricUnit::Count));
    }

    if let (Some(total), Some(outdated)) = (total, outdated) {
        if total > 0.0 {
            samples.push(sample(
                "outdated_pct",
                outdated / total * 100.0,
                MetricUnit::Percent,
            ));
        }
    }

    Ok(Normalized::metrics(samples))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn value_of(normalized: &Normalized, name: &str) -> Option<f64> {
        normalized
            .metrics
            .iter()
            .find(|m| m.name == name)
            .map(|m| m.value)
    }

    #[test]
    fn coverage_reads_all_dimensions() {
        let report = json!({
            "total": {
                "lines": { "pct": 82.5 },
                "branches": { "pct": 74.0 },
                "functions": { "pct": 90.0 },
                "statements": { "pct": 81.3 },
            }
        });
        let normalized = coverage(&report).unwrap();
        assert_eq!(value_of(&normalized, "lines"), Some(82.5));
        assert_eq!(value_of(&normalized, "branches"), Some(74.0));
        assert_eq!(value_of(&normalized, "functions"), Some(90.0));
        assert_eq!(value_of(&normalized, "statements"), Some(81.3));
    }

    #[test]
    fn coverage_without_total_is_empty() {
        assert!(coverage(&json!({})).unwrap().is_empty());
    }

    #[test]
    fn coverage_missing_dimension_is_schema_error() {
        let report = json!({ "total": { "lines": { "pct": 80.0 } } });
        assert!(matches!(
            coverage(&report).unwrap_err(),
            AdapterError::Schema { .. }
        ));
    }

    #[test]
    fn test_runner_derives_rates() {
        let report = json!({
            "stats": { "tests": 200, "passes": 196, "failures": 2, "pending": 2, "duration": 5400 }
        });
        let normalized = test_runner(&report).unwrap();
        assert_eq!(value_of(&normalized, "total"), Some(200.0));
        assert_eq!(value_of(&normalized, "pass_rate"), Some(98.0));
        assert_eq!(value_of(&normalized, "skip_rate"), Some(1.0));
        assert_eq!(value_of(&normalized, "duration"), Some(5400.0));
    }

    #[test]
    fn test_runner_zero_tests_omits_rates() {
        let report = json!({
            "stats": { "tests": 0, "passes": 0, "failures": 0, "pending": 0 }
        });
        let normalized = test_runner(&report).unwrap();
        assert_eq!(value_of(&normalized, "total"), Some(0.0));
        assert_eq!(value_of(&normalized, "pass_rate"), None);
        assert_eq!(value_of(&normalized, "skip_rate"), None);
    }

    #[test]
    fn test_runner_without_stats_is_empty() {
        assert!(test_runner(&json!({})).unwrap().is_empty());
    }

    #[test]
    fn performance_all_fields_optional() {
        let report = json!({ "p95": 420.0, "errorRate": 0.4, "bundleSize": 4_100_000 });
        let normalized = performance(&report).unwrap();
        assert_eq!(value_of(&normalized, "p95"), Some(420.0));
        assert_eq!(value_of(&normalized, "error_rate"), Some(0.4));
        assert_eq!(value_of(&normalized, "bundle_size"), Some(4_100_000.0));

        let partial = performance(&json!({ "p95": 100.0 })).unwrap();
        assert_eq!(partial.metrics.len(), 1);
    }

    #[test]
    fn dependency_audit_derives_outdated_percentage() {
        let report = json!({ "total": 120, "outdated": 18, "deprecated": 1, "unlicensed": 0 });
        let normalized = dependency_audit(&report).unwrap();
        assert_eq!(value_of(&normalized, "outdated_pct"), Some(15.0));
        assert_eq!(value_of(&normalized, "deprecated"), Some(1.0));
    }

    #[test]
    fn dependency_audit_zero_total_omits_percentage() {
        let report = json!({ "total": 0, "outdated": 0 });
        let normalized = dependency_audit(&report).unwrap();
        assert_eq!(value_of(&normalized, "outdated_pct"), None);
    }
}
