//! Static analysis tools: Semgrep and SonarQube.
//!
//! Semgrep produces security findings only. SonarQube produces quality
//! findings from its issue list plus quality metric samples from its
//! measures block.

use serde_json::Value;

use verdict_core::{Category, Finding, MetricSample, MetricUnit, Severity, ToolId};

use crate::{array_field, bucket_or_fail_closed, number_field, string_field, AdapterError, Normalized};

// ---------------------------------------------------------------------------
// Semgrep
// ---------------------------------------------------------------------------

/// Semgrep SAST: `results[].extra.severity` with
/// ERROR / WARNING / INFO mapping to critical / high / low.
pub fn semgrep(report: &Value) -> Result<Normalized, AdapterError> {
    let tool = ToolId::Semgrep;
    let mut findings = Vec::new();

    for result in array_field(tool, report, "results")? {
        let extra = result.get("extra").ok_or_else(|| {
            AdapterError::schema(tool, "result entry is missing 'extra'")
        })?;
        let raw = string_field(tool, extra, "severity", "result entry")?;
        let mapped = match raw {
            "ERROR" => Some(Severity::Critical),
            "WARNING" => Some(Severity::High),
            "INFO" => Some(Severity::Low),
            _ => None,
        };
        let severity = bucket_or_fail_closed(tool, raw, mapped);

        let identifier = result
            .get("check_id")
            .and_then(Value::as_str)
            .unwrap_or("unknown");

        let mut finding = Finding::new(tool, Category::Security, severity, raw, identifier);
        if let Some(path) = result.get("path").and_then(Value::as_str) {
            let line = result
                .get("start")
                .and_then(|s| s.get("line"))
                .and_then(Value::as_u64);
            finding = match line {
                Some(line) => finding.with_location(format!("{path}:{line}")),
                None => finding.with_location(path),
            };
        }
        findings.push(finding);
    }

    Ok(Normalized::findings(findings))
}

// ---------------------------------------------------------------------------
// SonarQube
// ---------------------------------------------------------------------------

/// SonarQube: `issues[]` become quality findings, the `metrics` block
/// becomes quality metric samples.
///
/// Issue severities map BLOCKER and CRITICAL to critical, MAJOR to high,
/// MINOR to medium, and INFO to low.
pub fn sonarqube(report: &Value) -> Result<Normalized, AdapterError> {
    let tool = ToolId::Sonarqube;
    let mut findings = Vec::new();

    for issue in array_field(tool, report, "issues")? {
        let raw = string_field(tool, issue, "severity", "issue entry")?;
        let mapped = match raw {
            "BLOCKER" | "CRITICAL" => Some(Severity::Critical),
            "MAJOR" => Some(Severity::High),
            "MINOR" => Some(Severity::Medium),
            "INFO" => Some(Severity::Low),
            _ => None,
        };
        let severity = bucket_or_fail_closed(tool, raw, mapped);

        let identifier = issue
            .get("rule")
            .and_then(Value::as_str)
            .unwrap_or("unknown");

        let mut finding = Finding::new(tool, Category::Quality, severity, raw, identifier);
        if let Some(component) = issue.get("component").and_then(Value::as_str) {
            finding = finding.with_location(component);
        }
        findings.push(finding);
    }

    let mut samples = Vec::new();
    if let Some(metrics) = report.get("metrics") {
        // Native keys are camelCase; sample names are canonical snake_case.
        let counts = [
            ("bugs", "bugs"),
            ("vulnerabilities", "vulnerabilities"),
            ("codeSmells", "code_smells"),
            ("complexity", "complexity"),
        ];
        for (key, name) in counts {
            if let Some(value) = number_field(metrics, key) {
                samples.push(MetricSample::new(
                    Category::Quality,
                    name,
                    value,
                    MetricUnit::Count,
                ));
            }
        }
        let percents = [
            ("duplications", "duplications"),
            ("maintainabilityIndex", "maintainability_index"),
        ];
        for (key, name) in percents {
            if let Some(value) = number_field(metrics, key) {
                samples.push(MetricSample::new(
                    Category::Quality,
                    name,
                    value,
                    MetricUnit::Percent,
                ));
            }
        }
    }

    Ok(Normalized { findings, metrics: samples })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
