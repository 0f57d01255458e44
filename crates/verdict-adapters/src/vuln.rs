//! Dependency and container vulnerability scanners.
//!
//! Four schemas normalize here: Snyk (lowercase severities), Trivy
//! (UPPERCASE), Anchore (Capitalized), and OWASP Dependency-Check, which
//! carries no severity vocabulary at all and is bucketed from its CVSS
//! base score.

use serde_json::Value;

use verdict_core::{Category, Finding, Severity, ToolId};

use crate::{array_field, bucket_or_fail_closed, number_field, string_field, AdapterError, Normalized};

/// CVSS cutoffs used when a scanner reports numeric scores instead of a
/// severity vocabulary.
#[must_use]
pub fn severity_from_cvss(score: f64) -> Severity {
    if score >= 9.0 {
        Severity::Critical
    } else if score >= 7.0 {
        Severity::High
    } else if score >= 4.0 {
        Severity::Medium
    } else {
        Severity::Low
    }
}

// ---------------------------------------------------------------------------
// Snyk
// ---------------------------------------------------------------------------

/// Snyk dependency scan: `vulnerabilities[]` with lowercase severities.
pub fn snyk(report: &Value) -> Result<Normalized, AdapterError> {
    let tool = ToolId::Snyk;
    let mut findings = Vec::new();

    for vuln in array_field(tool, report, "vulnerabilities")? {
        let raw = string_field(tool, vuln, "severity", "vulnerability entry")?;
        let mapped = match raw {
            "critical" => Some(Severity::Critical),
            "high" => Some(Severity::High),
            "medium" => Some(Severity::Medium),
            "low" => Some(Severity::Low),
            _ => None,
        };
        let severity = bucket_or_fail_closed(tool, raw, mapped);

        let identifier = vuln
            .get("id")
            .and_then(Value::as_str)
            .or_else(|| vuln.get("title").and_then(Value::as_str))
            .unwrap_or("unknown");

        let mut finding = Finding::new(tool, Category::Security, severity, raw, identifier);
        if let Some(package) = vuln.get("packageName").and_then(Value::as_str) {
            finding = finding.with_location(package);
        }
        findings.push(finding);
    }

    Ok(Normalized::findings(findings))
}

// ---------------------------------------------------------------------------
// Trivy
// ---------------------------------------------------------------------------

/// Trivy container scan: `Results[].Vulnerabilities[]` with UPPERCASE
/// severities.
pub fn trivy(report: &Value) -> Result<Normalized, AdapterError> {
    let tool = ToolId::Trivy;
    let mut findings = Vec::new();

    for result in array_field(tool, report, "Results")? {
        for vuln in array_field(tool, result, "Vulnerabilities")? {
            let raw = string_field(tool, vuln, "Severity", "vulnerability entry")?;
            let mapped = match raw {
                "CRITICAL" => Some(Severity::Critical),
                "HIGH" => Some(Severity::High),
                "MEDIUM" => Some(Severity::Medium),
                "LOW" => Some(Severity::Low),
                _ => None,
            };
            let severity = bucket_or_fail_closed(tool, raw, mapped);

            let identifier = vuln
                .get("VulnerabilityID")
                .and_then(Value::as_str)
                .unwrap_or("unknown");

            let mut finding = Finding::new(tool, Category::Security, severity, raw, identifier);
            if let Some(package) = vuln.get("PkgName").and_then(Value::as_str) {
                finding = finding.with_location(package);
            }
            findings.push(finding);
        }
    }

    Ok(Normalized::findings(findings))
}

// ---------------------------------------------------------------------------
// Anchore
// ---------------------------------------------------------------------------

/// Anchore container scan: `vulnerabilities[]` with Capitalized severities.
pub fn anchore(report: &Value) -> Result<Normalized, AdapterError> {
    let tool = ToolId::Anchore;
    let mut findings = Vec::new();

    for vuln in array_field(tool, report, "vulnerabilities")? {
        let raw = string_field(tool, vuln, "severity", "vulnerability entry")?;
        let mapped = match raw {
            "Critical" => Some(Severity::Critical),
            "High" => Some(Severity::High),
            "Medium" => Some(Severity::Medium),
            "Low" => Some(Severity::Low),
            _ => None,
        };
        let severity = bucket_or_fail_closed(tool, raw, mapped);

        let identifier = vuln
            .get("vuln")
            .and_then(Value::as_str)
            .unwrap_or("unknown");

        let mut finding = Finding::new(tool, Category::Security, severity, raw, identifier);
        if let Some(package) = vuln.get("package").and_then(Value::as_str) {
            finding = finding.with_location(package);
        }
        findings.push(finding);
    }

    Ok(Normalized::findings(findings))
}

// ---------------------------------------------------------------------------
// OWASP Dependency-Check
// ---------------------------------------------------------------------------

/// Dependency-Check scan: `dependencies[].vulnerabilities[]` bucketed from
/// the CVSS v3 base score, falling back to the v2 score, then `0.0`.
pub fn dependency_check(report: &Value) -> Result<Normalized, AdapterError> {
    let tool = ToolId::DependencyCheck;
    let mut findings = Vec::new();

    for dep in array_field(tool, report, "dependencies")? {
        let location = dep
            .get("fileName")
            .and_then(Value::as_str)
            .map(str::to_string);

        for vuln in array_field(tool, dep, "vulnerabilities")? {
            let score = vuln
                .get("cvssv3")
                .and_then(|v| number_field(v, "baseScore"))
                .or_else(|| vuln.get("cvssv2").and_then(|v| number_field(v, "score")))
                .unwrap_or(0.0);
            let severity = severity_from_cvss(score);

            let identifier = vuln
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or("unknown");

            let mut finding = Finding::new(
                tool,
                Category::Security,
                severity,
                format!("cvss:{score}"),
                identifier,
            );
            if let Some(location) = &location {
                finding = finding.with_location(location.clone());
            }
            findings.push(finding);
        }
    }

    Ok(Normalized::findings(findings))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
