//! Secret scanners: Gitleaks and TruffleHog.
//!
//! Both report a top-level JSON array. Every detected secret is a critical
//! finding; there is no severity vocabulary to map.

use serde_json::Value;

use verdict_core::{Category, Finding, Severity, ToolId};

use crate::{AdapterError, Normalized};

fn leaks(tool: ToolId, report: &Value) -> Result<&[Value], AdapterError> {
    match report {
        Value::Array(items) => Ok(items),
        Value::Null => Ok(&[]),
        _ => Err(AdapterError::Schema {
            tool,
            detail: "report must be a top-level array".to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Gitleaks
// ---------------------------------------------------------------------------

/// Gitleaks: array of `{ RuleID, File, StartLine, ... }` entries.
pub fn gitleaks(report: &Value) -> Result<Normalized, AdapterError> {
    let tool = ToolId::Gitleaks;
    let mut findings = Vec::new();

    for leak in leaks(tool, report)? {
        let identifier = leak
            .get("RuleID")
            .and_then(Value::as_str)
            .unwrap_or("secret");

        let mut finding =
            Finding::new(tool, Category::Secret, Severity::Critical, "secret", identifier);
        if let Some(file) = leak.get("File").and_then(Value::as_str) {
            let line = leak.get("StartLine").and_then(Value::as_u64);
            finding = match line {
                Some(line) => finding.with_location(format!("{file}:{line}")),
                None => finding.with_location(file),
            };
        }
        findings.push(finding);
    }

    Ok(Normalized::findings(findings))
}

// ---------------------------------------------------------------------------
// TruffleHog
// ---------------------------------------------------------------------------

/// TruffleHog: array of detections; the detector name or reason labels the
/// finding.
pub fn trufflehog(report: &Value) -> Result<Normalized, AdapterError> {
    let tool = ToolId::Trufflehog;
    let mut findings = Vec::new();

    for detection in leaks(tool, report)? {
        let identifier = detection
            .get("DetectorName")
            .and_then(Value::as_str)
            .or_else(|| detection.get("reason").and_then(Value::as_str))
            .unwrap_or("secret");

        let mut finding =
            Finding::new(tool, Category::Secret, Severity::Critical, "secret", identifier);
        if let Some(path) = detection.get("path").and_then(Value::as_str) {
            finding = finding.with_location(path);
        }
        findings.push(finding);
    }

    Ok(Normalized::findings(findings))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
