//! Canonical finding and metric-sample types.
//!
//! Every report adapter normalizes its tool's native output into either
//! [`Finding`]s (discrete issue instances) or [`MetricSample`]s (scalar
//! measurements). Gate evaluators consume only these two types; no native
//! tool schema crosses the adapter boundary.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Category, Severity, ToolId};

// ---------------------------------------------------------------------------
// Finding
// ---------------------------------------------------------------------------

/// One normalized issue instance.
///
/// Findings are deterministically ordered by
/// `(source_tool, category, severity, identifier, location)` so that
/// identical inputs always produce identical output ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// The tool whose report produced this finding.
    pub source_tool: ToolId,

    /// Detection domain of the finding.
    pub category: Category,

    /// Canonical severity bucket.
    pub severity: Severity,

    /// The tool-native severity string this bucket was mapped from,
    /// preserved verbatim for audit.
    pub raw_severity: String,

    /// Tool-scoped identifier (CVE id, rule id, secret-rule name, ...).
    pub identifier: String,

    /// Optional location (file path, package name, image layer).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Finding {
    /// Creates a finding with no location.
    #[must_use]
    pub fn new(
        source_tool: ToolId,
        category: Category,
        severity: Severity,
        raw_severity: impl Into<String>,
        identifier: impl Into<String>,
    ) -> Self {
        Self {
            source_tool,
            category,
            severity,
            raw_severity: raw_severity.into(),
            identifier: identifier.into(),
            location: None,
        }
    }

    /// Attaches a location to the finding.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

/// Deterministic ordering: `(source_tool, category, severity, identifier, location)`.
impl Ord for Finding {
    fn cmp(&self, other: &Self) -> Ordering {
        self.source_tool
            .cmp(&other.source_tool)
            .then_with(|| self.category.cmp(&other.category))
            .then_with(|| self.severity.cmp(&other.severity))
            .then_with(|| self.identifier.cmp(&other.identifier))
            .then_with(|| self.location.cmp(&other.location))
    }
}

impl PartialOrd for Finding {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}/{} {}",
            self.severity, self.source_tool, self.category, self.identifier
        )?;
        if let Some(location) = &self.location {
            write!(f, " ({location})")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MetricUnit
// ---------------------------------------------------------------------------

/// Unit of measurement for a [`MetricSample`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricUnit {
    /// Percentage in the 0..=100 range.
    Percent,
    /// Dimensionless count.
    Count,
    /// Seconds.
    Seconds,
    /// Milliseconds.
    Milliseconds,
    /// Bytes.
    Bytes,
}

impl fmt::Display for MetricUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Percent => "%",
            Self::Count => "count",
            Self::Seconds => "s",
            Self::Milliseconds => "ms",
            Self::Bytes => "bytes",
        };
        f.write_str(label)
    }
}

// ---------------------------------------------------------------------------
// MetricSample
// ---------------------------------------------------------------------------

/// A scalar measurement not expressed as discrete findings
/// (coverage percentage, pass rate, response-time percentile, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    /// Detection domain the metric belongs to.
    pub category: Category,

    /// Metric name in snake_case (e.g. `"lines"`, `"pass_rate"`, `"p95"`).
    pub name: String,

    /// Observed value.
    pub value: f64,

    /// Unit of measurement.
    pub unit: MetricUnit,
}

impl MetricSample {
    /// Creates a metric sample.
    #[must_use]
    pub fn new(category: Category, name: impl Into<String>, value: f64, unit: MetricUnit) -> Self {
        Self {
            category,
            name: name.into(),
            value,
            unit,
        }
    }
}

impl fmt::Display for MetricSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} = {}{}", self.category, self.name, self.value, self.unit)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_finding() -> Finding {
        Finding::new(
            ToolId::Snyk,
            Category::Security,
            Severity::High,
            "high",
            "CVE-2024-0001",
        )
        .with_location("lodash@4.17.20")
    }

    #[test]
    fn finding_constructor_fields() {
        let f = sample_finding();
        assert_eq!(f.source_tool, ToolId::Snyk);
        assert_eq!(f.category, Category::Security);
        assert_eq!(f.severity, Severity::High);
        assert_eq!(f.raw_severity, "high");
        assert_eq!(f.identifier, "CVE-2024-0001");
        assert_eq!(f.location.as_deref(), Some("lodash@4.17.20"));
    }

    #[test]
    fn finding_display() {
        let display = sample_finding().to_string();
        assert!(display.contains("high"));
        assert!(display.contains("snyk"));
        assert!(display.contains("CVE-2024-0001"));
        assert!(display.contains("lodash@4.17.20"));
    }

    #[test]
    fn finding_display_without_location() {
        let f = Finding::new(
            ToolId::Gitleaks,
            Category::Secret,
            Severity::Critical,
            "secret",
            "aws-access-key",
        );
        let display = f.to_string();
        assert!(display.contains("gitleaks"));
        assert!(!display.contains('('));
    }

    #[test]
    fn finding_serde_roundtrip() {
        let f = sample_finding();
        let json = serde_json::to_string(&f).unwrap();
        let back: Finding = serde_json::from_str(&json).unwrap();
        assert_eq!(f, back);
    }

    #[test]
    fn finding_serde_omits_missing_location() {
        let f = Finding::new(
            ToolId::Trivy,
            Category::Security,
            Severity::Low,
            "LOW",
            "CVE-2023-1111",
        );
        let value: serde_json::Value = serde_json::to_value(&f).unwrap();
        assert!(value.get("location").is_none());
    }

    #[test]
    fn findings_sort_deterministically() {
        let mut findings = vec![
            Finding::new(
                ToolId::Trivy,
                Category::Security,
                Severity::Low,
                "LOW",
                "CVE-2",
            ),
            Finding::new(
                ToolId::Snyk,
                Category::Security,
                Severity::Low,
                "low",
                "CVE-9",
            ),
            Finding::new(
                ToolId::Snyk,
                Category::Security,
                Severity::Critical,
                "critical",
                "CVE-1",
            ),
        ];
        findings.sort();

        // Snyk before Trivy; within Snyk, critical before low.
        assert_eq!(findings[0].source_tool, ToolId::Snyk);
        assert_eq!(findings[0].severity, Severity::Critical);
        assert_eq!(findings[1].source_tool, ToolId::Snyk);
        assert_eq!(findings[1].severity, Severity::Low);
        assert_eq!(findings[2].source_tool, ToolId::Trivy);
    }

    #[test]
    fn metric_sample_display() {
        let m = MetricSample::new(Category::Quality, "lines", 82.5, MetricUnit::Percent);
        assert_eq!(m.to_string(), "quality/lines = 82.5%");
    }

    #[test]
    fn metric_sample_serde_roundtrip() {
        let m = MetricSample::new(Category::Quality, "bugs", 3.0, MetricUnit::Count);
        let json = serde_json::to_string(&m).unwrap();
        let back: MetricSample = serde_json::from_str(&json).unwrap();
        assert_eq!(m, back);
    }

    #[test]
    fn metric_unit_serde_lowercase() {
        let json = serde_json::to_string(&MetricUnit::Milliseconds).unwrap();
        assert_eq!(json, "\"milliseconds\"");
    }
}
