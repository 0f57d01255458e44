//! Resolved limits and comparison directions.
//!
//! Every threshold in the policy resolves to exactly one [`Limit`]: a
//! numeric value plus a fixed [`Comparison`] direction known at design time.
//! The boundary is always an inclusive pass: `observed == value` never
//! violates in either direction.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

/// Direction of a threshold comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Comparison {
    /// The observed value must not exceed the limit
    /// (violation iff `observed > limit`).
    AtMost,
    /// The observed value must reach the limit
    /// (violation iff `observed < limit`).
    AtLeast,
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::AtMost => "at most",
            Self::AtLeast => "at least",
        };
        f.write_str(label)
    }
}

// ---------------------------------------------------------------------------
// Limit
// ---------------------------------------------------------------------------

/// One resolved threshold: a numeric limit plus its comparison direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Limit {
    /// The configured limit.
    pub value: f64,
    /// The comparison direction.
    pub comparison: Comparison,
}

impl Limit {
    /// Creates an `at most` limit.
    #[must_use]
    pub const fn at_most(value: f64) -> Self {
        Self {
            value,
            comparison: Comparison::AtMost,
        }
    }

    /// Creates an `at least` limit.
    #[must_use]
    pub const fn at_least(value: f64) -> Self {
        Self {
            value,
            comparison: Comparison::AtLeast,
        }
    }

    /// Returns `true` if the observed value crosses this limit.
    ///
    /// The boundary is an inclusive pass: `observed == value` does not
    /// violate in either direction.
    #[must_use]
    pub fn is_violated(&self, observed: f64) -> bool {
        match self.comparison {
            Comparison::AtMost => observed > self.value,
            Comparison::AtLeast => observed < self.value,
        }
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.comparison, self.value)
    }
}

// ---------------------------------------------------------------------------
// MetricCheck
// ---------------------------------------------------------------------------

/// A single configured metric comparison for a metric-driven gate.
///
/// `metric` is the policy-facing name used in violation records; `sample`
/// is the metric-sample name the observation is read from. They differ only
/// where the policy key is not the sample key (e.g. `min_tests` reads the
/// `total` sample).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricCheck {
    /// Policy-facing metric name.
    pub metric: &'static str,
    /// Metric-sample name to read the observation from.
    pub sample: &'static str,
    /// The resolved limit.
    pub limit: Limit,
}

impl MetricCheck {
    /// Creates a check whose policy name and sample name coincide.
    #[must_use]
    pub const fn new(metric: &'static str, limit: Limit) -> Self {
        Self {
            metric,
            sample: metric,
            limit,
        }
    }

    /// Creates a check that reads its observation from a different sample.
    #[must_use]
    pub const fn reading(metric: &'static str, sample: &'static str, limit: Limit) -> Self {
        Self {
            metric,
            sample,
            limit,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_most_boundary_is_inclusive_pass() {
        let limit = Limit::at_most(5.0);
        assert!(!limit.is_violated(4.0));
        assert!(!limit.is_violated(5.0));
        assert!(limit.is_violated(6.0));
    }

    #[test]
    fn at_least_boundary_is_inclusive_pass() {
        let limit = Limit::at_least(80.0);
        assert!(!limit.is_violated(81.0));
        assert!(!limit.is_violated(80.0));
        assert!(limit.is_violated(79.9));
    }

    #[test]
    fn zero_at_most_violates_on_any_positive() {
        let limit = Limit::at_most(0.0);
        assert!(!limit.is_violated(0.0));
        assert!(limit.is_violated(1.0));
    }

    #[test]
    fn comparison_display() {
        assert_eq!(Comparison::AtMost.to_string(), "at most");
        assert_eq!(Comparison::AtLeast.to_string(), "at least");
    }

    #[test]
    fn limit_display() {
        assert_eq!(Limit::at_most(5.0).to_string(), "at most 5");
        assert_eq!(Limit::at_least(80.0).to_string(), "at least 80");
    }

    #[test]
    fn limit_serde_roundtrip() {
        let limit = Limit::at_least(75.0);
        let json = serde_json::to_string(&limit).unwrap();
        let back: Limit = serde_json::from_str(&json).unwrap();
        assert_eq!(limit, back);
    }

    #[test]
    fn metric_check_reading_separates_names() {
        let check = MetricCheck::reading("min_tests", "total", Limit::at_least(50.0));
        assert_eq!(check.metric, "min_tests");
        assert_eq!(check.sample, "total");

        let check = MetricCheck::new("pass_rate", Limit::at_least(100.0));
        assert_eq!(check.metric, check.sample);
    }
}
