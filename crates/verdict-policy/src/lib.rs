//! Verdict Policy -- threshold configuration for gate evaluation.
//!
//! A [`ThresholdPolicy`] defines the numeric limits each gate compares its
//! observations against. The built-in defaults can be partially overridden
//! by a JSON document; override entries replace only the keys they specify
//! (shallow merge per category), never erasing unspecified defaults.

pub mod limit;
pub mod policy;

pub use limit::{Comparison, Limit, MetricCheck};
pub use policy::{
    builtin_policy, load_policy, load_policy_from_str, resolve_policy, CoverageThresholds,
    DependencyThresholds, PerformanceThresholds, PolicyError, QualityThresholds,
    SecurityThresholds, TestThresholds, ThresholdPolicy,
};
