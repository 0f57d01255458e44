//! Verdict Engine -- gate evaluation and verdict aggregation.
//!
//! The engine is a pure function of its inputs: an [`EvalConfig`],
//! a resolved [`ThresholdPolicy`], and a loaded [`ReportSet`] always
//! produce the same [`EvaluationResult`]. All input errors were downgraded
//! to per-gate diagnostics upstream; evaluation itself cannot fail.
//!
//! [`EvalConfig`]: verdict_core::EvalConfig
//! [`ThresholdPolicy`]: verdict_policy::ThresholdPolicy
//! [`ReportSet`]: verdict_adapters::ReportSet

pub mod eval;
pub mod gate;
pub mod verdict;

pub use eval::{
    coverage_gate, dependencies_gate, performance_gate, quality_gate, security_gate, tests_gate,
    SECURITY_TOOLS,
};
pub use gate::{GateResult, GateStatus, Violation, ViolationKind};
pub use verdict::{evaluate, EvaluationResult, OverallStatus};
