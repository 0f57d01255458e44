//! Console and CI-annotation rendering.
//!
//! The console summary is a fixed-layout text block; annotation lines are
//! one flat line per violation in discovery order, suitable for CI systems
//! that surface per-line annotations.

use std::fmt::Write as _;

use verdict_core::GateName;
use verdict_engine::{EvaluationResult, GateStatus};

const RULE: &str = "==================================================";

/// Renders the human-readable evaluation summary.
#[must_use]
pub fn console_summary(result: &EvaluationResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "QUALITY GATE EVALUATION");
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "Build:   {}", result.build);
    let _ = writeln!(out, "Branch:  {}", result.branch);
    let _ = writeln!(
        out,
        "Verdict: {}",
        if result.passed { "PASSED" } else { "FAILED" }
    );
    let _ = writeln!(out, "Status:  {}", result.overall_status);
    if result.overridden {
        let _ = writeln!(out, "WARNING: quality-gate override is enabled");
    }

    for &name in GateName::all() {
        let Some(gate) = result.gates.get(&name) else {
            continue;
        };
        let marker = match gate.status {
            GateStatus::Passed => "PASS",
            GateStatus::Failed => "FAIL",
            GateStatus::NotEvaluated => "SKIP",
        };
        let _ = writeln!(out, "  [{marker}] {name}");
        for violation in &gate.violations {
            let _ = writeln!(out, "        ! {violation}");
        }
        for diagnostic in &gate.diagnostics {
            let _ = writeln!(out, "        ? {diagnostic}");
        }
    }

    if !result.violations.is_empty() {
        let _ = writeln!(out, "{RULE}");
        let _ = writeln!(out, "VIOLATIONS ({})", result.violations.len());
        for (index, violation) in result.violations.iter().enumerate() {
            let _ = writeln!(out, "{}. {violation}", index + 1);
        }
    }
    let _ = writeln!(out, "{RULE}");
    out
}

/// One annotation line per violation, in discovery order.
#[must_use]
pub fn annotation_lines(result: &EvaluationResult) -> Vec<String> {
    result
        .violations
        .iter()
        .map(|violation| format!("{}: {}", violation.gate, violation.message))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use verdict_adapters::{Normalized, ReportInput, ReportSet};
    use verdict_core::{Category, EvalConfig, Finding, Severity, ToolId};
    use verdict_engine::evaluate;
    use verdict_policy::builtin_policy;

    fn failing_result() -> EvaluationResult {
        let finding = Finding::new(
            ToolId::Snyk,
            Category::Security,
            Severity::Critical,
            "critical",
            "CVE-2024-0001",
        );
        let reports = ReportSet::from_inputs([(
            ToolId::Snyk,
            ReportInput::Parsed(Normalized::findings(vec![finding])),
        )]);
        evaluate(&EvalConfig::default(), &builtin_policy(), &reports)
    }

    #[test]
    fn summary_shows_verdict_and_gates() {
        let summary = console_summary(&failing_result());
        assert!(summary.contains("Verdict: FAILED"));
        assert!(summary.contains("Status:  CRITICAL"));
        assert!(summary.contains("[FAIL] security"));
        assert!(summary.contains("[SKIP] coverage"));
        assert!(summary.contains("VIOLATIONS (1)"));
    }

    #[test]
    fn summary_flags_override() {
        let mut result = failing_result();
        result.overridden = true;
        let summary = console_summary(&result);
        assert!(summary.contains("override is enabled"));
    }

    #[test]
    fn annotations_follow_discovery_order() {
        let lines = annotation_lines(&failing_result());
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("security: "));
        assert!(lines[0].contains("CVE") || lines[0].contains("critical"));
    }

    #[test]
    fn clean_run_has_no_annotations() {
        let result = evaluate(
            &EvalConfig::default(),
            &builtin_policy(),
            &ReportSet::from_inputs([]),
        );
        assert!(annotation_lines(&result).is_empty());
        let summary = console_summary(&result);
        assert!(summary.contains("Verdict: PASSED"));
        assert!(!summary.contains("VIOLATIONS"));
    }
}
