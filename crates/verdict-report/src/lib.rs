//! Verdict Report -- the output data contract.
//!
//! Two renderings of one [`EvaluationResult`]: a versioned, deterministic
//! JSON document for machines and a text summary plus flat annotation lines
//! for consoles and CI systems.
//!
//! [`EvaluationResult`]: verdict_engine::EvaluationResult

pub mod console;
pub mod json;

pub use console::{annotation_lines, console_summary};
pub use json::{render_json, write_json, ReportEnvelope, SCHEMA_VERSION};

/// Errors that can occur while producing a report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Filesystem failure while writing the report.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The result could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
