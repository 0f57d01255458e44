//! Versioned JSON report envelope.
//!
//! The envelope wraps an [`EvaluationResult`] with an explicit schema
//! version so downstream consumers can detect contract changes.
//! Serialization is deterministic: map keys are ordered, the timestamp is
//! optional and off by default, and identical inputs produce byte-identical
//! documents.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use verdict_engine::EvaluationResult;

use crate::ReportError;

/// Current report schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// The on-disk report document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEnvelope {
    /// Contract version of this document.
    pub schema_version: u32,
    /// The evaluation outcome.
    #[serde(flatten)]
    pub result: EvaluationResult,
}

impl ReportEnvelope {
    /// Wraps a result in the current schema version.
    #[must_use]
    pub fn new(result: EvaluationResult) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            result,
        }
    }
}

/// Renders the report as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`ReportError::Serialization`] if the result cannot be encoded.
pub fn render_json(result: &EvaluationResult) -> Result<String, ReportError> {
    let envelope = ReportEnvelope::new(result.clone());
    Ok(serde_json::to_string_pretty(&envelope)?)
}

/// Writes the JSON report to a file, creating parent directories.
///
/// # Errors
///
/// Returns [`ReportError::Io`] on filesystem failure or
/// [`ReportError::Serialization`] if the result cannot be encoded.
pub fn write_json(path: &Path, result: &EvaluationResult) -> Result<(), ReportError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = render_json(result)?;
    std::fs::write(path, json)?;
    info!(path = %path.display(), "report written");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
