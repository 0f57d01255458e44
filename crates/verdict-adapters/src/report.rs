//! Report-set loading.
//!
//! One evaluation run reads every configured report path exactly once and
//! records, per tool, one of three outcomes: the file was absent, it parsed
//! and normalized, or it was malformed. The distinction matters downstream:
//! absence can skip a gate, malformation never can.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, warn};

use verdict_core::{EvalConfig, ToolId};

use crate::{normalize, AdapterError, Normalized};

// ---------------------------------------------------------------------------
// ReportInput
// ---------------------------------------------------------------------------

/// Outcome of loading one tool's report.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportInput {
    /// No file at the configured path.
    Absent,
    /// The report parsed and normalized.
    Parsed(Normalized),
    /// The report exists but could not be used; carries the diagnostic.
    Malformed(String),
}

impl ReportInput {
    /// Returns the normalized content, if any.
    #[must_use]
    pub fn normalized(&self) -> Option<&Normalized> {
        match self {
            Self::Parsed(normalized) => Some(normalized),
            Self::Absent | Self::Malformed(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// ReportSet
// ---------------------------------------------------------------------------

/// All report inputs for one evaluation run, keyed by tool.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportSet {
    inputs: BTreeMap<ToolId, ReportInput>,
}

impl ReportSet {
    /// Loads every configured report path.
    ///
    /// Loading never fails as a whole: each tool resolves independently to
    /// [`ReportInput::Absent`], [`ReportInput::Parsed`], or
    /// [`ReportInput::Malformed`].
    #[must_use]
    pub fn load(config: &EvalConfig) -> Self {
        let mut set = Self::default();
        for &tool in ToolId::all() {
            let input = match config.report_path(tool) {
                Some(path) => load_one(tool, path),
                None => ReportInput::Absent,
            };
            set.inputs.insert(tool, input);
        }
        set
    }

    /// Returns the input for a tool. Tools never loaded are absent.
    #[must_use]
    pub fn get(&self, tool: ToolId) -> &ReportInput {
        static ABSENT: ReportInput = ReportInput::Absent;
        self.inputs.get(&tool).unwrap_or(&ABSENT)
    }

    /// Records an input directly, bypassing the filesystem.
    pub fn insert(&mut self, tool: ToolId, input: ReportInput) {
        self.inputs.insert(tool, input);
    }

    /// Builds a set from explicit inputs, for in-memory evaluation.
    #[must_use]
    pub fn from_inputs(inputs: impl IntoIterator<Item = (ToolId, ReportInput)>) -> Self {
        Self {
            inputs: inputs.into_iter().collect(),
        }
    }
}

fn load_one(tool: ToolId, path: &Path) -> ReportInput {
    if !path.exists() {
        debug!(%tool, path = %path.display(), "report absent");
        return ReportInput::Absent;
    }

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(source) => {
            let err = AdapterError::Io {
                tool,
                path: path.to_path_buf(),
                source,
            };
            warn!(%tool, "report unreadable: {err}");
            return ReportInput::Malformed(err.to_string());
        }
    };

    let value: serde_json::Value = match serde_json::from_str(&content) {
        Ok(value) => value,
        Err(source) => {
            let err = AdapterError::Parse {
                tool,
                path: path.to_path_buf(),
                source,
            };
            warn!(%tool, "report malformed: {err}");
            return ReportInput::Malformed(err.to_string());
        }
    };

    match normalize(tool, &value) {
        Ok(normalized) => {
            debug!(
                %tool,
                findings = normalized.findings.len(),
                metrics = normalized.metrics.len(),
                "report normalized"
            );
            ReportInput::Parsed(normalized)
        }
        Err(err) => {
            warn!(%tool, "report rejected: {err}");
            ReportInput::Malformed(err.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
