//! Pipeline options and the per-run context object.

use serde::{Deserialize, Serialize};

use crate::variables::VariableTable;

/// Tuning knobs for a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineOptions {
    /// Maximum extraction depth; subtrees beyond it become opaque
    /// truncated leaves.
    pub max_depth: usize,
    /// Minimum occurrence count for promoting an unbound literal value to
    /// a named token.
    pub promotion_threshold: usize,
    /// Mode key used when rendering multi-mode token values.
    pub mode: Option<String>,
    /// Prefix prepended to every generated class name.
    pub class_prefix: Option<String>,
    /// Process independent top-level sibling subtrees in parallel during
    /// extraction.
    pub parallel: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            max_depth: 30,
            promotion_threshold: 2,
            mode: None,
            class_prefix: None,
            parallel: false,
        }
    }
}

impl PipelineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_promotion_threshold(mut self, threshold: usize) -> Self {
        self.promotion_threshold = threshold;
        self
    }

    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = Some(mode.into());
        self
    }

    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = Some(prefix.into());
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Read-only state shared by every stage of one pipeline run.
///
/// Lookup tables live here instead of in module-level state so multiple
/// runs can execute concurrently without interference.
#[derive(Debug, Clone, Copy)]
pub struct PipelineContext<'a> {
    pub options: &'a PipelineOptions,
    pub variables: &'a VariableTable,
}

impl<'a> PipelineContext<'a> {
    pub fn new(options: &'a PipelineOptions, variables: &'a VariableTable) -> Self {
        Self { options, variables }
    }
}
