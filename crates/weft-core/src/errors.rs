//! Error types for the weft pipeline.
//!
//! Almost nothing in this pipeline is fatal: malformed fields, unsupported
//! node types, exhausted bindings, depth truncation, and emission fallbacks
//! are all recorded as [diagnostics](crate::diagnostics) while processing
//! continues. The enums here cover the few conditions that genuinely abort
//! a run.

use thiserror::Error;

/// Top-level error type for the weft pipeline.
#[derive(Debug, Error)]
pub enum WeftError {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Emit(#[from] EmitError),

    /// The host cancelled the run between stages.
    #[error("pipeline run cancelled")]
    Cancelled,
}

/// Errors during extraction. The only fatal condition in the whole
/// pipeline is invalid input at the tree root.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("design tree root is absent")]
    MissingRoot,

    #[error("design tree root cannot be interpreted: {reason}")]
    InvalidRoot { reason: String },
}

/// Errors during token collection or rendering.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("unknown render mode: {mode}")]
    UnknownMode { mode: String },

    #[error("token declaration could not be parsed at line {line}: {text}")]
    Unparseable { line: usize, text: String },
}

/// Errors during artifact emission.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}
