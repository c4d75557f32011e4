//! weft: a deterministic design-tree → front-end code transformation
//! pipeline.
//!
//! The pipeline is a strict sequential state machine over an immutable
//! input tree:
//!
//! ```text
//! raw tree ──▶ Extract ──▶ Layout ──▶ Tokens (whole-tree) ──▶ Visual
//!                                                               │
//!        manifest + styles + markup ◀── Emit ◀── Semantics ◀────┘
//! ```
//!
//! No state is revisited; no stage mutates another stage's output. The
//! token collection pass is the one whole-tree aggregation point and runs
//! before values are finalized, so the visual resolver can consume
//! promoted tokens. Per-node problems degrade to diagnostics; the only
//! fatal inputs are an absent or typeless root.
//!
//! # Example
//!
//! ```ignore
//! use weft::{Pipeline, PipelineOptions, RawNode};
//!
//! let raw: RawNode = serde_json::from_str(tree_json)?;
//! let output = Pipeline::new(PipelineOptions::default()).run(&raw)?;
//!
//! println!("{}", output.artifacts.markup);
//! for sheet in &output.artifacts.styles {
//!     println!("/* {} */\n{}", sheet.name, sheet.content);
//! }
//! ```

mod cancel;
mod pipeline;

pub use cancel::CancelFlag;
pub use pipeline::{Pipeline, PipelineOutput};

pub use weft_core::{
    Diagnostic, DiagnosticKind, Diagnostics, ExtractedNode, NodeId, NodeKind, PipelineOptions,
    Variable, VariableTable, VariableValue, WeftError,
};
pub use weft_emit::{Artifacts, CssLevel, MarkupDialect, TargetFormat};
pub use weft_extract::RawNode;
pub use weft_layout::{BreakpointMatcher, NameSuffixMatcher};
pub use weft_semantic::GeneratedElement;
pub use weft_tokens::{TokenBinding, TokenCategory, TokenSet};
