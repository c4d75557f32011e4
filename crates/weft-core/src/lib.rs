//! Core types and utilities for the weft transformation pipeline.
//!
//! This crate provides the foundational types used across all other weft
//! crates:
//! - The extracted node model (`ExtractedNode` and its `NodeKind` variants)
//! - Paint, stroke, effect, and geometry value types
//! - The variable table supplied alongside the design tree
//! - Error and diagnostic types
//! - Pipeline options and the per-run context object

pub mod diagnostics;
pub mod errors;
pub mod node;
pub mod options;
pub mod style;
pub mod types;
pub mod variables;

pub use diagnostics::*;
pub use errors::*;
pub use node::*;
pub use options::*;
pub use style::*;
pub use types::*;
pub use variables::*;
