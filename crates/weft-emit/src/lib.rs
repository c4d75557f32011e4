//! Artifact emission.
//!
//! Pure assembly: everything here serializes already-resolved structures
//! into the requested target dialect. The one permitted judgment call is
//! the fidelity fallback: when a dialect cannot represent a resolved
//! structure exactly, the closest representation is emitted and the loss
//! recorded as a diagnostic, never an error.

mod emit;
mod manifest;
mod markup;
mod styles;

pub use emit::{emit, Artifacts, CssLevel, MarkupDialect, StylesheetArtifact, TargetFormat};
pub use manifest::{AssetEntry, AssetKind, AssetManifest};
pub use markup::render_markup;
pub use styles::render_layers;
