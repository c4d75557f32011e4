//! Semantic generation: tags, classes, accessibility, and style routing.
//!
//! Consumes the layout, visual, and token outputs for an extracted tree
//! and produces the element tree the emitter serializes:
//!
//! - Tag selection is a top-down decision tree: explicit naming
//!   conventions beat interactive-affordance heuristics beat landmark
//!   detection, with a generic container as the fallback.
//! - Class names follow flat BEM: `block` and `block__element`, never a
//!   third level; deeper structure flattens into sibling element
//!   classes.
//! - Accessibility attributes come from a fixed checklist evaluated
//!   independently of tag choice.
//! - Style declarations are routed across three layers: pure layout to
//!   utility classes, token-referencing values to the custom-property
//!   layer, and the remaining node-specific declarations to a scoped
//!   component layer.

mod a11y;
mod assign;
mod classes;
mod element;
mod rules;
mod tags;

pub use assign::{assign_semantics, SemanticOutput};
pub use classes::ClassNamer;
pub use element::GeneratedElement;
pub use rules::{StyleLayers, StyleRule, UtilityClass};
pub use tags::{detect_tag, TagChoice};
