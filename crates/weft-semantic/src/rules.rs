//! The three stylesheet layers.

use serde::{Deserialize, Serialize};

use weft_core::{Declaration, NodeId};
use weft_visual::SourcedDeclaration;

/// A single-declaration utility class definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtilityClass {
    pub name: String,
    pub declaration: Declaration,
}

/// A scoped rule: one class selector plus its declarations, optionally
/// behind a min-width condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleRule {
    /// Class name, without the leading dot.
    pub selector: String,
    pub node: NodeId,
    pub declarations: Vec<SourcedDeclaration>,
    pub min_width: Option<f64>,
}

/// Stylesheet output, partitioned by routing decision:
///
/// - `utility`: definitions of the layout utility classes referenced from
///   element class lists.
/// - `tokens`: rules whose values are consumed through token names
///   (`var(--…)`), kept next to the custom-property declarations.
/// - `component`: everything node-specific, including responsive
///   overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StyleLayers {
    pub utility: Vec<UtilityClass>,
    pub tokens: Vec<StyleRule>,
    pub component: Vec<StyleRule>,
}

impl StyleLayers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a utility class, deduplicating by name.
    pub fn add_utility(&mut self, name: String, declaration: Declaration) {
        if !self.utility.iter().any(|u| u.name == name) {
            self.utility.push(UtilityClass { name, declaration });
        }
    }
}
