//! Recoverable problem reporting.
//!
//! Stages never abort on per-node problems. They substitute a documented
//! neutral value or placeholder, push a diagnostic, and keep going, so a
//! bad subtree never poisons its siblings.

use serde::{Deserialize, Serialize};

use crate::node::NodeId;

/// The recoverable problem taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A required field was missing or invalid; a neutral default was
    /// substituted.
    MalformedInput,
    /// A node type outside the supported set; an inert placeholder was
    /// emitted in its place.
    UnsupportedNodeType,
    /// All four steps of the variable resolution chain failed; a neutral
    /// placeholder value was used.
    ResolutionExhausted,
    /// Traversal hit the depth cap and truncated the subtree.
    DepthExceeded,
    /// The target dialect cannot represent a resolved structure exactly;
    /// the closest approximation was emitted.
    EmissionFailure,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MalformedInput => "malformed input",
            Self::UnsupportedNodeType => "unsupported node type",
            Self::ResolutionExhausted => "resolution exhausted",
            Self::DepthExceeded => "depth exceeded",
            Self::EmissionFailure => "emission fidelity loss",
        }
    }
}

/// One recorded problem, anchored to the node it occurred on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub node: NodeId,
    pub detail: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}: {}", self.kind.as_str(), self.node, self.detail)
    }
}

/// Collector for diagnostics across a pipeline run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: DiagnosticKind, node: NodeId, detail: impl Into<String>) {
        let diag = Diagnostic {
            kind,
            node,
            detail: detail.into(),
        };
        log::warn!("{}", diag);
        self.items.push(diag);
    }

    /// Merge diagnostics collected on another branch of the run.
    pub fn merge(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn count_of(&self, kind: DiagnosticKind) -> usize {
        self.items.iter().filter(|d| d.kind == kind).count()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_count() {
        let mut diags = Diagnostics::new();
        diags.push(DiagnosticKind::DepthExceeded, NodeId::from("1:1"), "depth 30");
        diags.push(
            DiagnosticKind::UnsupportedNodeType,
            NodeId::from("1:2"),
            "WIDGET",
        );
        assert_eq!(diags.len(), 2);
        assert_eq!(diags.count_of(DiagnosticKind::DepthExceeded), 1);
        assert_eq!(diags.count_of(DiagnosticKind::EmissionFailure), 0);
    }

    #[test]
    fn test_merge_keeps_order() {
        let mut a = Diagnostics::new();
        a.push(DiagnosticKind::MalformedInput, NodeId::from("a"), "x");
        let mut b = Diagnostics::new();
        b.push(DiagnosticKind::MalformedInput, NodeId::from("b"), "y");
        a.merge(b);
        let nodes: Vec<_> = a.iter().map(|d| d.node.as_str().to_string()).collect();
        assert_eq!(nodes, ["a", "b"]);
    }
}
