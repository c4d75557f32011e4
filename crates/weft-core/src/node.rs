//! The extracted node model.
//!
//! `ExtractedNode` is the flat, JSON-serializable intermediate form produced
//! by the extractor. It is owned by the extraction stage and consumed
//! read-only by every stage after it. Node categories are a closed tagged
//! variant rather than the loosely-typed optional-field bags the source
//! format uses, so downstream consumers never probe for field existence.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::types::{BlendMode, CornerRadii, Effect, Paint, Stroke, Typography};
use crate::variables::BindingRef;

/// Identifier of a node, as assigned by the design source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId(s.to_string())
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Frame-relative geometry of a node.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Rotation in degrees, clockwise.
    pub rotation: f64,
}

/// Layout direction of an auto-layout container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Horizontal,
    Vertical,
}

/// Alignment along an axis. `SpaceBetween` is only meaningful on the
/// primary axis; the counter axis ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    #[default]
    Start,
    Center,
    End,
    SpaceBetween,
}

/// Per-axis sizing policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sizing {
    /// Explicit dimension carried through unchanged.
    Fixed,
    /// Intrinsic sizing; content determines the dimension.
    Hug,
    /// Grow into the parent along its primary axis, or stretch on the
    /// counter axis.
    Fill,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Padding {
    pub fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.top == 0.0 && self.right == 0.0 && self.bottom == 0.0 && self.left == 0.0
    }
}

/// Declared layout configuration of a layout-enabled container.
///
/// Per-axis sizing lives on [`ExtractedNode`] itself, since leaf children
/// carry Fill/Hug declarations too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub direction: Direction,
    pub gap: f64,
    pub padding: Padding,
    pub primary_align: Align,
    pub counter_align: Align,
    pub wrap: bool,
}

impl LayoutConfig {
    /// A vertical stack with neutral defaults.
    pub fn vertical() -> Self {
        Self {
            direction: Direction::Vertical,
            gap: 0.0,
            padding: Padding::default(),
            primary_align: Align::Start,
            counter_align: Align::Start,
            wrap: false,
        }
    }

    pub fn horizontal() -> Self {
        Self {
            direction: Direction::Horizontal,
            ..Self::vertical()
        }
    }
}

/// Min/max dimension clamps. These layer on top of the sizing decision,
/// never replace it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SizeConstraints {
    pub min_width: Option<f64>,
    pub max_width: Option<f64>,
    pub min_height: Option<f64>,
    pub max_height: Option<f64>,
}

impl SizeConstraints {
    pub fn is_empty(&self) -> bool {
        self.min_width.is_none()
            && self.max_width.is_none()
            && self.min_height.is_none()
            && self.max_height.is_none()
    }
}

/// Payload of a text node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextNode {
    pub content: String,
    pub typography: Typography,
}

/// Payload of a component instance node.
///
/// The master is referenced by name, never by direct aliasing, so the tree
/// stays acyclic and serializable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceNode {
    pub component: String,
}

/// Payload of an inert placeholder standing in for an unsupported node type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceholderNode {
    /// The original type tag, kept so downstream consumers can locate and
    /// manually resolve the node.
    pub original_type: String,
}

/// Node category. A closed set; anything outside it extracts to
/// [`NodeKind::Placeholder`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    Frame,
    Group,
    Text(TextNode),
    Vector,
    Instance(InstanceNode),
    /// A subtree composed entirely of vector-compatible nodes, exported as a
    /// single graphic asset rather than expanded into markup.
    VectorContainer,
    Placeholder(PlaceholderNode),
}

impl NodeKind {
    /// Whether a node of this kind may belong to a vector container.
    pub fn is_vector_compatible(&self) -> bool {
        matches!(self, NodeKind::Vector | NodeKind::VectorContainer)
    }
}

/// Map from property name to the variable binding attached to it.
pub type BindingMap = IndexMap<String, BindingRef>;

/// A node of the extracted intermediate tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedNode {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
    pub geometry: Geometry,
    /// Present only on layout-enabled containers.
    pub layout: Option<LayoutConfig>,
    /// Declared horizontal sizing policy.
    pub sizing_x: Sizing,
    /// Declared vertical sizing policy.
    pub sizing_y: Sizing,
    pub constraints: SizeConstraints,
    /// Fills in source paint order (bottom-to-top).
    pub fills: SmallVec<[Paint; 2]>,
    /// Strokes in source paint order.
    pub strokes: SmallVec<[Stroke; 1]>,
    /// Effects in declaration order.
    pub effects: SmallVec<[Effect; 2]>,
    pub corners: CornerRadii,
    pub opacity: f64,
    pub blend_mode: BlendMode,
    /// Node-level property bindings (property name → binding reference).
    pub bindings: BindingMap,
    pub children: Vec<ExtractedNode>,
    /// Set when the depth cap truncated this subtree.
    pub truncated: bool,
}

impl ExtractedNode {
    /// Create a node with type-appropriate neutral values everywhere.
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: NodeId(id.into()),
            name: name.into(),
            kind,
            geometry: Geometry::default(),
            layout: None,
            sizing_x: Sizing::Fixed,
            sizing_y: Sizing::Fixed,
            constraints: SizeConstraints::default(),
            fills: SmallVec::new(),
            strokes: SmallVec::new(),
            effects: SmallVec::new(),
            corners: CornerRadii::default(),
            opacity: 1.0,
            blend_mode: BlendMode::Normal,
            bindings: BindingMap::new(),
            children: Vec::new(),
            truncated: false,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text(_))
    }

    /// Depth-first iterator over this node and all descendants.
    pub fn walk(&self) -> Walk<'_> {
        Walk { stack: vec![self] }
    }

    /// Count of nodes in this subtree, including self.
    pub fn subtree_len(&self) -> usize {
        self.walk().count()
    }
}

/// Depth-first traversal over an extracted subtree.
pub struct Walk<'a> {
    stack: Vec<&'a ExtractedNode>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a ExtractedNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Push in reverse so children come out in document order.
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_node_has_neutral_defaults() {
        let node = ExtractedNode::new("1:1", "Frame", NodeKind::Frame);
        assert!(node.fills.is_empty());
        assert!(node.layout.is_none());
        assert_eq!(node.opacity, 1.0);
        assert_eq!(node.blend_mode, BlendMode::Normal);
        assert!(!node.truncated);
    }

    #[test]
    fn test_walk_is_document_order() {
        let mut root = ExtractedNode::new("0", "root", NodeKind::Frame);
        let mut a = ExtractedNode::new("1", "a", NodeKind::Frame);
        a.children.push(ExtractedNode::new("2", "a1", NodeKind::Vector));
        root.children.push(a);
        root.children.push(ExtractedNode::new("3", "b", NodeKind::Vector));

        let order: Vec<_> = root.walk().map(|n| n.id.as_str().to_string()).collect();
        assert_eq!(order, ["0", "1", "2", "3"]);
    }

    #[test]
    fn test_serializable_round_trip() {
        let node = ExtractedNode::new(
            "1:2",
            "Title",
            NodeKind::Text(TextNode {
                content: "Hello".to_string(),
                typography: Typography::default(),
            }),
        );
        let json = serde_json::to_string(&node).unwrap();
        let back: ExtractedNode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, node);
    }
}
