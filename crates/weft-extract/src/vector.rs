//! Vector-container detection.
//!
//! A frame or group whose entire subtree is vector-compatible is exported
//! as one graphic asset instead of being expanded into markup. Detection
//! runs bottom-up during extraction: by the time a container is examined,
//! qualifying child groups have already collapsed to
//! [`NodeKind::VectorContainer`], so the check short-circuits on the first
//! incompatible child.

use weft_core::{ExtractedNode, NodeKind};

/// Whether this already-extracted subtree forms a single vector unit.
///
/// True for vector leaves themselves and for grouping nodes whose children
/// all qualify. Text, instances, and placeholders never qualify.
pub fn subtree_is_vector_unit(node: &ExtractedNode) -> bool {
    match node.kind {
        NodeKind::Vector | NodeKind::VectorContainer => true,
        NodeKind::Frame | NodeKind::Group => {
            !node.children.is_empty() && node.children.iter().all(subtree_is_vector_unit)
        }
        _ => false,
    }
}

/// Collapse a grouping node into a vector container when its whole subtree
/// qualifies. Children are kept for content hashing; downstream stages
/// treat the node as a leaf.
pub(crate) fn collapse_if_vector_unit(node: &mut ExtractedNode) {
    if matches!(node.kind, NodeKind::Frame | NodeKind::Group) && subtree_is_vector_unit(node) {
        node.kind = NodeKind::VectorContainer;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_core::NodeKind;

    fn vector(id: &str) -> ExtractedNode {
        ExtractedNode::new(id, id, NodeKind::Vector)
    }

    #[test]
    fn test_group_of_vectors_is_a_unit() {
        let mut group = ExtractedNode::new("g", "icon", NodeKind::Group);
        group.children.push(vector("v1"));
        group.children.push(vector("v2"));
        assert!(subtree_is_vector_unit(&group));

        collapse_if_vector_unit(&mut group);
        assert_eq!(group.kind, NodeKind::VectorContainer);
    }

    #[test]
    fn test_text_descendant_disqualifies() {
        let mut group = ExtractedNode::new("g", "icon", NodeKind::Group);
        group.children.push(vector("v1"));
        group.children.push(ExtractedNode::new(
            "t",
            "label",
            NodeKind::Text(weft_core::TextNode {
                content: "x".to_string(),
                typography: Default::default(),
            }),
        ));
        assert!(!subtree_is_vector_unit(&group));

        collapse_if_vector_unit(&mut group);
        assert_eq!(group.kind, NodeKind::Group);
    }

    #[test]
    fn test_empty_group_is_not_a_unit() {
        let group = ExtractedNode::new("g", "empty", NodeKind::Group);
        assert!(!subtree_is_vector_unit(&group));
    }

    #[test]
    fn test_nested_collapsed_container_counts_as_compatible() {
        let mut inner = ExtractedNode::new("i", "inner", NodeKind::Group);
        inner.children.push(vector("v1"));
        collapse_if_vector_unit(&mut inner);

        let mut outer = ExtractedNode::new("o", "outer", NodeKind::Frame);
        outer.children.push(inner);
        outer.children.push(vector("v2"));
        assert!(subtree_is_vector_unit(&outer));
    }
}
