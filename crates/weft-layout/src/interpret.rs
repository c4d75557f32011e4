//! The sizing decision table.

use indexmap::IndexMap;

use weft_core::{Direction, ExtractedNode, LayoutConfig, NodeId, NodeKind, Sizing};

use crate::spec::{FlexDirection, LayoutSpec, SizeValue};

/// Layout context a node inherits from its parent container.
#[derive(Debug, Clone, Copy, Default)]
pub struct SiblingContext<'a> {
    /// The parent's layout configuration, when the parent is a
    /// layout-enabled container.
    pub parent_layout: Option<&'a LayoutConfig>,
}

impl<'a> SiblingContext<'a> {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn within(parent: &'a LayoutConfig) -> Self {
        Self {
            parent_layout: Some(parent),
        }
    }
}

/// One resolved layout spec per node id.
pub type LayoutMap = IndexMap<NodeId, LayoutSpec>;

/// Resolve the layout rules for a single node.
///
/// Per-axis decision table, keyed on (axis role × declared sizing mode):
///
/// | mode  | primary axis                | counter axis          |
/// |-------|-----------------------------|-----------------------|
/// | Fixed | explicit dimension          | explicit dimension    |
/// | Hug   | intrinsic (no dimension)    | intrinsic             |
/// | Fill  | `flex-grow: 1; flex-basis: 0` | `align-self: stretch` |
///
/// The zero basis on primary-axis Fill is load-bearing: without it, flex
/// distribution depends on content size and siblings no longer share the
/// axis equally.
pub fn interpret(node: &ExtractedNode, ctx: SiblingContext<'_>) -> LayoutSpec {
    let mut spec = LayoutSpec::new(node.id.clone());

    if let Some(config) = &node.layout {
        spec.flex_container = true;
        spec.direction = Some(match config.direction {
            Direction::Horizontal => FlexDirection::Row,
            Direction::Vertical => FlexDirection::Column,
        });
        spec.wrap = config.wrap;
        spec.justify = config.primary_align;
        spec.align_items = config.counter_align;
        spec.gap = Some(config.gap);
        spec.padding = Some(config.padding);
    }

    let width = axis_dimension(node, Direction::Horizontal, &mut spec, ctx);
    let height = axis_dimension(node, Direction::Vertical, &mut spec, ctx);
    spec.width = width;
    spec.height = height;

    // Clamps layer on top of the sizing decision; they never replace it.
    spec.constraints = node.constraints;

    spec
}

/// Decide one axis. Fill is resolved against the parent's direction; with
/// no layout parent it degrades to the Fixed behavior.
fn axis_dimension(
    node: &ExtractedNode,
    axis: Direction,
    spec: &mut LayoutSpec,
    ctx: SiblingContext<'_>,
) -> Option<SizeValue> {
    let sizing = match axis {
        Direction::Horizontal => node.sizing_x,
        Direction::Vertical => node.sizing_y,
    };
    let explicit = match axis {
        Direction::Horizontal => node.geometry.width,
        Direction::Vertical => node.geometry.height,
    };

    match sizing {
        Sizing::Fixed => Some(SizeValue::Px(explicit)),
        Sizing::Hug => {
            // Containers get an explicit intrinsic-sizing rule; leaves are
            // intrinsically sized already.
            if spec.flex_container {
                Some(SizeValue::FitContent)
            } else {
                None
            }
        }
        Sizing::Fill => match ctx.parent_layout.map(|p| p.direction) {
            Some(parent_axis) if parent_axis == axis => {
                // Primary-axis growth: equal distribution requires the
                // explicit zero basis, not just the growth flag.
                spec.grow = Some(1.0);
                spec.basis = Some(0.0);
                None
            }
            Some(_) => {
                // Counter-axis stretch is a different mechanism from
                // primary-axis growth.
                spec.stretch_counter = true;
                None
            }
            None => {
                log::debug!(
                    "{}: Fill sizing outside a layout parent treated as Fixed",
                    node.id
                );
                Some(SizeValue::Px(explicit))
            }
        },
    }
}

/// Interpret every node in a subtree, document order.
pub fn interpret_all(root: &ExtractedNode) -> LayoutMap {
    let mut map = LayoutMap::new();
    walk(root, SiblingContext::root(), &mut map);
    log::debug!("layout interpreted for {} nodes", map.len());
    map
}

fn walk(node: &ExtractedNode, ctx: SiblingContext<'_>, map: &mut LayoutMap) {
    map.insert(node.id.clone(), interpret(node, ctx));

    // Vector containers and placeholders are leaves downstream; their
    // children never surface in markup.
    if matches!(
        node.kind,
        NodeKind::VectorContainer | NodeKind::Placeholder(_)
    ) {
        return;
    }

    let child_ctx = match &node.layout {
        Some(config) => SiblingContext::within(config),
        None => SiblingContext::root(),
    };
    for child in &node.children {
        walk(child, child_ctx, map);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_core::{Align, Declaration, Geometry, Padding};

    fn fixed_node(id: &str, width: f64, height: f64) -> ExtractedNode {
        let mut node = ExtractedNode::new(id, id, NodeKind::Frame);
        node.geometry = Geometry {
            x: 0.0,
            y: 0.0,
            width,
            height,
            rotation: 0.0,
        };
        node
    }

    fn vertical_container(id: &str, gap: f64) -> ExtractedNode {
        let mut node = fixed_node(id, 320.0, 200.0);
        node.layout = Some(LayoutConfig {
            gap,
            ..LayoutConfig::vertical()
        });
        node
    }

    #[test]
    fn test_fill_on_primary_axis_gets_zero_basis() {
        let container = vertical_container("c", 0.0);
        let mut child = fixed_node("child", 100.0, 50.0);
        child.sizing_y = Sizing::Fill;

        let config = container.layout.as_ref().unwrap();
        let spec = interpret(&child, SiblingContext::within(config));

        assert_eq!(spec.grow, Some(1.0));
        assert_eq!(spec.basis, Some(0.0));
        assert!(spec.height.is_none());
        assert!(!spec.stretch_counter);
    }

    #[test]
    fn test_fill_on_counter_axis_stretches() {
        let container = vertical_container("c", 0.0);
        let mut child = fixed_node("child", 100.0, 50.0);
        child.sizing_x = Sizing::Fill;

        let config = container.layout.as_ref().unwrap();
        let spec = interpret(&child, SiblingContext::within(config));

        assert!(spec.stretch_counter);
        assert_eq!(spec.grow, None);
        assert_eq!(spec.basis, None);
        assert!(spec.width.is_none());
    }

    #[test]
    fn test_fill_without_layout_parent_degrades_to_fixed() {
        let mut child = fixed_node("child", 100.0, 50.0);
        child.sizing_x = Sizing::Fill;
        let spec = interpret(&child, SiblingContext::root());
        assert_eq!(spec.width, Some(SizeValue::Px(100.0)));
        assert_eq!(spec.grow, None);
    }

    #[test]
    fn test_fixed_width_hug_height_container_scenario() {
        // A fixed-width, hug-height horizontal container with two
        // fill-width children and a gap of 8.
        let mut container = fixed_node("c", 320.0, 64.0);
        container.layout = Some(LayoutConfig {
            gap: 8.0,
            ..LayoutConfig::horizontal()
        });
        container.sizing_x = Sizing::Fixed;
        container.sizing_y = Sizing::Hug;
        for id in ["a", "b"] {
            let mut child = fixed_node(id, 100.0, 40.0);
            child.sizing_x = Sizing::Fill;
            container.children.push(child);
        }

        let map = interpret_all(&container);
        let c = &map[&NodeId::from("c")];

        // Explicit width, intrinsic height, single gap value.
        assert_eq!(c.width, Some(SizeValue::Px(320.0)));
        assert_eq!(c.height, Some(SizeValue::FitContent));
        assert!(c
            .css_declarations()
            .contains(&Declaration::new("gap", "8px")));

        // Both children grow equally from a zero basis.
        for id in ["a", "b"] {
            let child = &map[&NodeId::from(id)];
            assert_eq!(child.grow, Some(1.0));
            assert_eq!(child.basis, Some(0.0));
            let css = child.css_declarations();
            assert!(css.contains(&Declaration::new("flex-grow", "1")));
            assert!(css.contains(&Declaration::new("flex-basis", "0")));
        }
    }

    #[test]
    fn test_alignment_defaults_to_start() {
        let container = vertical_container("c", 0.0);
        let config = container.layout.as_ref().unwrap();
        let spec = interpret(&container, SiblingContext::root());
        assert_eq!(spec.justify, Align::Start);
        assert_eq!(spec.align_items, Align::Start);
        // Defaults are omitted from emission.
        let css = spec.css_declarations();
        assert!(!css.iter().any(|d| d.property == "justify-content"));
        let _ = config;
    }

    #[test]
    fn test_clamps_layer_on_top_of_sizing() {
        let mut node = fixed_node("n", 200.0, 100.0);
        node.constraints.min_width = Some(120.0);
        node.constraints.max_width = Some(480.0);
        let spec = interpret(&node, SiblingContext::root());
        // The sizing decision is untouched...
        assert_eq!(spec.width, Some(SizeValue::Px(200.0)));
        // ...and the clamps emit alongside it.
        let css = spec.css_declarations();
        assert!(css.contains(&Declaration::new("min-width", "120px")));
        assert!(css.contains(&Declaration::new("max-width", "480px")));
    }

    #[test]
    fn test_padding_carried_from_config() {
        let mut container = vertical_container("c", 0.0);
        if let Some(config) = &mut container.layout {
            config.padding = Padding::uniform(16.0);
        }
        let spec = interpret(&container, SiblingContext::root());
        assert!(spec
            .css_declarations()
            .contains(&Declaration::new("padding", "16px")));
    }
}
