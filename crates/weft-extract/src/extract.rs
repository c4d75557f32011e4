//! The extraction walk.

use smallvec::SmallVec;

use weft_core::{
    CornerRadii, Diagnostics, DiagnosticKind, Direction, ExtractError, ExtractedNode, Geometry,
    InstanceNode, NodeId, NodeKind, PipelineContext, PlaceholderNode, SizeConstraints, TextNode,
};

use crate::convert;
use crate::raw::RawNode;
use crate::vector::collapse_if_vector_unit;

/// Node type tags that extract to [`NodeKind::Vector`].
const VECTOR_TYPES: &[&str] = &[
    "VECTOR",
    "LINE",
    "ELLIPSE",
    "POLYGON",
    "REGULAR_POLYGON",
    "STAR",
    "RECTANGLE",
    "BOOLEAN_OPERATION",
];

/// Normalize a raw design tree into the extracted intermediate form.
///
/// The only fatal condition is an uninterpretable root; every other
/// problem is recovered locally and recorded as a diagnostic.
pub fn extract(
    raw: &RawNode,
    ctx: &PipelineContext<'_>,
    diag: &mut Diagnostics,
) -> Result<ExtractedNode, ExtractError> {
    Extractor::new(ctx).run(raw, diag)
}

/// Stateless extraction walker. Construct once per run.
pub struct Extractor {
    max_depth: usize,
}

impl Extractor {
    pub fn new(ctx: &PipelineContext<'_>) -> Self {
        Self {
            max_depth: ctx.options.max_depth,
        }
    }

    pub fn run(
        &self,
        raw: &RawNode,
        diag: &mut Diagnostics,
    ) -> Result<ExtractedNode, ExtractError> {
        if raw.id.is_none() && raw.node_type.is_none() && raw.children.is_none() {
            return Err(ExtractError::MissingRoot);
        }
        if raw.node_type.is_none() {
            return Err(ExtractError::InvalidRoot {
                reason: "root node carries no type tag".to_string(),
            });
        }

        let origin = raw
            .absolute_bounding_box
            .map(|b| (b.x, b.y))
            .unwrap_or((0.0, 0.0));

        log::debug!(
            "extracting tree rooted at {:?} ({})",
            raw.id.as_deref().unwrap_or("?"),
            raw.node_type.as_deref().unwrap_or("?")
        );

        let mut root = self.node(raw, origin, 0, None, diag);
        // The root is its own reference frame.
        root.geometry.x = 0.0;
        root.geometry.y = 0.0;
        Ok(root)
    }

    /// Extract one subtree below an already-extracted root. Used by hosts
    /// that fan extraction out over independent top-level siblings.
    pub fn subtree(
        &self,
        raw: &RawNode,
        frame_origin: (f64, f64),
        parent_direction: Option<Direction>,
        diag: &mut Diagnostics,
    ) -> ExtractedNode {
        self.node(raw, frame_origin, 1, parent_direction, diag)
    }

    /// Extract one node. `frame_origin` is the absolute position of the
    /// nearest non-group ancestor frame; group children inherit it so
    /// grouping semantics disappear from the output.
    fn node(
        &self,
        raw: &RawNode,
        frame_origin: (f64, f64),
        depth: usize,
        parent_direction: Option<Direction>,
        diag: &mut Diagnostics,
    ) -> ExtractedNode {
        let id = match &raw.id {
            Some(id) => NodeId(id.clone()),
            None => {
                let id = NodeId::from("?");
                diag.push(
                    DiagnosticKind::MalformedInput,
                    id.clone(),
                    "node without id; placeholder id substituted",
                );
                id
            }
        };

        let type_tag = raw.node_type.as_deref().unwrap_or("");
        let kind = self.kind_for(type_tag, raw, &id, diag);

        let mut node = ExtractedNode::new(id.as_str(), raw.name.clone().unwrap_or_default(), kind);

        node.geometry = self.geometry(raw, frame_origin, &id, diag);
        node.layout = convert::layout(raw);
        let (sx, sy) = convert::sizing(raw, parent_direction);
        node.sizing_x = sx;
        node.sizing_y = sy;
        node.constraints = SizeConstraints {
            min_width: raw.min_width,
            max_width: raw.max_width,
            min_height: raw.min_height,
            max_height: raw.max_height,
        };

        node.fills = raw
            .fills
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter_map(|p| convert::paint(p, &id, diag))
            .collect();
        node.strokes = SmallVec::from_vec(convert::strokes(raw, &id, diag));
        node.effects = raw
            .effects
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter_map(|e| convert::effect(e, &id, diag))
            .collect();

        node.corners = match raw.rectangle_corner_radii {
            Some([tl, tr, br, bl]) => CornerRadii {
                top_left: tl,
                top_right: tr,
                bottom_right: br,
                bottom_left: bl,
            },
            None => CornerRadii::uniform(raw.corner_radius.unwrap_or(0.0)),
        };
        node.opacity = raw.opacity.unwrap_or(1.0).clamp(0.0, 1.0);
        node.blend_mode = convert::blend_mode(raw.blend_mode.as_deref());
        node.bindings = self.bindings(raw);

        // Placeholders are inert: their subtree is not expanded.
        if matches!(node.kind, NodeKind::Placeholder(_)) {
            return node;
        }

        let raw_children = raw.children.as_deref().unwrap_or_default();
        if !raw_children.is_empty() {
            if depth >= self.max_depth {
                node.truncated = true;
                diag.push(
                    DiagnosticKind::DepthExceeded,
                    id,
                    format!("subtree truncated at depth {}", self.max_depth),
                );
                return node;
            }

            let child_origin = if matches!(node.kind, NodeKind::Group) {
                frame_origin
            } else {
                raw.absolute_bounding_box
                    .map(|b| (b.x, b.y))
                    .unwrap_or(frame_origin)
            };
            let child_direction = node.layout.as_ref().map(|l| l.direction);

            node.children = raw_children
                .iter()
                .filter(|c| c.visible != Some(false))
                .map(|c| self.node(c, child_origin, depth + 1, child_direction, diag))
                .collect();
        }

        collapse_if_vector_unit(&mut node);
        node
    }

    fn kind_for(
        &self,
        type_tag: &str,
        raw: &RawNode,
        id: &NodeId,
        diag: &mut Diagnostics,
    ) -> NodeKind {
        match type_tag {
            "FRAME" | "COMPONENT" | "COMPONENT_SET" | "SECTION" => NodeKind::Frame,
            "GROUP" => NodeKind::Group,
            "TEXT" => NodeKind::Text(TextNode {
                content: raw.characters.clone().unwrap_or_default(),
                typography: convert::typography(raw.style.as_ref()),
            }),
            "INSTANCE" => NodeKind::Instance(InstanceNode {
                component: raw
                    .component_name
                    .clone()
                    .or_else(|| raw.name.clone())
                    .unwrap_or_default(),
            }),
            t if VECTOR_TYPES.contains(&t) => NodeKind::Vector,
            other => {
                diag.push(
                    DiagnosticKind::UnsupportedNodeType,
                    id.clone(),
                    format!("type {other:?} emitted as inert placeholder"),
                );
                NodeKind::Placeholder(PlaceholderNode {
                    original_type: other.to_string(),
                })
            }
        }
    }

    fn geometry(
        &self,
        raw: &RawNode,
        frame_origin: (f64, f64),
        id: &NodeId,
        diag: &mut Diagnostics,
    ) -> Geometry {
        let Some(bbox) = raw.absolute_bounding_box else {
            return Geometry::default();
        };

        let (mut width, mut height) = (bbox.width, bbox.height);
        if width < 0.0 || height < 0.0 {
            diag.push(
                DiagnosticKind::MalformedInput,
                id.clone(),
                format!("negative dimensions {}x{} clamped to zero", width, height),
            );
            width = width.max(0.0);
            height = height.max(0.0);
        }

        Geometry {
            x: bbox.x - frame_origin.0,
            y: bbox.y - frame_origin.1,
            width,
            height,
            rotation: raw.rotation.unwrap_or(0.0),
        }
    }

    fn bindings(&self, raw: &RawNode) -> weft_core::BindingMap {
        let mut map = weft_core::BindingMap::new();
        if let Some(serde_json::Value::Object(entries)) = &raw.bound_variables {
            for key in entries.keys() {
                if let Some(binding) = raw.binding_for(key) {
                    map.insert(key.clone(), binding);
                }
            }
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use weft_core::{PipelineOptions, VariableTable};

    fn run(raw: serde_json::Value) -> (Result<ExtractedNode, ExtractError>, Diagnostics) {
        let raw: RawNode = serde_json::from_value(raw).unwrap();
        let options = PipelineOptions::default();
        let variables = VariableTable::new();
        let ctx = PipelineContext::new(&options, &variables);
        let mut diags = Diagnostics::new();
        let result = extract(&raw, &ctx, &mut diags);
        (result, diags)
    }

    #[test]
    fn test_empty_root_is_fatal() {
        let (result, _) = run(json!({}));
        assert!(matches!(result, Err(ExtractError::MissingRoot)));
    }

    #[test]
    fn test_typeless_root_is_fatal() {
        let (result, _) = run(json!({ "id": "0:0" }));
        assert!(matches!(result, Err(ExtractError::InvalidRoot { .. })));
    }

    #[test]
    fn test_unknown_type_becomes_placeholder() {
        let (result, diags) = run(json!({
            "id": "0:0",
            "type": "FRAME",
            "children": [
                { "id": "1:0", "name": "Widget", "type": "EMBED",
                  "children": [{ "id": "2:0", "type": "TEXT" }] }
            ]
        }));
        let root = result.unwrap();
        let child = &root.children[0];
        assert!(matches!(
            &child.kind,
            NodeKind::Placeholder(p) if p.original_type == "EMBED"
        ));
        // Inert: the placeholder's subtree is not expanded.
        assert!(child.children.is_empty());
        assert_eq!(child.name, "Widget");
        assert_eq!(diags.count_of(DiagnosticKind::UnsupportedNodeType), 1);
    }

    #[test]
    fn test_group_children_are_frame_relative() {
        let (result, _) = run(json!({
            "id": "0:0",
            "type": "FRAME",
            "absoluteBoundingBox": { "x": 100.0, "y": 100.0, "width": 400.0, "height": 300.0 },
            "children": [
                { "id": "g", "type": "GROUP",
                  "absoluteBoundingBox": { "x": 150.0, "y": 120.0, "width": 50.0, "height": 50.0 },
                  "children": [
                      { "id": "t", "type": "TEXT",
                        "absoluteBoundingBox": { "x": 160.0, "y": 130.0, "width": 30.0, "height": 20.0 } }
                  ] }
            ]
        }));
        let root = result.unwrap();
        let group = &root.children[0];
        let text = &group.children[0];
        // The group itself is frame-relative...
        assert_eq!((group.geometry.x, group.geometry.y), (50.0, 20.0));
        // ...and so is its child: relative to the frame, not the group.
        assert_eq!((text.geometry.x, text.geometry.y), (60.0, 30.0));
    }

    #[test]
    fn test_frame_children_are_relative_to_that_frame() {
        let (result, _) = run(json!({
            "id": "0:0",
            "type": "FRAME",
            "absoluteBoundingBox": { "x": 100.0, "y": 100.0, "width": 400.0, "height": 300.0 },
            "children": [
                { "id": "f", "type": "FRAME",
                  "absoluteBoundingBox": { "x": 150.0, "y": 150.0, "width": 100.0, "height": 100.0 },
                  "children": [
                      { "id": "v", "type": "RECTANGLE",
                        "absoluteBoundingBox": { "x": 170.0, "y": 160.0, "width": 10.0, "height": 10.0 } }
                  ] }
            ]
        }));
        let root = result.unwrap();
        let inner = &root.children[0];
        let rect = &inner.children[0];
        assert_eq!((rect.geometry.x, rect.geometry.y), (20.0, 10.0));
    }

    #[test]
    fn test_depth_cap_truncates_with_flag() {
        // Build a 6-deep chain and cap at 3.
        let mut tree = json!({ "id": "leaf", "type": "RECTANGLE" });
        for i in (0..6).rev() {
            tree = json!({
                "id": format!("n{}", i),
                "type": "FRAME",
                "children": [tree]
            });
        }
        let raw: RawNode = serde_json::from_value(tree).unwrap();
        let options = PipelineOptions::default().with_max_depth(3);
        let variables = VariableTable::new();
        let ctx = PipelineContext::new(&options, &variables);
        let mut diags = Diagnostics::new();
        let root = extract(&raw, &ctx, &mut diags).unwrap();

        let mut node = &root;
        let mut depth = 0;
        while !node.children.is_empty() {
            node = &node.children[0];
            depth += 1;
        }
        assert_eq!(depth, 3);
        assert!(node.truncated);
        assert_eq!(diags.count_of(DiagnosticKind::DepthExceeded), 1);
    }

    #[test]
    fn test_icon_frame_collapses_to_vector_container() {
        let (result, _) = run(json!({
            "id": "0:0",
            "type": "FRAME",
            "children": [
                { "id": "icon", "name": "Icon/Check", "type": "FRAME",
                  "children": [
                      { "id": "p1", "type": "VECTOR" },
                      { "id": "p2", "type": "BOOLEAN_OPERATION" }
                  ] },
                { "id": "label", "type": "TEXT", "characters": "Done" }
            ]
        }));
        let root = result.unwrap();
        assert_eq!(root.children[0].kind, NodeKind::VectorContainer);
        // The root itself contains text, so it stays a frame.
        assert_eq!(root.kind, NodeKind::Frame);
    }

    #[test]
    fn test_invisible_children_are_skipped() {
        let (result, diags) = run(json!({
            "id": "0:0",
            "type": "FRAME",
            "children": [
                { "id": "a", "type": "TEXT", "visible": false },
                { "id": "b", "type": "TEXT" }
            ]
        }));
        let root = result.unwrap();
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].id.as_str(), "b");
        assert!(diags.is_empty());
    }

    #[test]
    fn test_node_level_bindings_are_collected() {
        let (result, _) = run(json!({
            "id": "0:0",
            "type": "FRAME",
            "layoutMode": "VERTICAL",
            "itemSpacing": 12.0,
            "boundVariables": {
                "itemSpacing": { "type": "VARIABLE_ALIAS", "id": "var:gap-md" }
            }
        }));
        let root = result.unwrap();
        assert_eq!(
            root.bindings.get("itemSpacing").map(|b| b.as_str()),
            Some("var:gap-md")
        );
    }
}
