//! The semantic traversal.

use std::hash::{Hash, Hasher};

use rustc_hash::{FxHashMap, FxHashSet};

use weft_core::{
    format_px, Align, Declaration, ExtractedNode, NodeId, NodeKind, PipelineContext,
};
use weft_layout::{FlexDirection, LayoutMap, LayoutSpec, ResponsiveRules, SizeValue};
use weft_tokens::TokenSet;
use weft_visual::{Provenance, SourcedDeclaration, StyleValue, VisualMap};

use crate::a11y;
use crate::classes::ClassNamer;
use crate::element::GeneratedElement;
use crate::rules::{StyleLayers, StyleRule};
use crate::tags::{detect_tag, TagChoice};

/// Result of semantic generation: the element tree plus the partitioned
/// stylesheet layers.
#[derive(Debug, Clone)]
pub struct SemanticOutput {
    pub root: GeneratedElement,
    pub layers: StyleLayers,
}

/// Generate the element tree for an extracted tree, consuming the
/// layout, visual, and token outputs.
pub fn assign_semantics(
    root: &ExtractedNode,
    layouts: &LayoutMap,
    visuals: &VisualMap,
    tokens: &TokenSet,
    responsive: &[ResponsiveRules],
    ctx: &PipelineContext<'_>,
) -> SemanticOutput {
    let mut suppressed = FxHashSet::default();
    for family in responsive {
        for variant in &family.variants {
            suppressed.insert(variant.clone());
        }
    }

    let mut generator = Generator {
        layouts,
        visuals,
        tokens,
        namer: ClassNamer::new(ctx.options.class_prefix.as_deref()),
        layers: StyleLayers::new(),
        class_of: FxHashMap::default(),
        suppressed,
        used_h1: false,
    };

    let root_element = generator.element(root, None, 0, None);

    // Responsive overrides attach to the base member's selector, sorted
    // ascending by their min-width condition.
    for family in responsive {
        let Some(selector) = generator.class_of.get(&family.base).cloned() else {
            continue;
        };
        for over in &family.overrides {
            let Some(spec) = layouts.get(&over.node) else {
                continue;
            };
            let declarations = spec
                .declarations_for(&over.fields)
                .into_iter()
                .map(|d| SourcedDeclaration {
                    property: d.property,
                    value: StyleValue::Text(d.value),
                    provenance: Provenance::Raw,
                })
                .collect::<Vec<_>>();
            if declarations.is_empty() {
                continue;
            }
            generator.layers.component.push(StyleRule {
                selector: selector.clone(),
                node: over.node.clone(),
                declarations,
                min_width: Some(over.min_width),
            });
        }
    }

    log::debug!(
        "semantics assigned: {} utility class(es), {} token rule(s), {} component rule(s)",
        generator.layers.utility.len(),
        generator.layers.tokens.len(),
        generator.layers.component.len()
    );

    SemanticOutput {
        root: root_element,
        layers: generator.layers,
    }
}

struct Generator<'a> {
    layouts: &'a LayoutMap,
    visuals: &'a VisualMap,
    tokens: &'a TokenSet,
    namer: ClassNamer,
    layers: StyleLayers,
    class_of: FxHashMap<NodeId, String>,
    suppressed: FxHashSet<NodeId>,
    used_h1: bool,
}

impl<'a> Generator<'a> {
    /// Build one element. `block` is the current BEM block class;
    /// `heading_level` the deepest heading level among ancestors;
    /// `position` is `(index, sibling_count)` for top-level landmark
    /// detection.
    fn element(
        &mut self,
        node: &ExtractedNode,
        block: Option<&str>,
        heading_level: u8,
        position: Option<(usize, usize)>,
    ) -> GeneratedElement {
        let (index, count) = position.unwrap_or((0, 1));
        let is_top_level = position.is_some();

        let (tag, next_heading_level) = match detect_tag(node, is_top_level, index, count) {
            TagChoice::Tag(tag) => (tag.to_string(), heading_level),
            TagChoice::Heading => {
                let mut level = (heading_level + 1).min(6);
                if level == 1 && self.used_h1 {
                    // One top-level heading per page unless structure says
                    // otherwise.
                    level = 2;
                }
                if level == 1 {
                    self.used_h1 = true;
                }
                (format!("h{level}"), level)
            }
        };

        let mut element = GeneratedElement::new(node.id.clone(), tag);

        // Flat BEM: new blocks at the root, at top-level frames, and at
        // component instances; everything below flattens into
        // `block__element` siblings, never a third level.
        let starts_block =
            block.is_none() || is_top_level || matches!(node.kind, NodeKind::Instance(_));
        let class = if starts_block {
            self.namer.block(&node.name)
        } else {
            self.namer.element(block.unwrap_or("node"), &node.name)
        };
        self.class_of.insert(node.id.clone(), class.clone());
        element.classes.push(class.clone());

        match &node.kind {
            NodeKind::Text(text) => element.text = Some(text.content.clone()),
            NodeKind::VectorContainer => {
                element.set_attr("src", format!("assets/{}.svg", asset_fingerprint(node)));
            }
            NodeKind::Placeholder(placeholder) => {
                element.set_attr("data-unsupported", placeholder.original_type.clone());
                if !node.name.is_empty() {
                    element.set_attr("data-name", node.name.clone());
                }
            }
            _ => {}
        }

        // Layout routing: pure layout becomes utility classes; a
        // token-bound gap is consumed through its token instead.
        if let Some(spec) = self.layouts.get(&node.id).cloned() {
            let utilities = self.layout_classes(node, &spec, &class);
            element.classes.extend(utilities);
        }

        // Visual routing by provenance.
        if let Some(visual) = self.visuals.get(&node.id) {
            let (token_decls, component_decls): (Vec<_>, Vec<_>) = visual
                .declarations()
                .into_iter()
                .partition(|d| d.provenance.is_token());
            if !token_decls.is_empty() {
                self.layers.tokens.push(StyleRule {
                    selector: class.clone(),
                    node: node.id.clone(),
                    declarations: token_decls,
                    min_width: None,
                });
            }
            if !component_decls.is_empty() {
                self.layers.component.push(StyleRule {
                    selector: class.clone(),
                    node: node.id.clone(),
                    declarations: component_decls,
                    min_width: None,
                });
            }
        }

        a11y::apply_checklist(&mut element, node);

        // Vector containers and placeholders are leaves in markup.
        if !matches!(
            node.kind,
            NodeKind::VectorContainer | NodeKind::Placeholder(_)
        ) {
            let child_block = if starts_block {
                class.clone()
            } else {
                block.unwrap_or(&class).to_string()
            };
            let visible: Vec<_> = node
                .children
                .iter()
                .filter(|c| !self.suppressed.contains(&c.id))
                .collect();
            let child_count = visible.len();
            for (child_index, child) in visible.into_iter().enumerate() {
                let child_position = if block.is_none() {
                    Some((child_index, child_count))
                } else {
                    None
                };
                let child_element = self.element(
                    child,
                    Some(&child_block),
                    next_heading_level,
                    child_position,
                );
                element.children.push(child_element);
            }
        }

        element
    }

    /// Map a layout spec onto utility classes, registering each utility's
    /// definition. Token-bound values route to the token layer instead.
    fn layout_classes(
        &mut self,
        node: &ExtractedNode,
        spec: &LayoutSpec,
        selector: &str,
    ) -> Vec<String> {
        let mut classes = Vec::new();
        let mut add = |layers: &mut StyleLayers, name: String, property: &str, value: String| {
            layers.add_utility(name.clone(), Declaration::new(property, value));
            classes.push(name);
        };

        if spec.flex_container {
            add(&mut self.layers, "flex".into(), "display", "flex".into());
            if let Some(direction) = spec.direction {
                match direction {
                    FlexDirection::Row => add(
                        &mut self.layers,
                        "flex-row".into(),
                        "flex-direction",
                        "row".into(),
                    ),
                    FlexDirection::Column => add(
                        &mut self.layers,
                        "flex-col".into(),
                        "flex-direction",
                        "column".into(),
                    ),
                }
            }
            if spec.wrap {
                add(
                    &mut self.layers,
                    "flex-wrap".into(),
                    "flex-wrap",
                    "wrap".into(),
                );
            }
            match spec.justify {
                Align::Start => {}
                Align::Center => add(
                    &mut self.layers,
                    "justify-center".into(),
                    "justify-content",
                    "center".into(),
                ),
                Align::End => add(
                    &mut self.layers,
                    "justify-end".into(),
                    "justify-content",
                    "flex-end".into(),
                ),
                Align::SpaceBetween => add(
                    &mut self.layers,
                    "justify-between".into(),
                    "justify-content",
                    "space-between".into(),
                ),
            }
            match spec.align_items {
                Align::Center => add(
                    &mut self.layers,
                    "items-center".into(),
                    "align-items",
                    "center".into(),
                ),
                Align::End => add(
                    &mut self.layers,
                    "items-end".into(),
                    "align-items",
                    "flex-end".into(),
                ),
                _ => {}
            }

            if let Some(gap) = spec.gap.filter(|g| *g > 0.0) {
                match self.tokens.lookup_site(&node.id, "itemSpacing") {
                    Some(token) => {
                        // Token-bound layout value: custom-property layer.
                        self.layers.tokens.push(StyleRule {
                            selector: selector.to_string(),
                            node: node.id.clone(),
                            declarations: vec![SourcedDeclaration {
                                property: "gap".to_string(),
                                value: StyleValue::Text(format!("var(--{})", token.name)),
                                provenance: Provenance::Token(token.name.clone()),
                            }],
                            min_width: None,
                        });
                    }
                    None => add(
                        &mut self.layers,
                        format!("gap-{}", class_value(gap)),
                        "gap",
                        format!("{}px", format_px(gap)),
                    ),
                }
            }

            if let Some(padding) = spec.padding.filter(|p| !p.is_zero()) {
                let shorthand = weft_layout::padding_shorthand(&padding);
                let suffix = shorthand.replace("px", "").replace(' ', "-");
                add(
                    &mut self.layers,
                    format!("p-{}", suffix.replace('.', "_")),
                    "padding",
                    shorthand,
                );
            }
        }

        match spec.width {
            Some(SizeValue::Px(v)) => add(
                &mut self.layers,
                format!("w-{}", class_value(v)),
                "width",
                format!("{}px", format_px(v)),
            ),
            Some(SizeValue::FitContent) => add(
                &mut self.layers,
                "w-fit".into(),
                "width",
                "fit-content".into(),
            ),
            None => {}
        }
        match spec.height {
            Some(SizeValue::Px(v)) => add(
                &mut self.layers,
                format!("h-{}", class_value(v)),
                "height",
                format!("{}px", format_px(v)),
            ),
            Some(SizeValue::FitContent) => add(
                &mut self.layers,
                "h-fit".into(),
                "height",
                "fit-content".into(),
            ),
            None => {}
        }

        for (name_stem, property, value) in [
            ("min-w", "min-width", spec.constraints.min_width),
            ("max-w", "max-width", spec.constraints.max_width),
            ("min-h", "min-height", spec.constraints.min_height),
            ("max-h", "max-height", spec.constraints.max_height),
        ] {
            if let Some(v) = value {
                add(
                    &mut self.layers,
                    format!("{name_stem}-{}", class_value(v)),
                    property,
                    format!("{}px", format_px(v)),
                );
            }
        }

        if spec.grow.is_some() {
            add(&mut self.layers, "grow".into(), "flex-grow", "1".into());
        }
        if spec.basis == Some(0.0) {
            add(&mut self.layers, "basis-0".into(), "flex-basis", "0".into());
        }
        if spec.stretch_counter {
            add(
                &mut self.layers,
                "self-stretch".into(),
                "align-self",
                "stretch".into(),
            );
        }

        classes
    }
}

/// Pixel value as a class-name fragment; fractional parts use `_` so the
/// dot cannot break the selector.
fn class_value(v: f64) -> String {
    format_px(v).replace('.', "_")
}

/// Content-identity fingerprint for an exportable vector subtree. Ids and
/// names are excluded so visually identical assets collide.
pub(crate) fn asset_fingerprint(node: &ExtractedNode) -> String {
    let mut hasher = rustc_hash::FxHasher::default();
    hash_subtree(node, &mut hasher);
    format!("{:016x}", hasher.finish())
}

fn hash_subtree(node: &ExtractedNode, hasher: &mut rustc_hash::FxHasher) {
    std::mem::discriminant(&node.kind).hash(hasher);
    node.geometry.width.to_bits().hash(hasher);
    node.geometry.height.to_bits().hash(hasher);
    serde_json::to_string(&node.fills)
        .unwrap_or_default()
        .hash(hasher);
    serde_json::to_string(&node.strokes)
        .unwrap_or_default()
        .hash(hasher);
    node.children.len().hash(hasher);
    for child in &node.children {
        hash_subtree(child, hasher);
    }
}
