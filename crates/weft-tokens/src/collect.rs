//! The collection pass.
//!
//! Walks the extracted tree once in document order. Promotion:
//!
//! - A value bound to a design variable is promoted unconditionally and
//!   named after the variable, carrying one value per variable mode.
//! - An unbound literal is promoted when it occurs at or above the usage
//!   threshold (quantized equality: colors to 8-bit RGBA, lengths to
//!   0.01 px). Below the threshold it
//!   stays an inline literal.
//!
//! Creation order is document order, so the resulting set is identical
//! across runs over the same tree.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use weft_core::{
    BindingRef, Color, Diagnostics, DiagnosticKind, Effect, ExtractedNode, NodeId, NodeKind,
    PaintKind, PipelineContext, Variable, VariableValue,
};

use crate::binding::{TokenBinding, TokenCategory, TokenRefSite, TokenSet, TokenValue, ValueKey};
use crate::naming;

struct Candidate {
    node: NodeId,
    property: String,
    category: TokenCategory,
    value: TokenValue,
    binding: Option<BindingRef>,
    /// The source carried no literal; only the binding can promote this.
    bound_only: bool,
}

/// Collect the token set for a whole extracted tree.
pub fn collect(
    root: &ExtractedNode,
    ctx: &PipelineContext<'_>,
    diag: &mut Diagnostics,
) -> TokenSet {
    let mut candidates = Vec::new();
    scan(root, &mut candidates);

    let mut counts: FxHashMap<ValueKey, usize> = FxHashMap::default();
    for candidate in &candidates {
        if !candidate.bound_only {
            *counts.entry(candidate.value.key()).or_default() += 1;
        }
    }

    let threshold = ctx.options.promotion_threshold.max(1);
    let mut set = TokenSet::new();

    for candidate in &candidates {
        let site = TokenRefSite {
            node: candidate.node.clone(),
            property: candidate.property.clone(),
        };

        // Variable-bound values promote unconditionally.
        if let Some(binding) = &candidate.binding {
            if let Some(variable) = ctx.variables.get(binding) {
                if let Some(name) = set
                    .lookup_variable(binding.as_str())
                    .map(|t| t.name.clone())
                {
                    set.add_reference(&name, site);
                    continue;
                }
                match variable_values(variable, candidate.category) {
                    Some(values) => {
                        let name = naming::ensure_unique(
                            naming::variable_token_name(&variable.name, candidate.category),
                            &set,
                        );
                        set.insert(
                            TokenBinding {
                                name,
                                category: candidate.category,
                                values,
                                references: vec![site],
                            },
                            Some(binding.as_str().to_string()),
                        );
                        continue;
                    }
                    None => {
                        diag.push(
                            DiagnosticKind::MalformedInput,
                            candidate.node.clone(),
                            format!(
                                "variable {:?} has no usable value for {} token; treated as literal",
                                variable.name,
                                candidate.category.prefix()
                            ),
                        );
                        // Fall through to the literal path.
                    }
                }
            }
            // Dangling bindings fall through too; the visual resolver
            // reports the exhausted chain.
        }

        // Without a literal there is nothing left to promote; the visual
        // resolver will report the exhausted chain.
        if candidate.bound_only {
            continue;
        }

        if let Some(name) = set.lookup_value(&candidate.value).map(|t| t.name.clone()) {
            set.add_reference(&name, site);
            continue;
        }

        if counts[&candidate.value.key()] >= threshold {
            let name = naming::derived_name(candidate.category, &candidate.value, &set);
            let mut values = IndexMap::new();
            values.insert("default".to_string(), candidate.value.clone());
            set.insert(
                TokenBinding {
                    name,
                    category: candidate.category,
                    values,
                    references: vec![site],
                },
                None,
            );
        }
    }

    log::debug!(
        "token collection: {} candidate(s) → {} token(s)",
        candidates.len(),
        set.len()
    );
    set
}

/// Convert a variable's per-mode values into token values of the given
/// category. Returns `None` when any mode carries an incompatible type.
fn variable_values(
    variable: &Variable,
    category: TokenCategory,
) -> Option<IndexMap<String, TokenValue>> {
    let mut values = IndexMap::new();
    for (mode, value) in &variable.values {
        let converted = match (category, value) {
            (TokenCategory::Color, VariableValue::Color(c)) => TokenValue::Color(*c),
            (TokenCategory::Spacing | TokenCategory::Radius, VariableValue::Number(n)) => {
                TokenValue::Length(*n)
            }
            _ => return None,
        };
        values.insert(mode.clone(), converted);
    }
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}

/// Gather promotable occurrences, document order. Vector-container
/// contents become a single asset and contribute nothing; placeholders
/// are inert.
fn scan(node: &ExtractedNode, out: &mut Vec<Candidate>) {
    for (i, paint) in node.fills.iter().enumerate() {
        let binding = paint
            .binding
            .clone()
            .or_else(|| node.bindings.get("fills").cloned());
        match &paint.kind {
            PaintKind::Solid(color) => out.push(Candidate {
                node: node.id.clone(),
                property: format!("fills[{i}]"),
                category: TokenCategory::Color,
                value: TokenValue::Color(*color),
                binding,
                bound_only: false,
            }),
            PaintKind::Unresolved if binding.is_some() => out.push(Candidate {
                node: node.id.clone(),
                property: format!("fills[{i}]"),
                category: TokenCategory::Color,
                value: TokenValue::Color(Color::TRANSPARENT),
                binding,
                bound_only: true,
            }),
            _ => {}
        }
    }

    for (i, stroke) in node.strokes.iter().enumerate() {
        let binding = stroke
            .paint
            .binding
            .clone()
            .or_else(|| node.bindings.get("strokes").cloned());
        match &stroke.paint.kind {
            PaintKind::Solid(color) => out.push(Candidate {
                node: node.id.clone(),
                property: format!("strokes[{i}]"),
                category: TokenCategory::Color,
                value: TokenValue::Color(*color),
                binding,
                bound_only: false,
            }),
            PaintKind::Unresolved if binding.is_some() => out.push(Candidate {
                node: node.id.clone(),
                property: format!("strokes[{i}]"),
                category: TokenCategory::Color,
                value: TokenValue::Color(Color::TRANSPARENT),
                binding,
                bound_only: true,
            }),
            _ => {}
        }
    }

    for (i, effect) in node.effects.iter().enumerate() {
        if let Effect::DropShadow(shadow) | Effect::InnerShadow(shadow) = effect {
            out.push(Candidate {
                node: node.id.clone(),
                property: format!("effects[{i}]"),
                category: TokenCategory::Shadow,
                value: TokenValue::Shadow(*shadow),
                binding: node.bindings.get("effects").cloned(),
                bound_only: false,
            });
        }
    }

    if let Some(layout) = &node.layout {
        if layout.gap > 0.0 {
            out.push(Candidate {
                node: node.id.clone(),
                property: "itemSpacing".to_string(),
                category: TokenCategory::Spacing,
                value: TokenValue::Length(layout.gap),
                binding: node.bindings.get("itemSpacing").cloned(),
                bound_only: false,
            });
        }
        // Distinct nonzero padding components count once per node, so a
        // uniform padding cannot promote itself by repetition alone.
        let mut seen = Vec::new();
        for component in [
            layout.padding.top,
            layout.padding.right,
            layout.padding.bottom,
            layout.padding.left,
        ] {
            if component > 0.0 && !seen.contains(&component) {
                seen.push(component);
                out.push(Candidate {
                    node: node.id.clone(),
                    property: "padding".to_string(),
                    category: TokenCategory::Spacing,
                    value: TokenValue::Length(component),
                    binding: None,
                    bound_only: false,
                });
            }
        }
    }

    if let Some(radius) = node.corners.as_uniform() {
        if radius > 0.0 {
            out.push(Candidate {
                node: node.id.clone(),
                property: "cornerRadius".to_string(),
                category: TokenCategory::Radius,
                value: TokenValue::Length(radius),
                binding: node.bindings.get("cornerRadius").cloned(),
                bound_only: false,
            });
        }
    }

    if let NodeKind::Text(text) = &node.kind {
        out.push(Candidate {
            node: node.id.clone(),
            property: "typography".to_string(),
            category: TokenCategory::Typography,
            value: TokenValue::Typography(text.typography.clone()),
            binding: None,
            bound_only: false,
        });
    }

    if !matches!(
        node.kind,
        NodeKind::VectorContainer | NodeKind::Placeholder(_)
    ) {
        for child in &node.children {
            scan(child, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_core::{Color, Paint, PipelineOptions, VariableTable};

    fn frame_with_fill(id: &str, color: Color) -> ExtractedNode {
        let mut node = ExtractedNode::new(id, id, NodeKind::Frame);
        node.fills.push(Paint::solid(color));
        node
    }

    fn run(root: &ExtractedNode, variables: &VariableTable) -> (TokenSet, Diagnostics) {
        let options = PipelineOptions::default();
        let ctx = PipelineContext::new(&options, variables);
        let mut diags = Diagnostics::new();
        let set = collect(root, &ctx, &mut diags);
        (set, diags)
    }

    #[test]
    fn test_single_occurrence_stays_inline() {
        let mut root = ExtractedNode::new("r", "root", NodeKind::Frame);
        root.children
            .push(frame_with_fill("a", Color::from_rgb8(30, 100, 255)));

        let (set, _) = run(&root, &VariableTable::new());
        assert!(set.is_empty());
    }

    #[test]
    fn test_repeated_value_promotes_with_both_references() {
        let blue = Color::from_rgb8(30, 100, 255);
        let mut root = ExtractedNode::new("r", "root", NodeKind::Frame);
        root.children.push(frame_with_fill("a", blue));
        root.children.push(frame_with_fill("b", blue));

        let (set, _) = run(&root, &VariableTable::new());
        assert_eq!(set.len(), 1);
        let token = set.iter().next().unwrap();
        assert_eq!(token.name, "color-primary");
        assert_eq!(token.references.len(), 2);
        let nodes: Vec<_> = token.references.iter().map(|r| r.node.as_str()).collect();
        assert_eq!(nodes, ["a", "b"]);
    }

    #[test]
    fn test_bound_value_promotes_unconditionally() {
        let mut root = ExtractedNode::new("r", "root", NodeKind::Frame);
        let mut child = frame_with_fill("a", Color::from_rgb8(255, 0, 0));
        child.fills[0].binding = Some(BindingRef::from("var:1"));
        root.children.push(child);

        let mut variables = VariableTable::new();
        variables.insert(
            "var:1",
            Variable::single(
                "brand/danger",
                VariableValue::Color(Color::from_rgb8(255, 0, 0)),
            ),
        );

        let (set, _) = run(&root, &variables);
        assert_eq!(set.len(), 1);
        assert_eq!(set.iter().next().unwrap().name, "color-brand-danger");
    }

    #[test]
    fn test_collection_is_idempotent() {
        let blue = Color::from_rgb8(30, 100, 255);
        let mut root = ExtractedNode::new("r", "root", NodeKind::Frame);
        root.children.push(frame_with_fill("a", blue));
        root.children.push(frame_with_fill("b", blue));
        let mut gapped = ExtractedNode::new("c", "stack", NodeKind::Frame);
        gapped.layout = Some(weft_core::LayoutConfig {
            gap: 8.0,
            ..weft_core::LayoutConfig::vertical()
        });
        root.children.push(gapped.clone());
        root.children.push({
            let mut other = gapped;
            other.id = NodeId::from("d");
            other
        });

        let (first, _) = run(&root, &VariableTable::new());
        let (second, _) = run(&root, &VariableTable::new());

        let a: Vec<_> = first
            .iter()
            .map(|t| (t.name.clone(), t.value_for(None).cloned()))
            .collect();
        let b: Vec<_> = second
            .iter()
            .map(|t| (t.name.clone(), t.value_for(None).cloned()))
            .collect();
        assert_eq!(a, b);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_multi_mode_variable_token() {
        let mut root = ExtractedNode::new("r", "root", NodeKind::Frame);
        let mut child = frame_with_fill("a", Color::from_rgb8(10, 10, 10));
        child.fills[0].binding = Some(BindingRef::from("var:surface"));
        root.children.push(child);

        let mut values = IndexMap::new();
        values.insert(
            "light".to_string(),
            VariableValue::Color(Color::from_rgb8(255, 255, 255)),
        );
        values.insert(
            "dark".to_string(),
            VariableValue::Color(Color::from_rgb8(10, 10, 10)),
        );
        let mut variables = VariableTable::new();
        variables.insert(
            "var:surface",
            Variable {
                name: "surface".to_string(),
                values,
            },
        );

        let (set, _) = run(&root, &variables);
        let token = set.get("color-surface").unwrap();
        assert!(token.is_multi_mode());
        assert_eq!(
            token.value_for(Some("dark")),
            Some(&TokenValue::Color(Color::from_rgb8(10, 10, 10)))
        );
    }

    #[test]
    fn test_vector_container_contents_are_skipped() {
        let mut icon = ExtractedNode::new("icon", "icon", NodeKind::VectorContainer);
        // Two identical fills inside the vector unit would otherwise
        // promote.
        icon.children
            .push(frame_with_fill("p1", Color::from_rgb8(1, 2, 3)));
        icon.children
            .push(frame_with_fill("p2", Color::from_rgb8(1, 2, 3)));
        let mut root = ExtractedNode::new("r", "root", NodeKind::Frame);
        root.children.push(icon);

        let (set, _) = run(&root, &VariableTable::new());
        assert!(set.is_empty());
    }

    #[test]
    fn test_type_mismatched_variable_falls_back_to_literal() {
        let mut root = ExtractedNode::new("r", "root", NodeKind::Frame);
        let mut child = frame_with_fill("a", Color::from_rgb8(9, 9, 9));
        child.fills[0].binding = Some(BindingRef::from("var:bad"));
        root.children.push(child);

        let mut variables = VariableTable::new();
        variables.insert(
            "var:bad",
            Variable::single("oops", VariableValue::String("nope".to_string())),
        );

        let (set, diags) = run(&root, &variables);
        // One occurrence below threshold: no token, one diagnostic.
        assert!(set.is_empty());
        assert_eq!(diags.count_of(DiagnosticKind::MalformedInput), 1);
    }
}
