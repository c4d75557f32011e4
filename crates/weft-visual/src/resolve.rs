//! The visual resolver.

use indexmap::IndexMap;

use weft_core::{
    BindingRef, Color, Diagnostics, DiagnosticKind, Effect, ExtractedNode, NodeId, NodeKind,
    Paint, PaintKind, PipelineContext, StrokeAlign,
};
use weft_tokens::{TokenSet, TokenValue};

use crate::style::{
    BackgroundLayer, BorderDecl, FilterDecl, Provenance, RadiusDecl, ShadowDecl, Sourced,
    VisualStyle,
};

/// One resolved visual style per node id.
pub type VisualMap = IndexMap<NodeId, VisualStyle>;

/// Resolve the visual style of a single node.
pub fn resolve(
    node: &ExtractedNode,
    tokens: &TokenSet,
    ctx: &PipelineContext<'_>,
    diag: &mut Diagnostics,
) -> VisualStyle {
    let mut style = VisualStyle::new(node.id.clone());

    resolve_fills(node, tokens, ctx, diag, &mut style);
    resolve_strokes(node, tokens, ctx, diag, &mut style);
    resolve_effects(node, tokens, &mut style);
    resolve_radius(node, tokens, ctx, &mut style);

    if node.opacity < 1.0 {
        style.opacity = Some(node.opacity);
    }
    style.blend_mode = node.blend_mode.as_css().map(str::to_string);

    if let NodeKind::Text(text) = &node.kind {
        let value = TokenValue::Typography(text.typography.clone());
        style.typography = Some(match tokens.lookup_value(&value) {
            Some(token) => Sourced::with(
                text.typography.clone(),
                Provenance::Token(token.name.clone()),
            ),
            None => Sourced::raw(text.typography.clone()),
        });
    }

    style
}

/// Resolve every node in a subtree, document order. Vector-container
/// contents are covered by their container's asset export and skipped.
pub fn resolve_all(
    root: &ExtractedNode,
    tokens: &TokenSet,
    ctx: &PipelineContext<'_>,
    diag: &mut Diagnostics,
) -> VisualMap {
    let mut map = VisualMap::new();
    walk(root, tokens, ctx, diag, &mut map);
    log::debug!("visual styles resolved for {} nodes", map.len());
    map
}

fn walk(
    node: &ExtractedNode,
    tokens: &TokenSet,
    ctx: &PipelineContext<'_>,
    diag: &mut Diagnostics,
    map: &mut VisualMap,
) {
    map.insert(node.id.clone(), resolve(node, tokens, ctx, diag));
    if matches!(
        node.kind,
        NodeKind::VectorContainer | NodeKind::Placeholder(_)
    ) {
        return;
    }
    for child in &node.children {
        walk(child, tokens, ctx, diag, map);
    }
}

/// The four-step resolution chain for a color-bearing paint entry,
/// attempted in order and stopping at the first success:
///
/// 1. a binding on the specific entry,
/// 2. a binding on the node-level property,
/// 3. a previously promoted token whose value matches exactly,
/// 4. the literal raw value.
///
/// When all four fail (a bound entry with no literal and a dangling
/// reference), the value falls back to a neutral placeholder and the
/// exhaustion is reported, not thrown.
fn resolve_color(
    paint: &Paint,
    literal: Option<Color>,
    node: &ExtractedNode,
    property: &str,
    tokens: &TokenSet,
    ctx: &PipelineContext<'_>,
    diag: &mut Diagnostics,
) -> Sourced<Color> {
    for binding in [paint.binding.as_ref(), node.bindings.get(property)]
        .into_iter()
        .flatten()
    {
        if let Some(resolved) = lookup_binding(binding, tokens, ctx) {
            return resolved;
        }
    }

    if let Some(color) = literal {
        if let Some(token) = tokens.lookup_value(&TokenValue::Color(color)) {
            return Sourced::with(color, Provenance::Token(token.name.clone()));
        }
        return Sourced::raw(color);
    }

    diag.push(
        DiagnosticKind::ResolutionExhausted,
        node.id.clone(),
        format!("{property}: binding did not resolve and no literal value exists"),
    );
    Sourced::raw(Color::TRANSPARENT)
}

/// Steps (1)/(2): resolve a binding through the variable table. Prefers
/// the token the collection pass created for the variable; falls back to
/// bare variable provenance when no token exists.
fn lookup_binding(
    binding: &BindingRef,
    tokens: &TokenSet,
    ctx: &PipelineContext<'_>,
) -> Option<Sourced<Color>> {
    let variable = ctx.variables.get(binding)?;
    let color = variable
        .value_for(ctx.options.mode.as_deref())?
        .as_color()?;
    Some(match tokens.lookup_variable(binding.as_str()) {
        Some(token) => Sourced::with(color, Provenance::Token(token.name.clone())),
        None => Sourced::with(color, Provenance::Variable(variable.name.clone())),
    })
}

fn resolve_fills(
    node: &ExtractedNode,
    tokens: &TokenSet,
    ctx: &PipelineContext<'_>,
    diag: &mut Diagnostics,
    style: &mut VisualStyle,
) {
    // Source stacks are bottom-to-top; CSS wants top-to-bottom.
    let reversed = node.fills.iter().rev();

    if node.is_text() {
        // The topmost solid fill colors the text.
        for paint in reversed {
            if let PaintKind::Solid(color) = paint.kind {
                let color = with_paint_opacity(color, paint.opacity);
                style.text_color = Some(resolve_color(
                    paint,
                    Some(color),
                    node,
                    "fills",
                    tokens,
                    ctx,
                    diag,
                ));
                break;
            }
        }
        return;
    }

    for paint in reversed {
        match &paint.kind {
            PaintKind::Solid(color) => {
                let color = with_paint_opacity(*color, paint.opacity);
                let resolved = resolve_color(paint, Some(color), node, "fills", tokens, ctx, diag);
                style.background.push(Sourced::with(
                    BackgroundLayer::Color(resolved.value),
                    resolved.provenance,
                ));
            }
            PaintKind::LinearGradient(p) => style
                .background
                .push(Sourced::raw(BackgroundLayer::Linear(p.clone()))),
            PaintKind::RadialGradient(p) => style
                .background
                .push(Sourced::raw(BackgroundLayer::Radial(p.clone()))),
            PaintKind::ConicGradient(p) => style
                .background
                .push(Sourced::raw(BackgroundLayer::Conic(p.clone()))),
            PaintKind::Image(p) => style
                .background
                .push(Sourced::raw(BackgroundLayer::Image(p.clone()))),
            PaintKind::Unresolved => {
                let resolved = resolve_color(paint, None, node, "fills", tokens, ctx, diag);
                style.background.push(Sourced::with(
                    BackgroundLayer::Color(resolved.value),
                    resolved.provenance,
                ));
            }
        }
    }
}

/// Stroke alignment strategies. Inside must not alter box dimensions, so
/// it becomes an inset ring; center maps to a conventional border;
/// outside becomes a non-inset ring.
fn resolve_strokes(
    node: &ExtractedNode,
    tokens: &TokenSet,
    ctx: &PipelineContext<'_>,
    diag: &mut Diagnostics,
    style: &mut VisualStyle,
) {
    for stroke in &node.strokes {
        let literal = match &stroke.paint.kind {
            PaintKind::Solid(color) => Some(*color),
            PaintKind::Unresolved => None,
            // Gradient or image strokes approximate with their first
            // stop/nothing; keep the solid path only.
            _ => continue,
        };
        let color = resolve_color(
            &stroke.paint,
            literal,
            node,
            "strokes",
            tokens,
            ctx,
            diag,
        );

        match stroke.align {
            StrokeAlign::Inside => style.shadows.push(Sourced::with(
                ShadowDecl::ring(stroke.weight, color.value, true),
                color.provenance,
            )),
            StrokeAlign::Outside => style.shadows.push(Sourced::with(
                ShadowDecl::ring(stroke.weight, color.value, false),
                color.provenance,
            )),
            StrokeAlign::Center => {
                if style.border.is_none() {
                    style.border = Some(BorderDecl {
                        weight: stroke.weight,
                        color,
                    });
                } else {
                    // Only one border slot exists; further center strokes
                    // degrade to outset rings.
                    style.shadows.push(Sourced::with(
                        ShadowDecl::ring(stroke.weight, color.value, false),
                        color.provenance,
                    ));
                }
            }
        }
    }
}

/// Effects stack in declaration order; no reordering.
fn resolve_effects(node: &ExtractedNode, tokens: &TokenSet, style: &mut VisualStyle) {
    for effect in &node.effects {
        match effect {
            Effect::DropShadow(shadow) | Effect::InnerShadow(shadow) => {
                let inset = matches!(effect, Effect::InnerShadow(_));
                let provenance = match tokens.lookup_value(&TokenValue::Shadow(*shadow)) {
                    Some(token) => Provenance::Token(token.name.clone()),
                    None => Provenance::Raw,
                };
                style.shadows.push(Sourced::with(
                    ShadowDecl::from_effect(shadow, inset),
                    provenance,
                ));
            }
            Effect::LayerBlur { radius } => style.filters.push(FilterDecl::Blur(*radius)),
            Effect::BackgroundBlur { radius } => {
                style.filters.push(FilterDecl::BackdropBlur(*radius))
            }
        }
    }
}

fn resolve_radius(
    node: &ExtractedNode,
    tokens: &TokenSet,
    ctx: &PipelineContext<'_>,
    style: &mut VisualStyle,
) {
    if node.corners.is_zero() {
        return;
    }

    style.radius = Some(match node.corners.as_uniform() {
        // Node-level binding first, then exact token match, then raw.
        Some(radius) => radius_from_binding(node, tokens, ctx).unwrap_or_else(|| {
            match tokens.lookup_value(&TokenValue::Length(radius)) {
                Some(token) => Sourced::with(
                    RadiusDecl::Uniform(radius),
                    Provenance::Token(token.name.clone()),
                ),
                None => Sourced::raw(RadiusDecl::Uniform(radius)),
            }
        }),
        None => Sourced::raw(RadiusDecl::PerCorner(node.corners)),
    });
}

fn radius_from_binding(
    node: &ExtractedNode,
    tokens: &TokenSet,
    ctx: &PipelineContext<'_>,
) -> Option<Sourced<RadiusDecl>> {
    let binding = node.bindings.get("cornerRadius")?;
    let variable = ctx.variables.get(binding)?;
    let value = variable
        .value_for(ctx.options.mode.as_deref())?
        .as_number()?;
    let provenance = match tokens.lookup_variable(binding.as_str()) {
        Some(token) => Provenance::Token(token.name.clone()),
        None => Provenance::Variable(variable.name.clone()),
    };
    Some(Sourced::with(RadiusDecl::Uniform(value), provenance))
}

fn with_paint_opacity(color: Color, opacity: f64) -> Color {
    if opacity >= 1.0 {
        color
    } else {
        Color::rgba(color.r, color.g, color.b, color.a * opacity as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weft_core::{PipelineOptions, Stroke, VariableTable};

    fn ctx_fixture() -> (PipelineOptions, VariableTable) {
        (PipelineOptions::default(), VariableTable::new())
    }

    fn resolve_node(node: &ExtractedNode) -> (VisualStyle, Diagnostics) {
        let (options, variables) = ctx_fixture();
        let ctx = PipelineContext::new(&options, &variables);
        let mut diags = Diagnostics::new();
        let tokens = TokenSet::new();
        let style = resolve(node, &tokens, &ctx, &mut diags);
        (style, diags)
    }

    #[test]
    fn test_paint_order_is_reversed() {
        let mut node = ExtractedNode::new("n", "n", NodeKind::Frame);
        node.fills.push(Paint::solid(Color::from_rgb8(1, 1, 1)));
        node.fills.push(Paint::solid(Color::from_rgb8(2, 2, 2)));

        let (style, _) = resolve_node(&node);
        // Source order is bottom-to-top; the second (topmost) paint must
        // come out first.
        assert_eq!(
            style.background[0].value,
            BackgroundLayer::Color(Color::from_rgb8(2, 2, 2))
        );
        assert_eq!(
            style.background[1].value,
            BackgroundLayer::Color(Color::from_rgb8(1, 1, 1))
        );
    }

    #[test]
    fn test_inside_stroke_is_inset_shadow_not_border() {
        // A node with an inside-aligned 2px stroke and no fill.
        let mut node = ExtractedNode::new("n", "n", NodeKind::Frame);
        node.strokes.push(Stroke {
            paint: Paint::solid(Color::from_rgb8(0, 0, 0)),
            weight: 2.0,
            align: StrokeAlign::Inside,
        });

        let (style, _) = resolve_node(&node);
        assert!(style.border.is_none());
        assert_eq!(style.shadows.len(), 1);
        let shadow = &style.shadows[0].value;
        assert!(shadow.inset);
        assert_eq!(shadow.spread, 2.0);
        assert_eq!(shadow.to_css(), "inset 0px 0px 0px 2px #000000");
    }

    #[test]
    fn test_center_stroke_is_border_outside_is_shadow() {
        let mut node = ExtractedNode::new("n", "n", NodeKind::Frame);
        node.strokes.push(Stroke {
            paint: Paint::solid(Color::from_rgb8(10, 10, 10)),
            weight: 1.0,
            align: StrokeAlign::Center,
        });
        let (style, _) = resolve_node(&node);
        assert!(style.border.is_some());
        assert!(style.shadows.is_empty());

        let mut node = ExtractedNode::new("n", "n", NodeKind::Frame);
        node.strokes.push(Stroke {
            paint: Paint::solid(Color::from_rgb8(10, 10, 10)),
            weight: 3.0,
            align: StrokeAlign::Outside,
        });
        let (style, _) = resolve_node(&node);
        assert!(style.border.is_none());
        assert!(!style.shadows[0].value.inset);
        assert_eq!(style.shadows[0].value.spread, 3.0);
    }

    #[test]
    fn test_effects_keep_declaration_order() {
        let mut node = ExtractedNode::new("n", "n", NodeKind::Frame);
        let first = weft_core::Shadow {
            offset_x: 0.0,
            offset_y: 1.0,
            blur: 2.0,
            spread: 0.0,
            color: Color::BLACK,
        };
        let second = weft_core::Shadow {
            offset_x: 0.0,
            offset_y: 8.0,
            blur: 24.0,
            spread: 0.0,
            color: Color::BLACK,
        };
        node.effects.push(Effect::DropShadow(first));
        node.effects.push(Effect::InnerShadow(second));

        let (style, _) = resolve_node(&node);
        assert_eq!(style.shadows[0].value.offset_y, 1.0);
        assert!(!style.shadows[0].value.inset);
        assert_eq!(style.shadows[1].value.offset_y, 8.0);
        assert!(style.shadows[1].value.inset);
    }

    #[test]
    fn test_chain_step_one_entry_binding_wins() {
        let options = PipelineOptions::default();
        let mut variables = VariableTable::new();
        variables.insert(
            "var:brand",
            weft_core::Variable::single(
                "brand",
                weft_core::VariableValue::Color(Color::from_rgb8(0, 0, 255)),
            ),
        );
        let ctx = PipelineContext::new(&options, &variables);
        let mut diags = Diagnostics::new();
        let tokens = TokenSet::new();

        let mut node = ExtractedNode::new("n", "n", NodeKind::Frame);
        let mut paint = Paint::solid(Color::from_rgb8(255, 0, 0));
        paint.binding = Some(BindingRef::from("var:brand"));
        node.fills.push(paint);
        // A node-level binding that would resolve differently; the entry
        // binding must win.
        node.bindings.insert(
            "fills".to_string(),
            BindingRef::from("var:other"),
        );

        let style = resolve(&node, &tokens, &ctx, &mut diags);
        match &style.background[0] {
            Sourced {
                value: BackgroundLayer::Color(c),
                provenance: Provenance::Variable(name),
            } => {
                assert_eq!(*c, Color::from_rgb8(0, 0, 255));
                assert_eq!(name, "brand");
            }
            other => panic!("unexpected resolution: {other:?}"),
        }
    }

    #[test]
    fn test_chain_exhaustion_reports_and_substitutes() {
        let mut node = ExtractedNode::new("n", "n", NodeKind::Frame);
        let mut paint = Paint::solid(Color::BLACK);
        paint.kind = PaintKind::Unresolved;
        paint.binding = Some(BindingRef::from("var:gone"));
        node.fills.push(paint);

        let (style, diags) = resolve_node(&node);
        assert_eq!(diags.count_of(DiagnosticKind::ResolutionExhausted), 1);
        assert_eq!(
            style.background[0].value,
            BackgroundLayer::Color(Color::TRANSPARENT)
        );
    }

    #[test]
    fn test_literal_matching_token_gets_token_provenance() {
        let options = PipelineOptions::default();
        let variables = VariableTable::new();
        let ctx = PipelineContext::new(&options, &variables);
        let mut diags = Diagnostics::new();

        // Promote the value by repeating it across two nodes.
        let blue = Color::from_rgb8(30, 100, 255);
        let mut root = ExtractedNode::new("r", "r", NodeKind::Frame);
        for id in ["a", "b"] {
            let mut child = ExtractedNode::new(id, id, NodeKind::Frame);
            child.fills.push(Paint::solid(blue));
            root.children.push(child);
        }
        let tokens = weft_tokens::collect(&root, &ctx, &mut diags);

        let style = resolve(&root.children[0], &tokens, &ctx, &mut diags);
        assert_eq!(
            style.background[0].provenance,
            Provenance::Token("color-primary".to_string())
        );
    }

    #[test]
    fn test_uniform_radius_collapses_per_corner_does_not() {
        let mut node = ExtractedNode::new("n", "n", NodeKind::Frame);
        node.corners = weft_core::CornerRadii::uniform(8.0);
        let (style, _) = resolve_node(&node);
        assert_eq!(
            style.radius.as_ref().map(|r| r.value.to_css()),
            Some("8px".to_string())
        );

        let mut node = ExtractedNode::new("n", "n", NodeKind::Frame);
        node.corners = weft_core::CornerRadii {
            top_left: 8.0,
            top_right: 4.0,
            bottom_right: 8.0,
            bottom_left: 4.0,
        };
        let (style, _) = resolve_node(&node);
        assert_eq!(
            style.radius.as_ref().map(|r| r.value.to_css()),
            Some("8px 4px 8px 4px".to_string())
        );
    }
}
