//! Stylesheet assembly for the three layers.

use weft_core::{format_px, Diagnostics, DiagnosticKind, NodeId};
use weft_semantic::{StyleLayers, StyleRule};
use weft_visual::{BackgroundLayer, GradientKind, Provenance, Sourced, StyleValue};

use crate::emit::{CssLevel, StylesheetArtifact};

/// Assemble the three stylesheet artifacts. `token_declarations` (the
/// flat custom-property block) heads the token layer so the var()
/// consumers sit next to their definitions.
pub fn render_layers(
    layers: &StyleLayers,
    token_declarations: &str,
    level: CssLevel,
    diag: &mut Diagnostics,
) -> Vec<StylesheetArtifact> {
    let mut artifacts = Vec::new();

    let mut utilities = String::new();
    for utility in &layers.utility {
        utilities.push_str(&format!(
            ".{} {{ {} }}\n",
            utility.name, utility.declaration
        ));
    }
    artifacts.push(StylesheetArtifact {
        name: "utilities.css".to_string(),
        content: utilities,
    });

    let mut tokens_css = String::from(token_declarations);
    if !layers.tokens.is_empty() {
        tokens_css.push('\n');
        for rule in &layers.tokens {
            write_rule(rule, level, diag, &mut tokens_css, 0);
        }
    }
    artifacts.push(StylesheetArtifact {
        name: "tokens.css".to_string(),
        content: tokens_css,
    });

    let mut components = String::new();
    let mut plain: Vec<&StyleRule> = Vec::new();
    let mut scoped: Vec<&StyleRule> = Vec::new();
    for rule in &layers.component {
        match rule.min_width {
            Some(_) => scoped.push(rule),
            None => plain.push(rule),
        }
    }
    for rule in plain {
        write_rule(rule, level, diag, &mut components, 0);
    }
    // Responsive overrides ascend mobile-first.
    scoped.sort_by(|a, b| {
        a.min_width
            .unwrap_or(0.0)
            .total_cmp(&b.min_width.unwrap_or(0.0))
    });
    for rule in scoped {
        let width = rule.min_width.unwrap_or(0.0);
        components.push_str(&format!("@media (min-width: {}px) {{\n", format_px(width)));
        write_rule(rule, level, diag, &mut components, 1);
        components.push_str("}\n\n");
    }
    artifacts.push(StylesheetArtifact {
        name: "components.css".to_string(),
        content: components,
    });

    artifacts
}

fn write_rule(
    rule: &StyleRule,
    level: CssLevel,
    diag: &mut Diagnostics,
    out: &mut String,
    indent: usize,
) {
    let pad = "  ".repeat(indent);
    out.push_str(&format!("{}.{} {{\n", pad, rule.selector));
    for decl in &rule.declarations {
        let value = serialize_value(&decl.value, level, &rule.node, diag);
        out.push_str(&format!("{}  {}: {};\n", pad, decl.property, value));
    }
    out.push_str(&format!("{}}}\n", pad));
    if indent == 0 {
        out.push('\n');
    }
}

/// Serialize a declaration value. Background layers honor per-layer
/// provenance; a conic gradient under the legacy dialect degrades to the
/// closest representable gradient with a fidelity-loss note.
fn serialize_value(
    value: &StyleValue,
    level: CssLevel,
    node: &NodeId,
    diag: &mut Diagnostics,
) -> String {
    match value {
        StyleValue::Text(text) => text.clone(),
        StyleValue::Layers(layers) => layers
            .iter()
            .map(|layer| serialize_layer(layer, level, node, diag))
            .collect::<Vec<_>>()
            .join(", "),
    }
}

fn serialize_layer(
    layer: &Sourced<BackgroundLayer>,
    level: CssLevel,
    node: &NodeId,
    diag: &mut Diagnostics,
) -> String {
    if let Provenance::Token(name) = &layer.provenance {
        return format!("var(--{name})");
    }
    match (&layer.value, level) {
        (BackgroundLayer::Conic(paint), CssLevel::Legacy) => {
            diag.push(
                DiagnosticKind::EmissionFailure,
                node.clone(),
                "conic gradient unavailable in the legacy dialect; approximated as linear",
            );
            weft_visual::gradient_css(GradientKind::Linear, paint)
        }
        (layer, _) => layer.to_css(),
    }
}
