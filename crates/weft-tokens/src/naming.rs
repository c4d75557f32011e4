//! Token identifier derivation.

use convert_case::{Case, Casing};

use weft_core::{format_px, Color};

use crate::binding::{TokenCategory, TokenSet, TokenValue};

/// Semantic hue band for a color without an explicit variable name.
///
/// Bands: near-gray colors are `neutral`; hues in [180°, 260°) map to
/// `primary`, [260°, 345°) to `accent`, everything else to `secondary`.
pub fn hue_band(color: &Color) -> &'static str {
    let (hue, saturation) = color.hue_saturation();
    if saturation < 0.08 {
        "neutral"
    } else if (180.0..260.0).contains(&hue) {
        "primary"
    } else if (260.0..345.0).contains(&hue) {
        "accent"
    } else {
        "secondary"
    }
}

/// Identifier for a token created from a design variable, prefixed with
/// its category when the variable name does not already carry it.
pub(crate) fn variable_token_name(variable_name: &str, category: TokenCategory) -> String {
    let cleaned = variable_name
        .replace(['/', '.', ' '], "-")
        .to_case(Case::Kebab);
    let prefix = category.prefix();
    if cleaned == prefix || cleaned.starts_with(&format!("{prefix}-")) {
        cleaned
    } else {
        format!("{prefix}-{cleaned}")
    }
}

/// Derived identifier for a threshold-promoted literal, unique within the
/// set (collisions get `-2`, `-3`, … suffixes). The category is passed
/// explicitly because lengths are ambiguous between spacing and radius.
pub(crate) fn derived_name(
    category: TokenCategory,
    value: &TokenValue,
    set: &TokenSet,
) -> String {
    let base = match value {
        TokenValue::Color(c) => format!("color-{}", hue_band(c)),
        TokenValue::Length(l) => format!("{}-{}", category.prefix(), format_px(*l)),
        TokenValue::Typography(t) => format!("text-{}", format_px(t.size)),
        TokenValue::Shadow(_) => format!("{}-1", category.prefix()),
    };
    unique(base, set)
}

pub(crate) fn ensure_unique(base: String, set: &TokenSet) -> String {
    unique(base, set)
}

fn unique(base: String, set: &TokenSet) -> String {
    if !set.contains_name(&base) {
        return base;
    }
    // shadow-1 collides into shadow-2, color-primary into color-primary-2.
    let stem = base
        .rsplit_once('-')
        .filter(|(_, tail)| tail.parse::<u32>().is_ok())
        .map(|(head, _)| head.to_string())
        .unwrap_or_else(|| base.clone());
    let mut n = 2;
    loop {
        let candidate = format!("{stem}-{n}");
        if !set.contains_name(&candidate) {
            return candidate;
        }
        n += 1;
    }
}
