//! Token rendering and re-parsing.

use regex::Regex;
use serde_json::{json, Map, Value};

use weft_core::TokenError;

use crate::binding::{TokenCategory, TokenSet};

/// Render the set as a flat custom-property declaration block.
///
/// Multi-mode values are selected by the `mode` key. Tokens whose modes
/// are breakpoint-scoped additionally render mobile-first `min-width`
/// blocks, ascending by pixel threshold.
pub fn render_custom_properties(
    set: &TokenSet,
    mode: Option<&str>,
) -> Result<String, TokenError> {
    validate_mode(set, mode)?;

    let mut out = String::from(":root {\n");
    for token in set.iter() {
        if let Some(value) = token.value_for(mode) {
            out.push_str(&format!("  {}: {};\n", token.css_variable(), value.to_css()));
        }
    }
    out.push_str("}\n");

    // Breakpoint-scoped modes, ascending, mobile-first.
    let mut breakpoints: Vec<(f64, String)> = set
        .modes()
        .into_iter()
        .filter_map(|label| breakpoint_width(&label).map(|w| (w, label)))
        .filter(|(w, _)| *w > 0.0)
        .collect();
    breakpoints.sort_by(|a, b| a.0.total_cmp(&b.0));

    for (width, label) in breakpoints {
        let scoped: Vec<_> = set
            .iter()
            .filter_map(|t| t.values.get(&label).map(|v| (t, v)))
            .collect();
        if scoped.is_empty() {
            continue;
        }
        out.push_str(&format!("\n@media (min-width: {}px) {{\n  :root {{\n", width));
        for (token, value) in scoped {
            out.push_str(&format!(
                "    {}: {};\n",
                token.css_variable(),
                value.to_css()
            ));
        }
        out.push_str("  }\n}\n");
    }

    Ok(out)
}

/// Render the set as a nested utility-framework configuration object.
///
/// Derived from the same bindings as the flat format, so the two cannot
/// diverge.
pub fn render_utility_config(set: &TokenSet, mode: Option<&str>) -> Result<String, TokenError> {
    validate_mode(set, mode)?;

    let mut sections: [(TokenCategory, &str, Map<String, Value>); 5] = [
        (TokenCategory::Color, "colors", Map::new()),
        (TokenCategory::Spacing, "spacing", Map::new()),
        (TokenCategory::Typography, "fontSize", Map::new()),
        (TokenCategory::Radius, "borderRadius", Map::new()),
        (TokenCategory::Shadow, "boxShadow", Map::new()),
    ];

    for token in set.iter() {
        let Some(value) = token.value_for(mode) else {
            continue;
        };
        let key = token
            .name
            .strip_prefix(&format!("{}-", token.category.prefix()))
            .unwrap_or(&token.name)
            .to_string();
        for (category, _, map) in sections.iter_mut() {
            if *category == token.category {
                map.insert(key.clone(), Value::String(value.to_css()));
            }
        }
    }

    let mut theme = Map::new();
    for (_, section_name, map) in sections {
        if !map.is_empty() {
            theme.insert(section_name.to_string(), Value::Object(map));
        }
    }

    let config = json!({ "theme": Value::Object(theme) });
    Ok(format!("{config:#}\n"))
}

/// Parse a flat custom-property block back into
/// `(category, name, value)` triples.
pub fn parse_custom_properties(
    text: &str,
) -> Result<Vec<(TokenCategory, String, String)>, TokenError> {
    let pattern = Regex::new(r"^\s*--([a-z][a-z0-9-]*)\s*:\s*([^;]+);\s*$")
        .expect("custom property pattern is valid");

    let mut triples = Vec::new();
    for (index, line) in text.lines().enumerate() {
        if !line.contains("--") {
            continue;
        }
        let captures = pattern
            .captures(line)
            .ok_or_else(|| TokenError::Unparseable {
                line: index + 1,
                text: line.trim().to_string(),
            })?;
        let name = captures[1].to_string();
        let value = captures[2].trim().to_string();
        let prefix = name.split('-').next().unwrap_or_default();
        let category =
            TokenCategory::from_prefix(prefix).ok_or_else(|| TokenError::Unparseable {
                line: index + 1,
                text: line.trim().to_string(),
            })?;
        triples.push((category, name, value));
    }
    Ok(triples)
}

fn validate_mode(set: &TokenSet, mode: Option<&str>) -> Result<(), TokenError> {
    let Some(mode) = mode else {
        return Ok(());
    };
    if mode == "default" || set.modes().iter().any(|m| m == mode) {
        Ok(())
    } else {
        Err(TokenError::UnknownMode {
            mode: mode.to_string(),
        })
    }
}

fn breakpoint_width(label: &str) -> Option<f64> {
    match label {
        "sm" => Some(480.0),
        "tablet" | "md" => Some(768.0),
        "desktop" | "lg" => Some(1024.0),
        "xl" => Some(1280.0),
        "wide" => Some(1440.0),
        other => other
            .trim_end_matches("px")
            .parse::<f64>()
            .ok()
            .filter(|w| *w >= 0.0),
    }
}
