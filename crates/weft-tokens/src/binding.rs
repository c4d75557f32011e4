//! Token bindings and the collected set.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use weft_core::{format_px, Color, NodeId, Shadow, Typography};

/// Token categories, each with a fixed identifier prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenCategory {
    Color,
    Spacing,
    Typography,
    Radius,
    Shadow,
}

impl TokenCategory {
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::Spacing => "spacing",
            Self::Typography => "text",
            Self::Radius => "radius",
            Self::Shadow => "shadow",
        }
    }

    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "color" => Some(Self::Color),
            "spacing" => Some(Self::Spacing),
            "text" => Some(Self::Typography),
            "radius" => Some(Self::Radius),
            "shadow" => Some(Self::Shadow),
            _ => None,
        }
    }
}

/// A promotable value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TokenValue {
    Color(Color),
    /// A pixel length (spacing, radius).
    Length(f64),
    Typography(Typography),
    Shadow(Shadow),
}

impl TokenValue {
    /// Quantized identity key. Colors collapse to 8-bit RGBA channels and
    /// lengths to 0.01 px before comparison; values that still differ
    /// after quantization stay distinct tokens.
    pub fn key(&self) -> ValueKey {
        match self {
            TokenValue::Color(c) => ValueKey::Color(c.to_rgba8()),
            TokenValue::Length(l) => ValueKey::Length(quant(*l)),
            TokenValue::Typography(t) => {
                ValueKey::Typography(t.family.clone(), quant(t.size), t.weight)
            }
            TokenValue::Shadow(s) => ValueKey::Shadow(
                quant(s.offset_x),
                quant(s.offset_y),
                quant(s.blur),
                quant(s.spread),
                s.color.to_rgba8(),
            ),
        }
    }

    /// CSS rendering of the value.
    pub fn to_css(&self) -> String {
        match self {
            TokenValue::Color(c) => c.to_css(),
            TokenValue::Length(l) => format!("{}px", format_px(*l)),
            TokenValue::Typography(t) => {
                let family = if t.family.is_empty() {
                    "inherit".to_string()
                } else {
                    t.family.clone()
                };
                match t.line_height {
                    Some(lh) => format!(
                        "{} {}px/{}px {}",
                        t.weight,
                        format_px(t.size),
                        format_px(lh),
                        family
                    ),
                    None => format!("{} {}px {}", t.weight, format_px(t.size), family),
                }
            }
            TokenValue::Shadow(s) => format!(
                "{}px {}px {}px {}px {}",
                format_px(s.offset_x),
                format_px(s.offset_y),
                format_px(s.blur),
                format_px(s.spread),
                s.color.to_css()
            ),
        }
    }
}

fn quant(v: f64) -> i64 {
    (v * 100.0).round() as i64
}

/// Quantized value identity, used to guarantee one token per distinct
/// promoted value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueKey {
    Color((u8, u8, u8, u8)),
    Length(i64),
    Typography(String, i64, u16),
    Shadow(i64, i64, i64, i64, (u8, u8, u8, u8)),
}

/// One place a token is referenced from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRefSite {
    pub node: NodeId,
    /// Property path on the node, e.g. `fills[0]` or `itemSpacing`.
    pub property: String,
}

/// A named, promoted token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenBinding {
    pub name: String,
    pub category: TokenCategory,
    /// Value per mode. Single-mode tokens carry one `"default"` entry;
    /// variable-backed tokens carry the variable's modes in source order.
    pub values: IndexMap<String, TokenValue>,
    pub references: Vec<TokenRefSite>,
}

impl TokenBinding {
    /// Value for the requested mode, falling back to the `"default"`
    /// mode and then to the first mode present.
    pub fn value_for(&self, mode: Option<&str>) -> Option<&TokenValue> {
        if let Some(mode) = mode {
            if let Some(v) = self.values.get(mode) {
                return Some(v);
            }
        }
        if let Some(v) = self.values.get("default") {
            return Some(v);
        }
        self.values.first().map(|(_, v)| v)
    }

    pub fn is_multi_mode(&self) -> bool {
        self.values.len() > 1
    }

    /// The CSS custom-property name (`--` + token name).
    pub fn css_variable(&self) -> String {
        format!("--{}", self.name)
    }
}

/// The collected token set for one pipeline run.
///
/// Ordered by creation (document order), so two runs over the same tree
/// produce identical sets.
#[derive(Debug, Clone, Default)]
pub struct TokenSet {
    by_name: IndexMap<String, TokenBinding>,
    by_key: FxHashMap<ValueKey, String>,
    by_variable: FxHashMap<String, String>,
}

impl TokenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&TokenBinding> {
        self.by_name.get(name)
    }

    /// Exact-match lookup by underlying value, for step (3) of the visual
    /// resolution chain.
    pub fn lookup_value(&self, value: &TokenValue) -> Option<&TokenBinding> {
        self.by_key
            .get(&value.key())
            .and_then(|name| self.by_name.get(name))
    }

    /// Lookup by the variable reference a token was created from.
    pub fn lookup_variable(&self, reference: &str) -> Option<&TokenBinding> {
        self.by_variable
            .get(reference)
            .and_then(|name| self.by_name.get(name))
    }

    /// Lookup by a recorded reference site (node id + property path).
    pub fn lookup_site(&self, node: &NodeId, property: &str) -> Option<&TokenBinding> {
        self.by_name.values().find(|token| {
            token
                .references
                .iter()
                .any(|site| site.node == *node && site.property == property)
        })
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TokenBinding> {
        self.by_name.values()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    /// All mode keys present across the set, in first-seen order.
    pub fn modes(&self) -> Vec<String> {
        let mut modes = Vec::new();
        for token in self.by_name.values() {
            for mode in token.values.keys() {
                if !modes.contains(mode) {
                    modes.push(mode.clone());
                }
            }
        }
        modes
    }

    pub(crate) fn insert(&mut self, token: TokenBinding, variable_ref: Option<String>) {
        debug_assert!(!self.by_name.contains_key(&token.name));
        if let Some(default_value) = token.value_for(None) {
            self.by_key.insert(default_value.key(), token.name.clone());
        }
        if let Some(var) = variable_ref {
            self.by_variable.insert(var, token.name.clone());
        }
        self.by_name.insert(token.name.clone(), token);
    }

    pub(crate) fn add_reference(&mut self, name: &str, site: TokenRefSite) {
        if let Some(token) = self.by_name.get_mut(name) {
            if !token.references.contains(&site) {
                token.references.push(site);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_key_quantizes_colors() {
        // Two floats that agree after 8-bit quantization share a key.
        let a = TokenValue::Color(Color::rgba(0.5, 0.25, 0.75, 1.0));
        let b = TokenValue::Color(Color::rgba(0.501, 0.2495, 0.7504, 1.0));
        assert_eq!(a.key(), b.key());

        let c = TokenValue::Color(Color::rgba(0.6, 0.25, 0.75, 1.0));
        assert_ne!(a.key(), c.key());
    }

    #[test]
    fn test_value_key_quantizes_lengths() {
        assert_eq!(
            TokenValue::Length(8.0).key(),
            TokenValue::Length(8.0001).key()
        );
        assert_ne!(TokenValue::Length(8.0).key(), TokenValue::Length(8.5).key());
    }

    #[test]
    fn test_shadow_css() {
        let v = TokenValue::Shadow(Shadow {
            offset_x: 0.0,
            offset_y: 4.0,
            blur: 12.0,
            spread: 0.0,
            color: Color::rgba(0.0, 0.0, 0.0, 0.25),
        });
        assert_eq!(v.to_css(), "0px 4px 12px 0px rgba(0, 0, 0, 0.25)");
    }

    #[test]
    fn test_lookup_by_value() {
        let mut set = TokenSet::new();
        let mut values = IndexMap::new();
        values.insert("default".to_string(), TokenValue::Length(8.0));
        set.insert(
            TokenBinding {
                name: "spacing-8".to_string(),
                category: TokenCategory::Spacing,
                values,
                references: vec![],
            },
            None,
        );

        assert!(set.lookup_value(&TokenValue::Length(8.0)).is_some());
        assert!(set.lookup_value(&TokenValue::Length(12.0)).is_none());
    }
}
