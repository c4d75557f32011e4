//! The raw input contract supplied by the design source.
//!
//! Everything here is optional by design. Sources in the wild disagree on
//! which fields exist (older trees carry `layoutGrow`/`layoutAlign`, newer
//! ones explicit `layoutSizingHorizontal`), so the structs deserialize
//! leniently and the extractor decides.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use weft_core::BindingRef;

/// A raw node as fetched from the design source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawNode {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub node_type: Option<String>,
    pub visible: Option<bool>,

    pub absolute_bounding_box: Option<RawRect>,
    pub rotation: Option<f64>,

    // Auto-layout block.
    pub layout_mode: Option<String>,
    pub item_spacing: Option<f64>,
    pub padding_top: Option<f64>,
    pub padding_right: Option<f64>,
    pub padding_bottom: Option<f64>,
    pub padding_left: Option<f64>,
    pub primary_axis_align_items: Option<String>,
    pub counter_axis_align_items: Option<String>,
    pub primary_axis_sizing_mode: Option<String>,
    pub counter_axis_sizing_mode: Option<String>,
    pub layout_wrap: Option<String>,

    // Per-node sizing: explicit fields (newer trees)...
    pub layout_sizing_horizontal: Option<String>,
    pub layout_sizing_vertical: Option<String>,
    // ...or the grow/stretch-flag encoding (older trees).
    pub layout_grow: Option<f64>,
    pub layout_align: Option<String>,

    pub min_width: Option<f64>,
    pub max_width: Option<f64>,
    pub min_height: Option<f64>,
    pub max_height: Option<f64>,

    pub fills: Option<Vec<RawPaint>>,
    pub strokes: Option<Vec<RawPaint>>,
    pub stroke_weight: Option<f64>,
    pub stroke_align: Option<String>,
    pub effects: Option<Vec<RawEffect>>,

    pub corner_radius: Option<f64>,
    pub rectangle_corner_radii: Option<[f64; 4]>,

    pub opacity: Option<f64>,
    pub blend_mode: Option<String>,

    // Text payload.
    pub characters: Option<String>,
    pub style: Option<RawTextStyle>,

    // Instance payload.
    pub component_name: Option<String>,

    /// Property name → variable alias, in whatever shape the source uses
    /// (single alias object or alias list). Parsed leniently.
    pub bound_variables: Option<Value>,

    pub children: Option<Vec<RawNode>>,
}

impl RawNode {
    /// The binding attached to a node-level property, if any.
    pub fn binding_for(&self, property: &str) -> Option<BindingRef> {
        alias_id(self.bound_variables.as_ref()?.get(property)?).map(BindingRef)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawStop {
    pub position: f64,
    pub color: Option<RawColor>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawPaint {
    #[serde(rename = "type")]
    pub paint_type: Option<String>,
    pub visible: Option<bool>,
    pub opacity: Option<f64>,
    pub color: Option<RawColor>,
    /// 2×3 affine transform, rows `[[a, c, tx], [b, d, ty]]`.
    pub gradient_transform: Option<[[f64; 3]; 2]>,
    pub gradient_stops: Option<Vec<RawStop>>,
    pub image_ref: Option<String>,
    pub scale_mode: Option<String>,
    pub bound_variables: Option<Value>,
}

impl RawPaint {
    /// The binding attached to this specific paint entry, if any.
    pub fn color_binding(&self) -> Option<BindingRef> {
        alias_id(self.bound_variables.as_ref()?.get("color")?).map(BindingRef)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawEffect {
    #[serde(rename = "type")]
    pub effect_type: Option<String>,
    pub visible: Option<bool>,
    pub offset: Option<RawOffset>,
    pub radius: Option<f64>,
    pub spread: Option<f64>,
    pub color: Option<RawColor>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawOffset {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawTextStyle {
    pub font_family: Option<String>,
    pub font_size: Option<f64>,
    pub font_weight: Option<f64>,
    pub line_height_px: Option<f64>,
    pub letter_spacing: Option<f64>,
    pub text_align_horizontal: Option<String>,
}

/// Pull a variable-alias id out of whatever shape the source used: a bare
/// string, an alias object `{ "id": ... }`, or a list of either.
fn alias_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => map.get("id").and_then(Value::as_str).map(str::to_string),
        Value::Array(items) => items.first().and_then(alias_id),
        _ => None,
    }
}
