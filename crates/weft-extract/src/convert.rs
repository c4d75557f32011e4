//! Raw field → core value conversions.
//!
//! Absent fields become neutral values. A field that is present but
//! unusable is replaced by the same neutral value plus a `MalformedInput`
//! diagnostic.

use weft_core::{
    Align, BlendMode, Color, Diagnostics, DiagnosticKind, Direction, Effect, GradientPaint,
    GradientStop, ImagePaint, ImageScaleMode, LayoutConfig, NodeId, Padding, Paint,
    PaintKind, PaintTransform, Shadow, Sizing, Stroke, StrokeAlign, TextAlign, Typography,
};

use crate::raw::{RawColor, RawEffect, RawNode, RawPaint, RawTextStyle};

pub(crate) fn color(raw: &RawColor) -> Color {
    Color::rgba(
        raw.r as f32,
        raw.g as f32,
        raw.b as f32,
        raw.a.unwrap_or(1.0) as f32,
    )
}

pub(crate) fn paint(
    raw: &RawPaint,
    node: &NodeId,
    diag: &mut Diagnostics,
) -> Option<Paint> {
    if raw.visible == Some(false) {
        return None;
    }

    let kind = match raw.paint_type.as_deref() {
        Some("SOLID") | None => match &raw.color {
            Some(c) => PaintKind::Solid(color(c)),
            // A bound entry without a literal stays in the stack; the
            // visual resolver must resolve it through the binding.
            None if raw.color_binding().is_some() => PaintKind::Unresolved,
            None => {
                diag.push(
                    DiagnosticKind::MalformedInput,
                    node.clone(),
                    "solid paint without color; entry dropped",
                );
                return None;
            }
        },
        Some(t @ ("GRADIENT_LINEAR" | "GRADIENT_RADIAL" | "GRADIENT_ANGULAR")) => {
            let gradient = gradient(raw, node, diag)?;
            match t {
                "GRADIENT_LINEAR" => PaintKind::LinearGradient(gradient),
                "GRADIENT_RADIAL" => PaintKind::RadialGradient(gradient),
                _ => PaintKind::ConicGradient(gradient),
            }
        }
        Some("IMAGE") => PaintKind::Image(ImagePaint {
            asset: raw.image_ref.clone().unwrap_or_default(),
            scale_mode: match raw.scale_mode.as_deref() {
                Some("FIT") => ImageScaleMode::Fit,
                Some("TILE") => ImageScaleMode::Tile,
                Some("STRETCH") => ImageScaleMode::Stretch,
                _ => ImageScaleMode::Fill,
            },
        }),
        Some(other) => {
            diag.push(
                DiagnosticKind::MalformedInput,
                node.clone(),
                format!("unknown paint type {other:?}; entry dropped"),
            );
            return None;
        }
    };

    Some(Paint {
        kind,
        opacity: raw.opacity.unwrap_or(1.0).clamp(0.0, 1.0),
        binding: raw.color_binding(),
    })
}

fn gradient(raw: &RawPaint, node: &NodeId, diag: &mut Diagnostics) -> Option<GradientPaint> {
    let stops: Vec<GradientStop> = raw
        .gradient_stops
        .as_deref()
        .unwrap_or_default()
        .iter()
        .filter_map(|s| {
            s.color
                .as_ref()
                .map(|c| GradientStop::new(s.position.clamp(0.0, 1.0), color(c)))
        })
        .collect();

    if stops.is_empty() {
        diag.push(
            DiagnosticKind::MalformedInput,
            node.clone(),
            "gradient paint without usable stops; entry dropped",
        );
        return None;
    }

    let transform = match raw.gradient_transform {
        Some([[a, c, tx], [b, d, ty]]) => PaintTransform::from_components(a, b, c, d, tx, ty),
        None => PaintTransform::identity(),
    };

    Some(GradientPaint { transform, stops })
}

pub(crate) fn strokes(
    raw: &RawNode,
    node: &NodeId,
    diag: &mut Diagnostics,
) -> Vec<Stroke> {
    let weight = raw.stroke_weight.unwrap_or(1.0).max(0.0);
    let align = match raw.stroke_align.as_deref() {
        Some("INSIDE") => StrokeAlign::Inside,
        Some("OUTSIDE") => StrokeAlign::Outside,
        // Center is the neutral default for absent or unknown alignment.
        _ => StrokeAlign::Center,
    };

    raw.strokes
        .as_deref()
        .unwrap_or_default()
        .iter()
        .filter_map(|p| paint(p, node, diag))
        .map(|paint| Stroke {
            paint,
            weight,
            align,
        })
        .collect()
}

pub(crate) fn effect(raw: &RawEffect, node: &NodeId, diag: &mut Diagnostics) -> Option<Effect> {
    if raw.visible == Some(false) {
        return None;
    }

    let shadow = || Shadow {
        offset_x: raw.offset.map(|o| o.x).unwrap_or(0.0),
        offset_y: raw.offset.map(|o| o.y).unwrap_or(0.0),
        blur: raw.radius.unwrap_or(0.0).max(0.0),
        spread: raw.spread.unwrap_or(0.0),
        color: raw.color.as_ref().map(color).unwrap_or(Color::TRANSPARENT),
    };

    match raw.effect_type.as_deref() {
        Some("DROP_SHADOW") => Some(Effect::DropShadow(shadow())),
        Some("INNER_SHADOW") => Some(Effect::InnerShadow(shadow())),
        Some("LAYER_BLUR") => Some(Effect::LayerBlur {
            radius: raw.radius.unwrap_or(0.0).max(0.0),
        }),
        Some("BACKGROUND_BLUR") => Some(Effect::BackgroundBlur {
            radius: raw.radius.unwrap_or(0.0).max(0.0),
        }),
        other => {
            diag.push(
                DiagnosticKind::MalformedInput,
                node.clone(),
                format!("unknown effect type {other:?}; entry dropped"),
            );
            None
        }
    }
}

pub(crate) fn layout(raw: &RawNode) -> Option<LayoutConfig> {
    let direction = match raw.layout_mode.as_deref() {
        Some("HORIZONTAL") => Direction::Horizontal,
        Some("VERTICAL") => Direction::Vertical,
        _ => return None,
    };

    Some(LayoutConfig {
        direction,
        gap: raw.item_spacing.unwrap_or(0.0).max(0.0),
        padding: Padding {
            top: raw.padding_top.unwrap_or(0.0),
            right: raw.padding_right.unwrap_or(0.0),
            bottom: raw.padding_bottom.unwrap_or(0.0),
            left: raw.padding_left.unwrap_or(0.0),
        },
        primary_align: align(raw.primary_axis_align_items.as_deref()),
        counter_align: align(raw.counter_axis_align_items.as_deref()),
        wrap: raw.layout_wrap.as_deref() == Some("WRAP"),
    })
}

fn align(raw: Option<&str>) -> Align {
    match raw {
        Some("CENTER") => Align::Center,
        Some("MAX") => Align::End,
        Some("SPACE_BETWEEN") => Align::SpaceBetween,
        // Absence of an alignment value defaults to start.
        _ => Align::Start,
    }
}

/// Per-axis sizing for a node. Prefers the explicit sizing fields; falls
/// back to deriving from the container sizing modes and the child
/// grow/stretch flags.
pub(crate) fn sizing(raw: &RawNode, parent_direction: Option<Direction>) -> (Sizing, Sizing) {
    let explicit = |field: &Option<String>| match field.as_deref() {
        Some("HUG") => Some(Sizing::Hug),
        Some("FILL") => Some(Sizing::Fill),
        Some("FIXED") => Some(Sizing::Fixed),
        _ => None,
    };

    let derive = |axis: Direction| -> Sizing {
        // Container side: AUTO sizing mode means hug contents.
        if raw.layout_mode.is_some() {
            let own_direction = if raw.layout_mode.as_deref() == Some("HORIZONTAL") {
                Direction::Horizontal
            } else {
                Direction::Vertical
            };
            let mode = if axis == own_direction {
                raw.primary_axis_sizing_mode.as_deref()
            } else {
                raw.counter_axis_sizing_mode.as_deref()
            };
            if mode == Some("AUTO") {
                return Sizing::Hug;
            }
        }
        // Child side: grow on the parent's primary axis, stretch on the
        // counter axis.
        if let Some(parent) = parent_direction {
            if axis == parent && raw.layout_grow.unwrap_or(0.0) > 0.0 {
                return Sizing::Fill;
            }
            if axis != parent && raw.layout_align.as_deref() == Some("STRETCH") {
                return Sizing::Fill;
            }
        }
        Sizing::Fixed
    };

    (
        explicit(&raw.layout_sizing_horizontal).unwrap_or_else(|| derive(Direction::Horizontal)),
        explicit(&raw.layout_sizing_vertical).unwrap_or_else(|| derive(Direction::Vertical)),
    )
}

pub(crate) fn typography(style: Option<&RawTextStyle>) -> Typography {
    let Some(style) = style else {
        return Typography::default();
    };
    Typography {
        family: style.font_family.clone().unwrap_or_default(),
        size: style.font_size.unwrap_or(16.0),
        weight: style.font_weight.unwrap_or(400.0) as u16,
        line_height: style.line_height_px,
        letter_spacing: style.letter_spacing,
        align: match style.text_align_horizontal.as_deref() {
            Some("CENTER") => TextAlign::Center,
            Some("RIGHT") => TextAlign::Right,
            Some("JUSTIFIED") => TextAlign::Justify,
            _ => TextAlign::Left,
        },
    }
}

pub(crate) fn blend_mode(raw: Option<&str>) -> BlendMode {
    match raw {
        Some("MULTIPLY") => BlendMode::Multiply,
        Some("SCREEN") => BlendMode::Screen,
        Some("OVERLAY") => BlendMode::Overlay,
        Some("DARKEN") => BlendMode::Darken,
        Some("LIGHTEN") => BlendMode::Lighten,
        Some("COLOR_DODGE") => BlendMode::ColorDodge,
        Some("COLOR_BURN") => BlendMode::ColorBurn,
        Some("HARD_LIGHT") => BlendMode::HardLight,
        Some("SOFT_LIGHT") => BlendMode::SoftLight,
        Some("DIFFERENCE") => BlendMode::Difference,
        Some("EXCLUSION") => BlendMode::Exclusion,
        Some("HUE") => BlendMode::Hue,
        Some("SATURATION") => BlendMode::Saturation,
        Some("COLOR") => BlendMode::Color,
        Some("LUMINOSITY") => BlendMode::Luminosity,
        _ => BlendMode::Normal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node_id() -> NodeId {
        NodeId::from("t:1")
    }

    #[test]
    fn test_solid_paint_without_color_is_dropped_with_diagnostic() {
        let raw: RawPaint = serde_json::from_value(json!({ "type": "SOLID" })).unwrap();
        let mut diags = Diagnostics::new();
        assert!(paint(&raw, &node_id(), &mut diags).is_none());
        assert_eq!(diags.count_of(DiagnosticKind::MalformedInput), 1);
    }

    #[test]
    fn test_invisible_paint_is_skipped_silently() {
        let raw: RawPaint = serde_json::from_value(json!({
            "type": "SOLID",
            "visible": false,
            "color": { "r": 1.0, "g": 1.0, "b": 1.0 }
        }))
        .unwrap();
        let mut diags = Diagnostics::new();
        assert!(paint(&raw, &node_id(), &mut diags).is_none());
        assert!(diags.is_empty());
    }

    #[test]
    fn test_sizing_prefers_explicit_fields() {
        let raw: RawNode = serde_json::from_value(json!({
            "id": "1",
            "type": "FRAME",
            "layoutSizingHorizontal": "FILL",
            "layoutSizingVertical": "HUG",
            "layoutGrow": 0.0
        }))
        .unwrap();
        let (x, y) = sizing(&raw, Some(Direction::Vertical));
        assert_eq!(x, Sizing::Fill);
        assert_eq!(y, Sizing::Hug);
    }

    #[test]
    fn test_sizing_derives_from_grow_and_stretch() {
        let raw: RawNode = serde_json::from_value(json!({
            "id": "1",
            "type": "RECTANGLE",
            "layoutGrow": 1.0,
            "layoutAlign": "STRETCH"
        }))
        .unwrap();
        // Parent lays out horizontally: grow applies to x, stretch to y.
        let (x, y) = sizing(&raw, Some(Direction::Horizontal));
        assert_eq!(x, Sizing::Fill);
        assert_eq!(y, Sizing::Fill);

        // Without a layout parent nothing fills.
        let (x, y) = sizing(&raw, None);
        assert_eq!(x, Sizing::Fixed);
        assert_eq!(y, Sizing::Fixed);
    }

    #[test]
    fn test_container_auto_means_hug() {
        let raw: RawNode = serde_json::from_value(json!({
            "id": "1",
            "type": "FRAME",
            "layoutMode": "VERTICAL",
            "primaryAxisSizingMode": "AUTO",
            "counterAxisSizingMode": "FIXED"
        }))
        .unwrap();
        let (x, y) = sizing(&raw, None);
        assert_eq!(y, Sizing::Hug);
        assert_eq!(x, Sizing::Fixed);
    }

    #[test]
    fn test_layout_requires_layout_mode() {
        let raw: RawNode = serde_json::from_value(json!({ "id": "1", "type": "FRAME" })).unwrap();
        assert!(layout(&raw).is_none());

        let raw: RawNode = serde_json::from_value(json!({
            "id": "1",
            "type": "FRAME",
            "layoutMode": "HORIZONTAL",
            "itemSpacing": 8.0,
            "primaryAxisAlignItems": "SPACE_BETWEEN"
        }))
        .unwrap();
        let config = layout(&raw).unwrap();
        assert_eq!(config.direction, Direction::Horizontal);
        assert_eq!(config.gap, 8.0);
        assert_eq!(config.primary_align, Align::SpaceBetween);
        assert_eq!(config.counter_align, Align::Start);
    }
}
