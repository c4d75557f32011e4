//! Paint, effect, and geometry value types.

use glam::{DMat2, DVec2};
use serde::{Deserialize, Serialize};

use crate::variables::BindingRef;

/// A color value with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create from 8-bit RGB values.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: 1.0,
        }
    }

    /// Create from hex string (e.g., "#FF5733" or "FF5733", with optional alpha).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() == 6 {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Self::from_rgb8(r, g, b))
        } else if hex.len() == 8 {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            let a = u8::from_str_radix(&hex[6..8], 16).ok()?;
            Some(Self::rgba(
                r as f32 / 255.0,
                g as f32 / 255.0,
                b as f32 / 255.0,
                a as f32 / 255.0,
            ))
        } else {
            None
        }
    }

    /// Convert to 8-bit RGBA tuple. This is also the quantization used for
    /// token value identity.
    pub fn to_rgba8(&self) -> (u8, u8, u8, u8) {
        (
            (self.r.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.g.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.b.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.a.clamp(0.0, 1.0) * 255.0).round() as u8,
        )
    }

    /// Convert to hex string (e.g., "#FF5733", with alpha suffix when not opaque).
    pub fn to_hex(&self) -> String {
        let (r, g, b, a) = self.to_rgba8();
        if a == 255 {
            format!("#{:02X}{:02X}{:02X}", r, g, b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", r, g, b, a)
        }
    }

    /// Render as a CSS color value: hex when opaque, `rgba(...)` otherwise.
    pub fn to_css(&self) -> String {
        let (r, g, b, a) = self.to_rgba8();
        if a == 255 {
            format!("#{:02x}{:02x}{:02x}", r, g, b)
        } else {
            format!("rgba({}, {}, {}, {:.2})", r, g, b, self.a)
        }
    }

    /// Hue and saturation of the color in HSL space.
    ///
    /// Returns `(hue_degrees, saturation)` with hue in `[0, 360)`.
    pub fn hue_saturation(&self) -> (f64, f64) {
        let r = self.r as f64;
        let g = self.g as f64;
        let b = self.b as f64;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        if delta < f64::EPSILON {
            return (0.0, 0.0);
        }

        let hue = if (max - r).abs() < f64::EPSILON {
            60.0 * (((g - b) / delta).rem_euclid(6.0))
        } else if (max - g).abs() < f64::EPSILON {
            60.0 * ((b - r) / delta + 2.0)
        } else {
            60.0 * ((r - g) / delta + 4.0)
        };

        let lightness = (max + min) / 2.0;
        let saturation = delta / (1.0 - (2.0 * lightness - 1.0).abs());

        (hue.rem_euclid(360.0), saturation)
    }

    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// A color stop in a gradient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Position along the gradient (0.0 to 1.0).
    pub position: f64,
    /// Color at this position.
    pub color: Color,
}

impl GradientStop {
    pub fn new(position: f64, color: Color) -> Self {
        Self { position, color }
    }
}

/// The affine transform carried by a gradient paint.
///
/// The linear part maps the unit gradient axis into the node's box; the
/// translation positions it. Column-major: the matrix columns are
/// `(a, b)` and `(c, d)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaintTransform {
    pub matrix: DMat2,
    pub translation: DVec2,
}

impl PaintTransform {
    pub fn identity() -> Self {
        Self {
            matrix: DMat2::IDENTITY,
            translation: DVec2::ZERO,
        }
    }

    pub fn from_components(a: f64, b: f64, c: f64, d: f64, tx: f64, ty: f64) -> Self {
        Self {
            matrix: DMat2::from_cols(DVec2::new(a, b), DVec2::new(c, d)),
            translation: DVec2::new(tx, ty),
        }
    }

    /// Rotation encoded by the linear part, in degrees: `atan2(-b, a)`.
    ///
    /// The design tool's y axis points down, hence the sign flip on `b`.
    pub fn angle_degrees(&self) -> f64 {
        let a = self.matrix.x_axis.x;
        let b = self.matrix.x_axis.y;
        (-b).atan2(a).to_degrees()
    }
}

impl Default for PaintTransform {
    fn default() -> Self {
        Self::identity()
    }
}

/// A gradient paint: transform plus ordered color stops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientPaint {
    pub transform: PaintTransform,
    pub stops: Vec<GradientStop>,
}

/// An image paint referencing an external asset by content identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagePaint {
    /// Content-identity reference for the image data.
    pub asset: String,
    pub scale_mode: ImageScaleMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageScaleMode {
    Fill,
    Fit,
    Tile,
    Stretch,
}

/// The kind of a single paint entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PaintKind {
    Solid(Color),
    LinearGradient(GradientPaint),
    RadialGradient(GradientPaint),
    ConicGradient(GradientPaint),
    Image(ImagePaint),
    /// A paint that exists only through its variable binding: the source
    /// carried no literal value. Resolution must succeed through the
    /// binding or the chain is exhausted.
    Unresolved,
}

/// One entry in a fill or stroke paint stack.
///
/// Paint stacks are kept in source order (bottom-to-top); the visual
/// resolver reverses them for CSS emission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paint {
    pub kind: PaintKind,
    /// Per-paint opacity multiplier.
    pub opacity: f64,
    /// A variable binding attached to this specific entry, if any.
    pub binding: Option<BindingRef>,
}

impl Paint {
    pub fn solid(color: Color) -> Self {
        Self {
            kind: PaintKind::Solid(color),
            opacity: 1.0,
            binding: None,
        }
    }
}

/// Stroke alignment relative to the node boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrokeAlign {
    Inside,
    Center,
    Outside,
}

/// A stroke: paint, weight, and alignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub paint: Paint,
    pub weight: f64,
    pub align: StrokeAlign,
}

/// A shadow effect payload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    /// Horizontal offset (positive = right).
    pub offset_x: f64,
    /// Vertical offset (positive = down).
    pub offset_y: f64,
    /// Blur radius (0 = sharp edge).
    pub blur: f64,
    /// Spread radius.
    pub spread: f64,
    pub color: Color,
}

/// A visual effect. Effects stack in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    DropShadow(Shadow),
    InnerShadow(Shadow),
    LayerBlur { radius: f64 },
    BackgroundBlur { radius: f64 },
}

/// Per-corner radii. Independent values are allowed; the visual resolver
/// collapses to a shorthand only when all four agree.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CornerRadii {
    pub top_left: f64,
    pub top_right: f64,
    pub bottom_right: f64,
    pub bottom_left: f64,
}

impl CornerRadii {
    pub fn uniform(radius: f64) -> Self {
        Self {
            top_left: radius,
            top_right: radius,
            bottom_right: radius,
            bottom_left: radius,
        }
    }

    /// The shared radius if all four corners agree.
    pub fn as_uniform(&self) -> Option<f64> {
        if self.top_left == self.top_right
            && self.top_right == self.bottom_right
            && self.bottom_right == self.bottom_left
        {
            Some(self.top_left)
        } else {
            None
        }
    }

    pub fn is_zero(&self) -> bool {
        self.as_uniform() == Some(0.0)
    }
}

/// Blend modes supported by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Hue,
    Saturation,
    Color,
    Luminosity,
}

impl BlendMode {
    /// CSS `mix-blend-mode` value, or `None` for the default mode.
    pub fn as_css(&self) -> Option<&'static str> {
        match self {
            Self::Normal => None,
            Self::Multiply => Some("multiply"),
            Self::Screen => Some("screen"),
            Self::Overlay => Some("overlay"),
            Self::Darken => Some("darken"),
            Self::Lighten => Some("lighten"),
            Self::ColorDodge => Some("color-dodge"),
            Self::ColorBurn => Some("color-burn"),
            Self::HardLight => Some("hard-light"),
            Self::SoftLight => Some("soft-light"),
            Self::Difference => Some("difference"),
            Self::Exclusion => Some("exclusion"),
            Self::Hue => Some("hue"),
            Self::Saturation => Some("saturation"),
            Self::Color => Some("color"),
            Self::Luminosity => Some("luminosity"),
        }
    }
}

/// Resolved text styling for a text node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Typography {
    pub family: String,
    pub size: f64,
    pub weight: u16,
    pub line_height: Option<f64>,
    pub letter_spacing: Option<f64>,
    pub align: TextAlign,
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            family: String::new(),
            size: 16.0,
            weight: 400,
            line_height: None,
            letter_spacing: None,
            align: TextAlign::Left,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// Format a pixel quantity the way stylesheets expect: integral values
/// without a fractional part, everything else trimmed to two decimals.
pub fn format_px(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        let s = format!("{:.2}", value);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex_round_trip() {
        let c = Color::from_hex("#FF5733").unwrap();
        assert_eq!(c.to_hex(), "#FF5733");
    }

    #[test]
    fn test_color_to_css_opaque_and_alpha() {
        assert_eq!(Color::from_rgb8(17, 34, 51).to_css(), "#112233");
        let translucent = Color::rgba(1.0, 0.0, 0.0, 0.5);
        assert!(translucent.to_css().starts_with("rgba(255, 0, 0,"));
    }

    #[test]
    fn test_hue_saturation_of_gray_is_neutral() {
        let (_, s) = Color::from_rgb8(120, 120, 120).hue_saturation();
        assert!(s < 0.01);
    }

    #[test]
    fn test_hue_of_pure_blue() {
        let (h, s) = Color::from_rgb8(0, 0, 255).hue_saturation();
        assert!((h - 240.0).abs() < 0.5);
        assert!(s > 0.9);
    }

    #[test]
    fn test_paint_transform_identity_angle() {
        assert_eq!(PaintTransform::identity().angle_degrees(), 0.0);
    }

    #[test]
    fn test_corner_radii_uniform_collapse() {
        assert_eq!(CornerRadii::uniform(8.0).as_uniform(), Some(8.0));
        let mixed = CornerRadii {
            top_left: 8.0,
            top_right: 8.0,
            bottom_right: 4.0,
            bottom_left: 8.0,
        };
        assert_eq!(mixed.as_uniform(), None);
    }

    #[test]
    fn test_format_px() {
        assert_eq!(format_px(8.0), "8");
        assert_eq!(format_px(7.5), "7.5");
        assert_eq!(format_px(0.25), "0.25");
    }
}
