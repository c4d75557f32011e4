//! Resolved visual style and its declaration forms.

use serde::{Deserialize, Serialize};

use weft_core::{
    format_px, Color, CornerRadii, GradientPaint, ImagePaint, NodeId, Shadow, Typography,
};

use crate::gradient::{self, GradientKind};

/// Where a resolved value came from. Kept on every declaration for
/// reporting and for re-resolution when token names change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Provenance {
    /// The literal raw value, no reference.
    Raw,
    /// A promoted token; the value is consumed through the token name.
    Token(String),
    /// A variable binding that resolved but was not promoted to a token.
    Variable(String),
}

impl Provenance {
    pub fn is_token(&self) -> bool {
        matches!(self, Provenance::Token(_))
    }
}

/// A value plus its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sourced<T> {
    pub value: T,
    pub provenance: Provenance,
}

impl<T> Sourced<T> {
    pub fn raw(value: T) -> Self {
        Self {
            value,
            provenance: Provenance::Raw,
        }
    }

    pub fn with(value: T, provenance: Provenance) -> Self {
        Self { value, provenance }
    }
}

/// One background layer, top-to-bottom CSS order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BackgroundLayer {
    Color(Color),
    Linear(GradientPaint),
    Radial(GradientPaint),
    Conic(GradientPaint),
    Image(ImagePaint),
}

impl BackgroundLayer {
    /// Full-fidelity CSS for this layer.
    pub fn to_css(&self) -> String {
        match self {
            Self::Color(c) => c.to_css(),
            Self::Linear(p) => gradient::render(GradientKind::Linear, p),
            Self::Radial(p) => gradient::render(GradientKind::Radial, p),
            Self::Conic(p) => gradient::render(GradientKind::Conic, p),
            Self::Image(p) => format!("url({})", p.asset),
        }
    }

    pub fn is_conic(&self) -> bool {
        matches!(self, Self::Conic(_))
    }
}

/// A center-aligned stroke rendered as a conventional border.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorderDecl {
    pub weight: f64,
    pub color: Sourced<Color>,
}

impl BorderDecl {
    pub fn to_css(&self) -> String {
        let color = match &self.color.provenance {
            Provenance::Token(name) => format!("var(--{name})"),
            _ => self.color.value.to_css(),
        };
        format!("{}px solid {}", format_px(self.weight), color)
    }
}

/// One box-shadow entry: either a stroke emulation ring or a shadow
/// effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadowDecl {
    pub inset: bool,
    pub offset_x: f64,
    pub offset_y: f64,
    pub blur: f64,
    pub spread: f64,
    pub color: Color,
}

impl ShadowDecl {
    /// A zero-offset, zero-blur spread ring emulating a stroke.
    pub fn ring(weight: f64, color: Color, inset: bool) -> Self {
        Self {
            inset,
            offset_x: 0.0,
            offset_y: 0.0,
            blur: 0.0,
            spread: weight,
            color,
        }
    }

    pub fn from_effect(shadow: &Shadow, inset: bool) -> Self {
        Self {
            inset,
            offset_x: shadow.offset_x,
            offset_y: shadow.offset_y,
            blur: shadow.blur,
            spread: shadow.spread,
            color: shadow.color,
        }
    }

    pub fn to_css(&self) -> String {
        let body = format!(
            "{}px {}px {}px {}px {}",
            format_px(self.offset_x),
            format_px(self.offset_y),
            format_px(self.blur),
            format_px(self.spread),
            self.color.to_css()
        );
        if self.inset {
            format!("inset {body}")
        } else {
            body
        }
    }
}

/// Corner radii declaration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RadiusDecl {
    /// All four corners agree; collapses to the shorthand.
    Uniform(f64),
    PerCorner(CornerRadii),
}

impl RadiusDecl {
    pub fn to_css(&self) -> String {
        match self {
            Self::Uniform(r) => format!("{}px", format_px(*r)),
            Self::PerCorner(c) => format!(
                "{}px {}px {}px {}px",
                format_px(c.top_left),
                format_px(c.top_right),
                format_px(c.bottom_right),
                format_px(c.bottom_left)
            ),
        }
    }
}

/// Blur effects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FilterDecl {
    Blur(f64),
    BackdropBlur(f64),
}

/// Resolved text styling (kept typed so the emitter can split it into
/// individual declarations).
pub type TypographyDecl = Typography;

/// A declaration value; backgrounds stay structured until emission so the
/// serializer can apply dialect fallbacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StyleValue {
    Text(String),
    Layers(Vec<Sourced<BackgroundLayer>>),
}

/// A declaration plus the provenance that routes it to a stylesheet
/// layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcedDeclaration {
    pub property: String,
    pub value: StyleValue,
    pub provenance: Provenance,
}

impl SourcedDeclaration {
    fn text(property: &str, value: impl Into<String>, provenance: Provenance) -> Self {
        Self {
            property: property.to_string(),
            value: StyleValue::Text(value.into()),
            provenance,
        }
    }
}

/// The resolved visual style of one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualStyle {
    pub node: NodeId,
    /// Background layers, already reversed into CSS order.
    pub background: Vec<Sourced<BackgroundLayer>>,
    /// Foreground color for text nodes.
    pub text_color: Option<Sourced<Color>>,
    pub border: Option<BorderDecl>,
    /// Stroke-emulation rings first, then shadow effects in declaration
    /// order.
    pub shadows: Vec<Sourced<ShadowDecl>>,
    pub radius: Option<Sourced<RadiusDecl>>,
    pub filters: Vec<FilterDecl>,
    /// Present when below 1.
    pub opacity: Option<f64>,
    /// CSS mix-blend-mode value when not normal.
    pub blend_mode: Option<String>,
    pub typography: Option<Sourced<TypographyDecl>>,
}

impl VisualStyle {
    pub fn new(node: NodeId) -> Self {
        Self {
            node,
            background: Vec::new(),
            text_color: None,
            border: None,
            shadows: Vec::new(),
            radius: None,
            filters: Vec::new(),
            opacity: None,
            blend_mode: None,
            typography: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.background.is_empty()
            && self.text_color.is_none()
            && self.border.is_none()
            && self.shadows.is_empty()
            && self.radius.is_none()
            && self.filters.is_empty()
            && self.opacity.is_none()
            && self.blend_mode.is_none()
            && self.typography.is_none()
    }

    /// Flatten into declarations, each tagged with the provenance that
    /// decides its stylesheet layer.
    pub fn declarations(&self) -> Vec<SourcedDeclaration> {
        let mut out = Vec::new();

        if !self.background.is_empty() {
            let provenance = self
                .background
                .iter()
                .find(|l| l.provenance.is_token())
                .map(|l| l.provenance.clone())
                .unwrap_or(Provenance::Raw);
            out.push(SourcedDeclaration {
                property: "background".to_string(),
                value: StyleValue::Layers(self.background.clone()),
                provenance,
            });
        }

        if let Some(color) = &self.text_color {
            let value = match &color.provenance {
                Provenance::Token(name) => format!("var(--{name})"),
                _ => color.value.to_css(),
            };
            out.push(SourcedDeclaration::text(
                "color",
                value,
                color.provenance.clone(),
            ));
        }

        if let Some(border) = &self.border {
            out.push(SourcedDeclaration::text(
                "border",
                border.to_css(),
                border.color.provenance.clone(),
            ));
        }

        if !self.shadows.is_empty() {
            let parts: Vec<String> = self
                .shadows
                .iter()
                .map(|s| match &s.provenance {
                    Provenance::Token(name) if s.value.inset => {
                        format!("inset var(--{name})")
                    }
                    Provenance::Token(name) => format!("var(--{name})"),
                    _ => s.value.to_css(),
                })
                .collect();
            let provenance = self
                .shadows
                .iter()
                .find(|s| s.provenance.is_token())
                .map(|s| s.provenance.clone())
                .unwrap_or(Provenance::Raw);
            out.push(SourcedDeclaration::text(
                "box-shadow",
                parts.join(", "),
                provenance,
            ));
        }

        if let Some(radius) = &self.radius {
            let value = match &radius.provenance {
                Provenance::Token(name) => format!("var(--{name})"),
                _ => radius.value.to_css(),
            };
            out.push(SourcedDeclaration::text(
                "border-radius",
                value,
                radius.provenance.clone(),
            ));
        }

        for filter in &self.filters {
            match filter {
                FilterDecl::Blur(r) => out.push(SourcedDeclaration::text(
                    "filter",
                    format!("blur({}px)", format_px(*r)),
                    Provenance::Raw,
                )),
                FilterDecl::BackdropBlur(r) => out.push(SourcedDeclaration::text(
                    "backdrop-filter",
                    format!("blur({}px)", format_px(*r)),
                    Provenance::Raw,
                )),
            }
        }

        if let Some(opacity) = self.opacity {
            out.push(SourcedDeclaration::text(
                "opacity",
                format_px(opacity),
                Provenance::Raw,
            ));
        }

        if let Some(blend) = &self.blend_mode {
            out.push(SourcedDeclaration::text(
                "mix-blend-mode",
                blend.clone(),
                Provenance::Raw,
            ));
        }

        if let Some(typography) = &self.typography {
            match &typography.provenance {
                Provenance::Token(name) => out.push(SourcedDeclaration::text(
                    "font",
                    format!("var(--{name})"),
                    typography.provenance.clone(),
                )),
                _ => {
                    let t = &typography.value;
                    if !t.family.is_empty() {
                        out.push(SourcedDeclaration::text(
                            "font-family",
                            t.family.clone(),
                            Provenance::Raw,
                        ));
                    }
                    out.push(SourcedDeclaration::text(
                        "font-size",
                        format!("{}px", format_px(t.size)),
                        Provenance::Raw,
                    ));
                    if t.weight != 400 {
                        out.push(SourcedDeclaration::text(
                            "font-weight",
                            t.weight.to_string(),
                            Provenance::Raw,
                        ));
                    }
                    if let Some(lh) = t.line_height {
                        out.push(SourcedDeclaration::text(
                            "line-height",
                            format!("{}px", format_px(lh)),
                            Provenance::Raw,
                        ));
                    }
                    if let Some(ls) = t.letter_spacing {
                        out.push(SourcedDeclaration::text(
                            "letter-spacing",
                            format!("{}px", format_px(ls)),
                            Provenance::Raw,
                        ));
                    }
                    if t.align != weft_core::TextAlign::Left {
                        let align = match t.align {
                            weft_core::TextAlign::Center => "center",
                            weft_core::TextAlign::Right => "right",
                            weft_core::TextAlign::Justify => "justify",
                            weft_core::TextAlign::Left => "left",
                        };
                        out.push(SourcedDeclaration::text(
                            "text-align",
                            align,
                            Provenance::Raw,
                        ));
                    }
                }
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inset_ring_css() {
        let ring = ShadowDecl::ring(2.0, Color::from_rgb8(0, 0, 0), true);
        assert_eq!(ring.to_css(), "inset 0px 0px 0px 2px #000000");
    }

    #[test]
    fn test_border_with_token_color() {
        let border = BorderDecl {
            weight: 1.0,
            color: Sourced::with(
                Color::from_rgb8(10, 20, 30),
                Provenance::Token("color-neutral".to_string()),
            ),
        };
        assert_eq!(border.to_css(), "1px solid var(--color-neutral)");
    }

    #[test]
    fn test_radius_shorthand_only_when_uniform() {
        assert_eq!(RadiusDecl::Uniform(8.0).to_css(), "8px");
        let mixed = RadiusDecl::PerCorner(CornerRadii {
            top_left: 8.0,
            top_right: 8.0,
            bottom_right: 0.0,
            bottom_left: 0.0,
        });
        assert_eq!(mixed.to_css(), "8px 8px 0px 0px");
    }

    #[test]
    fn test_declarations_route_token_provenance() {
        let mut style = VisualStyle::new(NodeId::from("n"));
        style.background.push(Sourced::with(
            BackgroundLayer::Color(Color::from_rgb8(30, 100, 255)),
            Provenance::Token("color-primary".to_string()),
        ));
        style.radius = Some(Sourced::raw(RadiusDecl::Uniform(4.0)));

        let decls = style.declarations();
        assert_eq!(decls.len(), 2);
        assert!(decls[0].provenance.is_token());
        assert_eq!(decls[1].property, "border-radius");
        assert_eq!(decls[1].provenance, Provenance::Raw);
    }
}
