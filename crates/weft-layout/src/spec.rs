//! Resolved per-node layout rules.

use serde::{Deserialize, Serialize};

use weft_core::{format_px, Align, Declaration, NodeId, Padding, SizeConstraints};

/// Flex direction of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlexDirection {
    Row,
    Column,
}

impl FlexDirection {
    pub fn as_css(&self) -> &'static str {
        match self {
            Self::Row => "row",
            Self::Column => "column",
        }
    }
}

/// A resolved dimension.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SizeValue {
    /// Explicit pixel dimension (Fixed sizing).
    Px(f64),
    /// Intrinsic sizing (Hug): content determines the dimension.
    FitContent,
}

impl SizeValue {
    fn as_css(&self) -> String {
        match self {
            Self::Px(v) => format!("{}px", format_px(*v)),
            Self::FitContent => "fit-content".to_string(),
        }
    }
}

/// The individually addressable layout properties. Used for diffing
/// breakpoint variants and for the direction-change reset list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutField {
    Display,
    Direction,
    Wrap,
    Justify,
    AlignItems,
    Gap,
    Padding,
    Width,
    Height,
    MinWidth,
    MaxWidth,
    MinHeight,
    MaxHeight,
    Grow,
    Shrink,
    Basis,
    AlignSelf,
}

impl LayoutField {
    pub const ALL: [LayoutField; 17] = [
        LayoutField::Display,
        LayoutField::Direction,
        LayoutField::Wrap,
        LayoutField::Justify,
        LayoutField::AlignItems,
        LayoutField::Gap,
        LayoutField::Padding,
        LayoutField::Width,
        LayoutField::Height,
        LayoutField::MinWidth,
        LayoutField::MaxWidth,
        LayoutField::MinHeight,
        LayoutField::MaxHeight,
        LayoutField::Grow,
        LayoutField::Shrink,
        LayoutField::Basis,
        LayoutField::AlignSelf,
    ];

    /// Properties re-emitted whenever the layout direction changes between
    /// breakpoints, so stale inherited values cannot leak through.
    pub const DIRECTION_RESET: [LayoutField; 4] = [
        LayoutField::AlignItems,
        LayoutField::Grow,
        LayoutField::Shrink,
        LayoutField::Basis,
    ];
}

/// Resolved flex layout for one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSpec {
    pub node: NodeId,
    /// True when the node is a layout-enabled container.
    pub flex_container: bool,
    pub direction: Option<FlexDirection>,
    pub wrap: bool,
    pub justify: Align,
    pub align_items: Align,
    pub gap: Option<f64>,
    pub padding: Option<Padding>,
    pub width: Option<SizeValue>,
    pub height: Option<SizeValue>,
    pub constraints: SizeConstraints,
    /// Proportional growth along the parent's primary axis.
    pub grow: Option<f64>,
    pub shrink: Option<f64>,
    /// Flex basis in pixels. Fill on the primary axis forces `Some(0.0)`
    /// so distribution is uniform regardless of content size.
    pub basis: Option<f64>,
    /// Stretch across the parent's counter axis.
    pub stretch_counter: bool,
    /// Breakpoint label when this spec belongs to a responsive family.
    pub breakpoint: Option<String>,
}

impl LayoutSpec {
    pub fn new(node: NodeId) -> Self {
        Self {
            node,
            flex_container: false,
            direction: None,
            wrap: false,
            justify: Align::Start,
            align_items: Align::Start,
            gap: None,
            padding: None,
            width: None,
            height: None,
            constraints: SizeConstraints::default(),
            grow: None,
            shrink: None,
            basis: None,
            stretch_counter: false,
            breakpoint: None,
        }
    }

    /// Declarations in natural emission order, defaults omitted.
    pub fn css_declarations(&self) -> Vec<Declaration> {
        LayoutField::ALL
            .iter()
            .filter_map(|f| self.declaration(*f))
            .collect()
    }

    /// Declarations for a specific field set, in canonical field order.
    /// Fields from the reset list are emitted with explicit defaults even
    /// when they would normally be omitted.
    pub fn declarations_for(&self, fields: &[LayoutField]) -> Vec<Declaration> {
        LayoutField::ALL
            .iter()
            .filter(|f| fields.contains(*f))
            .filter_map(|f| {
                self.declaration(*f).or_else(|| {
                    if LayoutField::DIRECTION_RESET.contains(f) {
                        Some(self.explicit_declaration(*f))
                    } else {
                        None
                    }
                })
            })
            .collect()
    }

    /// Fields whose emitted declaration differs from `prev`.
    pub fn diff_fields(&self, prev: &LayoutSpec) -> Vec<LayoutField> {
        LayoutField::ALL
            .iter()
            .copied()
            .filter(|f| self.declaration(*f) != prev.declaration(*f))
            .collect()
    }

    fn declaration(&self, field: LayoutField) -> Option<Declaration> {
        match field {
            LayoutField::Display => self
                .flex_container
                .then(|| Declaration::new("display", "flex")),
            LayoutField::Direction => self
                .direction
                .filter(|_| self.flex_container)
                .map(|d| Declaration::new("flex-direction", d.as_css())),
            LayoutField::Wrap => (self.flex_container && self.wrap)
                .then(|| Declaration::new("flex-wrap", "wrap")),
            LayoutField::Justify => (self.flex_container && self.justify != Align::Start)
                .then(|| Declaration::new("justify-content", justify_css(self.justify))),
            LayoutField::AlignItems => (self.flex_container && self.align_items != Align::Start)
                .then(|| Declaration::new("align-items", align_css(self.align_items))),
            LayoutField::Gap => self
                .gap
                .filter(|g| *g > 0.0)
                .map(|g| Declaration::new("gap", format!("{}px", format_px(g)))),
            LayoutField::Padding => self
                .padding
                .filter(|p| !p.is_zero())
                .map(|p| Declaration::new("padding", padding_css(&p))),
            LayoutField::Width => self
                .width
                .map(|w| Declaration::new("width", w.as_css())),
            LayoutField::Height => self
                .height
                .map(|h| Declaration::new("height", h.as_css())),
            LayoutField::MinWidth => self
                .constraints
                .min_width
                .map(|v| Declaration::new("min-width", format!("{}px", format_px(v)))),
            LayoutField::MaxWidth => self
                .constraints
                .max_width
                .map(|v| Declaration::new("max-width", format!("{}px", format_px(v)))),
            LayoutField::MinHeight => self
                .constraints
                .min_height
                .map(|v| Declaration::new("min-height", format!("{}px", format_px(v)))),
            LayoutField::MaxHeight => self
                .constraints
                .max_height
                .map(|v| Declaration::new("max-height", format!("{}px", format_px(v)))),
            LayoutField::Grow => self
                .grow
                .filter(|g| *g > 0.0)
                .map(|g| Declaration::new("flex-grow", format_px(g))),
            LayoutField::Shrink => self
                .shrink
                .map(|s| Declaration::new("flex-shrink", format_px(s))),
            LayoutField::Basis => self
                .basis
                .map(|b| Declaration::new("flex-basis", format_px(b))),
            LayoutField::AlignSelf => self
                .stretch_counter
                .then(|| Declaration::new("align-self", "stretch")),
        }
    }

    /// The field's declaration with its default made explicit. Used for
    /// the direction-change reset list.
    fn explicit_declaration(&self, field: LayoutField) -> Declaration {
        match field {
            LayoutField::AlignItems => {
                Declaration::new("align-items", align_css(self.align_items))
            }
            LayoutField::Grow => Declaration::new("flex-grow", format_px(self.grow.unwrap_or(0.0))),
            LayoutField::Shrink => {
                Declaration::new("flex-shrink", format_px(self.shrink.unwrap_or(1.0)))
            }
            LayoutField::Basis => match self.basis {
                Some(b) => Declaration::new("flex-basis", format_px(b)),
                None => Declaration::new("flex-basis", "auto"),
            },
            _ => self
                .declaration(field)
                .unwrap_or_else(|| Declaration::new("all", "unset")),
        }
    }
}

fn justify_css(align: Align) -> &'static str {
    match align {
        Align::Start => "flex-start",
        Align::Center => "center",
        Align::End => "flex-end",
        Align::SpaceBetween => "space-between",
    }
}

fn align_css(align: Align) -> &'static str {
    match align {
        Align::Start => "flex-start",
        Align::Center => "center",
        Align::End => "flex-end",
        // Space-between has no meaning on the counter axis.
        Align::SpaceBetween => "flex-start",
    }
}

/// The CSS `padding` shorthand for a padding block: one value when
/// uniform, two when symmetric, four otherwise.
pub fn padding_shorthand(p: &Padding) -> String {
    padding_css(p)
}

fn padding_css(p: &Padding) -> String {
    let (t, r, b, l) = (
        format_px(p.top),
        format_px(p.right),
        format_px(p.bottom),
        format_px(p.left),
    );
    if t == b && r == l {
        if t == r {
            format!("{t}px")
        } else {
            format!("{t}px {r}px")
        }
    } else {
        format!("{t}px {r}px {b}px {l}px")
    }
}
