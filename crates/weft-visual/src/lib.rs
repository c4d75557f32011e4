//! Visual resolution: paints, strokes, effects, and corners → style
//! declarations.
//!
//! Key rules, in the order they bite:
//!
//! - Source paint stacks are bottom-to-top; CSS layers are top-to-bottom,
//!   so the stack is reversed on the way out.
//! - Stroke alignment picks one of three distinct strategies: inside
//!   strokes become inset shadows (box dimensions untouched), center
//!   strokes become borders, outside strokes become non-inset shadows.
//! - Gradient angles convert from the paint transform via
//!   `90 − atan2(−b, a)`, normalized into `[0, 360)`.
//! - Every value passes the four-step resolution chain (entry binding →
//!   node binding → exact token match → raw literal), and each resolved
//!   declaration carries its provenance.

mod gradient;
mod resolve;
mod style;

pub use gradient::{css_angle, gradient_css, GradientKind};
pub use resolve::{resolve, resolve_all, VisualMap};
pub use style::{
    BackgroundLayer, BorderDecl, FilterDecl, Provenance, RadiusDecl, ShadowDecl, Sourced,
    SourcedDeclaration, StyleValue, TypographyDecl, VisualStyle,
};
