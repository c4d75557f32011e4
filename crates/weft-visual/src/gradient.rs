//! Gradient geometry and CSS rendering.

use weft_core::{format_px, GradientPaint, GradientStop, PaintTransform};

/// Convert a paint transform into a CSS gradient angle.
///
/// The paint's linear part encodes the gradient axis as a rotation
/// `atan2(-b, a)`; CSS measures gradient angles clockwise from the top,
/// so the conversion is `90 − angle`, normalized into `[0, 360)`. The
/// identity transform (a horizontal, left-to-right gradient) therefore
/// lands on 90°.
pub fn css_angle(transform: &PaintTransform) -> f64 {
    (90.0 - transform.angle_degrees()).rem_euclid(360.0)
}

/// Render stops as `#rrggbb p%` pairs.
fn stops_css(stops: &[GradientStop]) -> String {
    stops
        .iter()
        .map(|s| format!("{} {}%", s.color.to_css(), format_px(s.position * 100.0)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Gradient flavors the resolver can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientKind {
    Linear,
    Radial,
    Conic,
}

/// Render a gradient paint as a CSS image value.
pub fn gradient_css(kind: GradientKind, paint: &GradientPaint) -> String {
    render(kind, paint)
}

pub(crate) fn render(kind: GradientKind, paint: &GradientPaint) -> String {
    match kind {
        GradientKind::Linear => format!(
            "linear-gradient({}deg, {})",
            format_px(css_angle(&paint.transform)),
            stops_css(&paint.stops)
        ),
        GradientKind::Radial => format!("radial-gradient(circle, {})", stops_css(&paint.stops)),
        GradientKind::Conic => format!("conic-gradient({})", stops_css(&paint.stops)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use weft_core::Color;

    fn transform(a: f64, b: f64, c: f64, d: f64) -> PaintTransform {
        PaintTransform::from_components(a, b, c, d, 0.0, 0.0)
    }

    #[test]
    fn test_identity_matrix_is_left_to_right() {
        // (1, 0, 0, 1) is a horizontal gradient: 90° in CSS.
        assert_eq!(css_angle(&transform(1.0, 0.0, 0.0, 1.0)), 90.0);
    }

    #[test]
    fn test_canonical_quarter_turns() {
        assert_eq!(css_angle(&transform(0.0, -1.0, 1.0, 0.0)), 0.0);
        assert_eq!(css_angle(&transform(-1.0, 0.0, 0.0, -1.0)), 270.0);
        assert_eq!(css_angle(&transform(0.0, 1.0, -1.0, 0.0)), 180.0);
    }

    #[test]
    fn test_linear_css() {
        let paint = GradientPaint {
            transform: PaintTransform::identity(),
            stops: vec![
                GradientStop::new(0.0, Color::from_rgb8(255, 0, 0)),
                GradientStop::new(1.0, Color::from_rgb8(0, 0, 255)),
            ],
        };
        assert_eq!(
            render(GradientKind::Linear, &paint),
            "linear-gradient(90deg, #ff0000 0%, #0000ff 100%)"
        );
    }

    proptest! {
        /// The converted angle always lands in [0, 360), for any
        /// non-degenerate rotation-like matrix.
        #[test]
        fn prop_angle_is_normalized(theta in -720.0f64..720.0) {
            let rad = theta.to_radians();
            let t = transform(rad.cos(), -rad.sin(), rad.sin(), rad.cos());
            let angle = css_angle(&t);
            prop_assert!((0.0..360.0).contains(&angle));
        }

        /// A full 360° turn maps back onto the same canonical angle.
        #[test]
        fn prop_angle_is_idempotent_under_full_turns(theta in 0.0f64..360.0) {
            let rad = theta.to_radians();
            let once = transform(rad.cos(), -rad.sin(), rad.sin(), rad.cos());
            let wrapped = (theta + 360.0).to_radians();
            let twice = transform(wrapped.cos(), -wrapped.sin(), wrapped.sin(), wrapped.cos());
            let a = css_angle(&once);
            let b = css_angle(&twice);
            prop_assert!((a - b).abs() < 1e-6 || (a - b).abs() > 359.9);
        }
    }
}
