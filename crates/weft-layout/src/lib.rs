//! Layout interpretation for extracted design trees.
//!
//! Maps each node's declared layout configuration and per-axis sizing
//! modes onto flex-based layout rules:
//!
//! 1. **Decision table**: per axis, `Fixed` carries the explicit dimension
//!    through, `Hug` leaves sizing intrinsic, and `Fill` splits by axis
//!    role: proportional growth with a zero basis on the primary axis,
//!    stretch on the counter axis. The two Fill mechanisms are distinct.
//! 2. **Clamps**: min/max constraints layer on top of the sizing decision.
//! 3. **Responsive synthesis**: sibling frames representing the same
//!    component at different breakpoints collapse into one base rule set
//!    plus ascending min-width overrides containing only the properties
//!    that differ.

mod interpret;
mod responsive;
mod spec;

pub use interpret::{interpret, interpret_all, LayoutMap, SiblingContext};
pub use responsive::{
    synthesize_responsive, BreakpointMatcher, NameSuffixMatcher, ResponsiveOverride,
    ResponsiveRules,
};
pub use spec::{padding_shorthand, FlexDirection, LayoutField, LayoutSpec, SizeValue};
