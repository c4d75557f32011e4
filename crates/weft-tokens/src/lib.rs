//! The token engine: whole-tree value aggregation.
//!
//! Runs once over the extracted tree before visual resolution. Literal
//! values that repeat at or above a usage threshold, and every value bound
//! to a design variable, are promoted to named tokens; everything else
//! stays an inline literal. The collected set renders to a flat
//! custom-property block and to a nested utility-framework config, both
//! derived from the same bindings so they cannot diverge.

mod binding;
mod collect;
mod naming;
mod render;

pub use binding::{TokenBinding, TokenCategory, TokenRefSite, TokenSet, TokenValue};
pub use collect::collect;
pub use naming::hue_band;
pub use render::{parse_custom_properties, render_custom_properties, render_utility_config};
