//! Responsive rule synthesis.
//!
//! Sibling frames that represent the same component at different
//! breakpoints (`Card`, `Card#tablet`, `Card#desktop`) collapse into one
//! mobile-first rule set: the smallest frame is the base, each larger
//! frame becomes a `min-width` override re-emitting only the properties
//! that differ from the previous breakpoint. When the layout direction
//! changes between breakpoints, a fixed reset list is re-emitted so stale
//! cross-axis/flex values cannot be inherited.
//!
//! Frame matching is name-convention based and therefore fragile; it sits
//! behind [`BreakpointMatcher`] so a stricter metadata-driven strategy can
//! replace it without touching the interpreter.

use regex::Regex;
use serde::{Deserialize, Serialize};

use weft_core::{ExtractedNode, NodeId, NodeKind};

use crate::interpret::LayoutMap;
use crate::spec::LayoutField;

/// Strategy for recognizing breakpoint-variant frames.
pub trait BreakpointMatcher {
    /// Split a frame name into `(stem, label, min_width)` when it names a
    /// breakpoint variant.
    fn match_name(&self, name: &str) -> Option<(String, String, f64)>;
}

/// Default matcher: a `#label` or `@label` suffix on the frame name, where
/// the label is a known breakpoint name or a pixel count.
#[derive(Debug)]
pub struct NameSuffixMatcher {
    pattern: Regex,
}

impl NameSuffixMatcher {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"^(?P<stem>.+?)\s*[#@](?P<label>[A-Za-z0-9_-]+)$")
                .expect("breakpoint suffix pattern is valid"),
        }
    }

    fn min_width_for(label: &str) -> Option<f64> {
        match label {
            "mobile" => Some(0.0),
            "sm" => Some(480.0),
            "tablet" | "md" => Some(768.0),
            "desktop" | "lg" => Some(1024.0),
            "xl" => Some(1280.0),
            "wide" => Some(1440.0),
            other => other.parse::<f64>().ok().filter(|w| *w >= 0.0),
        }
    }
}

impl Default for NameSuffixMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl BreakpointMatcher for NameSuffixMatcher {
    fn match_name(&self, name: &str) -> Option<(String, String, f64)> {
        let captures = self.pattern.captures(name)?;
        let label = captures["label"].to_string();
        let min_width = Self::min_width_for(&label)?;
        Some((captures["stem"].trim_end().to_string(), label, min_width))
    }
}

/// One min-width override within a responsive family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponsiveOverride {
    pub node: NodeId,
    pub label: String,
    pub min_width: f64,
    /// The properties this override re-emits.
    pub fields: Vec<LayoutField>,
}

/// A synthesized responsive family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponsiveRules {
    pub stem: String,
    /// The family member whose rules form the base set and whose subtree
    /// reaches the markup.
    pub base: NodeId,
    /// Family members other than the base; suppressed from markup.
    pub variants: Vec<NodeId>,
    /// Overrides sorted ascending by min-width.
    pub overrides: Vec<ResponsiveOverride>,
}

/// Detect responsive families among sibling frames and synthesize their
/// override rules. Tags every matched spec with its breakpoint label.
pub fn synthesize_responsive(
    siblings: &[&ExtractedNode],
    specs: &mut LayoutMap,
    matcher: &dyn BreakpointMatcher,
) -> Vec<ResponsiveRules> {
    // stem → [(min_width, label, node)]
    let mut families: Vec<(String, Vec<Member<'_>>)> = Vec::new();

    for node in siblings {
        if !matches!(node.kind, NodeKind::Frame) || node.name.is_empty() {
            continue;
        }
        let (stem, label, min_width) = match matcher.match_name(&node.name) {
            Some(matched) => matched,
            // An unsuffixed frame is a base candidate at width zero.
            None => (node.name.clone(), String::new(), 0.0),
        };
        match families.iter_mut().find(|(s, _)| *s == stem) {
            Some((_, members)) => members.push(Member {
                node,
                label,
                min_width,
            }),
            None => families.push((
                stem,
                vec![Member {
                    node,
                    label,
                    min_width,
                }],
            )),
        }
    }

    let mut rules = Vec::new();
    for (stem, mut members) in families {
        // A family needs at least two members, one of them suffixed.
        if members.len() < 2 || members.iter().all(|m| m.label.is_empty()) {
            continue;
        }

        // Smallest first: breakpoint threshold, then frame width.
        members.sort_by(|a, b| {
            a.min_width
                .total_cmp(&b.min_width)
                .then(a.node.geometry.width.total_cmp(&b.node.geometry.width))
        });

        let base = &members[0];
        let mut overrides = Vec::new();
        for pair in members.windows(2) {
            let (prev, current) = (&pair[0], &pair[1]);
            let Some(prev_spec) = specs.get(&prev.node.id).cloned() else {
                continue;
            };
            let Some(current_spec) = specs.get(&current.node.id).cloned() else {
                continue;
            };

            let mut fields = current_spec.diff_fields(&prev_spec);
            if current_spec.direction != prev_spec.direction {
                // Direction changed: force the reset list back out.
                for field in LayoutField::DIRECTION_RESET {
                    if !fields.contains(&field) {
                        fields.push(field);
                    }
                }
                // Keep canonical emission order.
                fields = LayoutField::ALL
                    .into_iter()
                    .filter(|f| fields.contains(f))
                    .collect();
            }

            overrides.push(ResponsiveOverride {
                node: current.node.id.clone(),
                label: current.label.clone(),
                min_width: current.min_width,
                fields,
            });
        }

        for member in &members {
            if let Some(spec) = specs.get_mut(&member.node.id) {
                spec.breakpoint = if member.label.is_empty() {
                    None
                } else {
                    Some(member.label.clone())
                };
            }
        }

        log::debug!(
            "responsive family {:?}: base {} + {} override(s)",
            stem,
            base.node.id,
            overrides.len()
        );

        rules.push(ResponsiveRules {
            stem,
            base: base.node.id.clone(),
            variants: members[1..].iter().map(|m| m.node.id.clone()).collect(),
            overrides,
        });
    }

    rules
}

struct Member<'a> {
    node: &'a ExtractedNode,
    label: String,
    min_width: f64,
}
