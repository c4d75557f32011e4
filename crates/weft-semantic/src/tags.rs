//! Tag selection.
//!
//! A top-down decision tree: explicit naming conventions first,
//! interactive affordances second, landmark detection third, then a
//! generic container. Heading levels come from running traversal state,
//! not from here.

use weft_core::{ExtractedNode, NodeKind};

/// The outcome of tag selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagChoice {
    /// A concrete tag name.
    Tag(&'static str),
    /// A heading; the level is decided by the traversal's heading state.
    Heading,
}

/// Name fragments that decide a tag outright. Checked in order; first
/// match wins.
const NAME_RULES: &[(&str, TagChoice)] = &[
    ("button", TagChoice::Tag("button")),
    ("btn", TagChoice::Tag("button")),
    ("cta", TagChoice::Tag("button")),
    ("link", TagChoice::Tag("a")),
    ("nav", TagChoice::Tag("nav")),
    ("menu", TagChoice::Tag("nav")),
    ("breadcrumb", TagChoice::Tag("nav")),
    ("header", TagChoice::Tag("header")),
    ("top_bar", TagChoice::Tag("header")),
    ("app_bar", TagChoice::Tag("header")),
    ("footer", TagChoice::Tag("footer")),
    ("sidebar", TagChoice::Tag("aside")),
    ("drawer", TagChoice::Tag("aside")),
    ("main", TagChoice::Tag("main")),
    ("section", TagChoice::Tag("section")),
    ("article", TagChoice::Tag("article")),
    ("card", TagChoice::Tag("article")),
    ("form", TagChoice::Tag("form")),
    ("input", TagChoice::Tag("input")),
    ("field", TagChoice::Tag("input")),
    ("search", TagChoice::Tag("input")),
    ("label", TagChoice::Tag("label")),
    ("list", TagChoice::Tag("ul")),
    ("feed", TagChoice::Tag("ul")),
    ("item", TagChoice::Tag("li")),
    ("row", TagChoice::Tag("li")),
    ("heading", TagChoice::Heading),
    ("title", TagChoice::Heading),
    ("headline", TagChoice::Heading),
    ("caption", TagChoice::Tag("p")),
    ("description", TagChoice::Tag("p")),
    ("image", TagChoice::Tag("img")),
    ("photo", TagChoice::Tag("img")),
    ("avatar", TagChoice::Tag("img")),
];

/// Fragments that signal a click affordance without naming a control.
const INTERACTIVE_HINTS: &[&str] = &["click", "press", "tap", "action", "submit"];

/// Typography size at or above which an unnamed text node reads as a
/// heading.
const HEADING_SIZE_PX: f64 = 24.0;

/// Select the tag for a node.
///
/// `is_top_level` and sibling position feed the landmark step: a page's
/// first/last full-width top-level frames read as header/footer.
pub fn detect_tag(node: &ExtractedNode, is_top_level: bool, index: usize, count: usize) -> TagChoice {
    let name = normalized(&node.name);

    // 1. Explicit naming convention.
    for (fragment, choice) in NAME_RULES {
        if name_matches(&name, fragment) {
            return choice.clone();
        }
    }
    if let NodeKind::Instance(instance) = &node.kind {
        let component = normalized(&instance.component);
        for (fragment, choice) in NAME_RULES {
            if name_matches(&component, fragment) {
                return choice.clone();
            }
        }
    }

    // 2. Interactive affordance.
    if INTERACTIVE_HINTS.iter().any(|h| name.contains(h)) {
        return TagChoice::Tag("button");
    }

    // 3. Landmark detection for top-level page regions.
    if is_top_level && matches!(node.kind, NodeKind::Frame) && count >= 3 {
        if index == 0 {
            return TagChoice::Tag("header");
        }
        if index + 1 == count {
            return TagChoice::Tag("footer");
        }
    }

    // 4. Generic fallback per node kind.
    match &node.kind {
        NodeKind::Text(text) => {
            if text.typography.size >= HEADING_SIZE_PX || text.typography.weight >= 700 {
                TagChoice::Heading
            } else {
                TagChoice::Tag("p")
            }
        }
        NodeKind::Vector | NodeKind::VectorContainer => TagChoice::Tag("img"),
        _ => TagChoice::Tag("div"),
    }
}

fn normalized(name: &str) -> String {
    name.to_lowercase().replace([' ', '-', '/'], "_")
}

/// Match a fragment on word boundaries within the normalized name, so
/// "titlebar" does not read as a title but "page_title" does.
fn name_matches(name: &str, fragment: &str) -> bool {
    name.split('_').any(|word| word == fragment)
}
