//! The accessibility checklist.
//!
//! Evaluated for every element independently of tag selection:
//!
//! 1. Image-replacing elements must carry alt text.
//! 2. Non-native interactive patterns get `role` and `tabindex`.
//! 3. Form-like inputs get a label association.

use weft_core::ExtractedNode;

use crate::element::GeneratedElement;

pub(crate) fn apply_checklist(element: &mut GeneratedElement, node: &ExtractedNode) {
    // Alt presence for image-replacing nodes. An empty name still yields
    // an (empty) alt so the image is explicitly decorative.
    if element.tag == "img" && !element.attrs.contains_key("alt") {
        element.set_attr("alt", node.name.trim());
    }

    // Interactive pattern on a non-native tag.
    if element.tag == "div" || element.tag == "span" {
        let interactive = node.name.to_lowercase().contains("click")
            || node.name.to_lowercase().contains("tap");
        if interactive {
            element.set_attr("role", "button");
            element.set_attr("tabindex", "0");
        }
    }

    // Label association for form-like inputs.
    if element.tag == "input" && !element.attrs.contains_key("aria-label") {
        let label = node.name.trim();
        if !label.is_empty() {
            element.set_attr("aria-label", label);
        }
    }

    // Native buttons need their type pinned down.
    if element.tag == "button" {
        element.set_attr("type", "button");
    }
}
