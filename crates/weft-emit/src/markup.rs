//! Markup serialization.

use weft_semantic::GeneratedElement;

use crate::emit::MarkupDialect;

const VOID_TAGS: &[&str] = &["img", "input", "br", "hr"];

/// Serialize an element tree into the requested markup dialect.
pub fn render_markup(root: &GeneratedElement, dialect: MarkupDialect) -> String {
    let mut out = String::new();
    write_element(root, dialect, 0, &mut out);
    out
}

fn write_element(element: &GeneratedElement, dialect: MarkupDialect, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    out.push_str(&indent);
    out.push('<');
    out.push_str(&element.tag);

    if !element.classes.is_empty() {
        let attr = match dialect {
            MarkupDialect::Html => "class",
            MarkupDialect::Jsx => "className",
        };
        out.push_str(&format!(
            " {}=\"{}\"",
            attr,
            escape_attr(&element.classes.join(" "))
        ));
    }
    for (name, value) in &element.attrs {
        out.push_str(&format!(" {}=\"{}\"", name, escape_attr(value)));
    }

    if VOID_TAGS.contains(&element.tag.as_str()) {
        out.push_str(" />\n");
        return;
    }

    out.push('>');

    match (&element.text, element.children.is_empty()) {
        (Some(text), true) => {
            out.push_str(&escape_text(text));
            out.push_str(&format!("</{}>\n", element.tag));
        }
        (text, _) => {
            out.push('\n');
            if let Some(text) = text {
                out.push_str(&"  ".repeat(depth + 1));
                out.push_str(&escape_text(text));
                out.push('\n');
            }
            for child in &element.children {
                write_element(child, dialect, depth + 1, out);
            }
            out.push_str(&indent);
            out.push_str(&format!("</{}>\n", element.tag));
        }
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}
