use crate::dom::document::{Document, NodeId};

// ============================================================================
// Markup serialization
// ============================================================================

/// Elements serialized without a closing tag.
const VOID_ELEMENTS: [&str; 8] = [
    "area", "br", "col", "hr", "img", "input", "link", "meta",
];

/// Serialize an element and its subtree to markup.
///
/// Deterministic for an unchanged node: attributes render in sorted order, so
/// repeated serialization is byte-identical. Returns the empty string for the
/// document root or a stale handle.
pub fn outer_html(doc: &Document, node: NodeId) -> String {
    let Some(el) = doc.element(node) else {
        return String::new();
    };

    let mut out = String::new();
    out.push('<');
    out.push_str(&el.tag);
    for (name, value) in &el.attributes {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&escape_attr(value));
        out.push('"');
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&el.tag.as_str()) {
        return out;
    }

    if let Some(text) = &el.text {
        out.push_str(&escape_text(text));
    }
    for &child in doc.children(node) {
        out.push_str(&outer_html(doc, child));
    }

    out.push_str("</");
    out.push_str(&el.tag);
    out.push('>');
    out
}

fn escape_text(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(raw: &str) -> String {
    escape_text(raw).replace('"', "&quot;")
}
