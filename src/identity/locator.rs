use crate::dom::document::{Document, NodeId};

// ============================================================================
// Structural addressing
// ============================================================================

/// Compute a canonical structural address for an element.
///
/// An element carrying a non-empty `id` attribute addresses as
/// `//*[@id="<id>"]` regardless of its position in the tree. Otherwise the
/// address is a root-ward path of `/tag[k]` segments, where `k` is the
/// element's 1-based position among same-tag siblings; the positional
/// predicate is omitted when the tag is unique among its siblings.
///
/// Addressing is advisory: detached elements, stale handles, and the
/// document root all yield the empty string, never an error. Callers must
/// treat an empty address as "unknown, needs a synthetic identifier".
pub fn locate(doc: &Document, node: NodeId) -> String {
    locate_steps(doc, node).unwrap_or_default()
}

fn locate_steps(doc: &Document, node: NodeId) -> Option<String> {
    doc.element(node)?;

    if let Some(id) = doc.attr(node, "id") {
        if !id.is_empty() {
            return Some(format!("//*[@id=\"{}\"]", id));
        }
    }

    let mut path = String::new();
    let mut current = node;
    loop {
        let tag = doc.tag(current)?.to_string();
        // No parent link: the chain never reaches the document root.
        let parent = doc.parent(current)?;

        let same_tag: Vec<NodeId> = doc
            .children(parent)
            .iter()
            .copied()
            .filter(|&sibling| doc.tag(sibling) == Some(tag.as_str()))
            .collect();
        let position = same_tag.iter().position(|&sibling| sibling == current)? + 1;

        if same_tag.len() > 1 {
            path = format!("/{}[{}]{}", tag, position, path);
        } else {
            path = format!("/{}{}", tag, path);
        }

        if doc.is_document(parent) {
            return Some(path);
        }
        current = parent;
    }
}
