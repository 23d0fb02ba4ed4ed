use crate::catalog::record_model::DomContext;
use crate::dom::document::{Document, NodeId};
use crate::dom::markup::outer_html;

// ============================================================================
// Context snapshotting
// ============================================================================

/// Capture an element's bounded structural neighborhood.
///
/// The element's own markup, the parent's markup (empty when there is no
/// parent element), every sibling's markup in document order, and the page
/// title. The snapshot is an owned copy; it does not search the subtree
/// beyond what markup serialization already includes, so its size is bounded
/// by the neighborhood regardless of document depth.
pub fn snapshot(doc: &Document, node: NodeId) -> DomContext {
    let parent = doc.parent_element(node);

    let parent_node = parent
        .map(|p| outer_html(doc, p))
        .unwrap_or_default();

    let sibling_nodes = parent
        .map(|p| {
            doc.children(p)
                .iter()
                .copied()
                .filter(|&sibling| sibling != node)
                .map(|sibling| outer_html(doc, sibling))
                .collect()
        })
        .unwrap_or_default();

    DomContext {
        current_node: outer_html(doc, node),
        parent_node,
        sibling_nodes,
        page_title: doc.title.clone(),
    }
}
