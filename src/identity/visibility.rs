use crate::dom::document::{Document, NodeId};

// ============================================================================
// Visibility oracle
// ============================================================================

/// Conservative "fully visible" predicate.
///
/// False for a missing element, for computed `display: none`,
/// `visibility: hidden`, or zero opacity, and for any render rectangle that
/// is empty or not entirely inside the viewport. An element that is only
/// partially scrolled into view is reported not-visible.
pub fn is_fully_visible(doc: &Document, node: NodeId) -> bool {
    let Some(el) = doc.element(node) else {
        return false;
    };

    if el.style.display == "none" || el.style.visibility == "hidden" || el.style.opacity == 0.0 {
        return false;
    }

    let rect = el.rect;
    rect.width > 0.0
        && rect.height > 0.0
        && rect.top() >= 0.0
        && rect.left() >= 0.0
        && rect.bottom() <= doc.viewport.height
        && rect.right() <= doc.viewport.width
}
