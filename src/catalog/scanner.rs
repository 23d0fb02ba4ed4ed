use crate::catalog::context::snapshot;
use crate::catalog::record_model::InteractionRecord;
use crate::dom::document::Document;
use crate::identity::digest::ContentDigest;
use crate::identity::locator::locate;
use crate::identity::visibility::is_fully_visible;

// ============================================================================
// Passive property scanning
// ============================================================================

/// The recognized direct handler-property slots, in check order.
pub const HANDLER_PROPERTIES: [&str; 16] = [
    "click",
    "mouseover",
    "abort",
    "blur",
    "change",
    "input",
    "dblclick",
    "error",
    "focus",
    "keydown",
    "keypress",
    "keyup",
    "mousedown",
    "mousemove",
    "mouseout",
    "mouseup",
];

/// Point-in-time sweep of the whole document for directly assigned handler
/// properties.
///
/// One record per occupied slot, in document order then slot order. Pure and
/// single-pass: the document is not mutated (no synthetic-identifier
/// fallback, so `addr` may be empty), and the result is returned rather than
/// appended to any shared catalog so callers choose whether to merge.
pub fn scan(doc: &Document, digest: &dyn ContentDigest) -> Vec<InteractionRecord> {
    let mut records = Vec::new();

    for node in doc.elements() {
        let occupied: Vec<&str> = HANDLER_PROPERTIES
            .iter()
            .copied()
            .filter(|event| doc.property(node, event).is_some())
            .collect();
        if occupied.is_empty() {
            continue;
        }

        // Address, context, and visibility are shared by every record the
        // element produces; computed once per element.
        let addr = locate(doc, node);
        let context = snapshot(doc, node);
        let visible = is_fully_visible(doc, node);

        for event in occupied {
            let function_id = doc
                .property(node, event)
                .and_then(|handler| handler.source_text())
                .map(|source| digest.digest(source))
                .unwrap_or_default();

            records.push(InteractionRecord {
                event: event.to_string(),
                function_id,
                addr: addr.clone(),
                id: doc.id(node),
                tag: doc.tag(node).unwrap_or_default().to_string(),
                class_name: doc.class_name(node),
                dom_context: context.clone(),
                url: doc.url.clone(),
                is_visible: visible,
            });
        }
    }

    records
}
