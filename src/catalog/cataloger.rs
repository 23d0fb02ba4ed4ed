use std::cell::RefCell;
use std::rc::Rc;

use crate::catalog::catalog::Catalog;
use crate::catalog::context::snapshot;
use crate::catalog::record_model::InteractionRecord;
use crate::dom::document::{Document, Handler, NodeId};
use crate::dom::markup::outer_html;
use crate::identity::digest::ContentDigest;
use crate::identity::locator::locate;
use crate::identity::visibility::is_fully_visible;

// ============================================================================
// Interaction cataloging
// ============================================================================

/// Builds normalized records from observed handler registrations.
///
/// Shares the session catalog through `Rc<RefCell<_>>`; appends hold the
/// borrow only for the push itself, so a registration observed from inside
/// another observation still lands in call order.
pub struct Cataloger {
    catalog: Rc<RefCell<Catalog>>,
    digest: Rc<dyn ContentDigest>,
}

impl Cataloger {
    pub fn new(catalog: Rc<RefCell<Catalog>>, digest: Rc<dyn ContentDigest>) -> Self {
        Self { catalog, digest }
    }

    /// Catalog one handler registration.
    ///
    /// Emits the record for the element the listener was bound to, then the
    /// compound-widget expansion records where the event kind calls for them.
    /// Never fails: addressing, digest, and visibility failures all degrade
    /// to empty or false fields.
    pub fn observe_registration(
        &self,
        doc: &mut Document,
        target: NodeId,
        kind: &str,
        handler: &Handler,
    ) {
        let function_id = self.handler_digest(handler);
        let addr = self.resolve_address(doc, target);

        let record = self.build_record(doc, target, kind, function_id, addr);
        self.catalog.borrow_mut().push_record(record);

        // A "change" listener on a container is semantically about its
        // interactive descendants, not the container itself.
        if kind == "change" {
            self.expand_change_targets(doc, target);
        }

        // Delegated click handling on a table is almost always meant for its
        // action buttons. The tag check is against the element being
        // processed, nothing carried over from the expansion above.
        if kind == "click" && doc.tag(target) == Some("table") {
            self.expand_table_buttons(doc, target);
        }
    }

    /// Digest of the handler's source text; empty when it has none.
    fn handler_digest(&self, handler: &Handler) -> String {
        handler
            .source_text()
            .map(|source| self.digest.digest(source))
            .unwrap_or_default()
    }

    /// Structural address, with the synthetic-identifier fallback.
    ///
    /// When addressing fails, a digest of the element's markup is written
    /// onto the live element as its identifier so that this and every later
    /// observation address it the same way.
    fn resolve_address(&self, doc: &mut Document, target: NodeId) -> String {
        let addr = locate(doc, target);
        if !addr.is_empty() {
            return addr;
        }

        let synthetic = self.digest.digest(&outer_html(doc, target));
        doc.set_attr(target, "id", &synthetic);
        locate(doc, target)
    }

    fn build_record(
        &self,
        doc: &Document,
        node: NodeId,
        kind: &str,
        function_id: String,
        addr: String,
    ) -> InteractionRecord {
        InteractionRecord {
            event: kind.to_string(),
            function_id,
            addr,
            id: doc.id(node),
            tag: doc.tag(node).unwrap_or_default().to_string(),
            class_name: doc.class_name(node),
            dom_context: snapshot(doc, node),
            url: doc.url.clone(),
            is_visible: is_fully_visible(doc, node),
        }
    }

    /// Emit one record per interactive descendant: radio/checkbox inputs,
    /// selects, and options. Implied sub-targets carry an empty handler id.
    fn expand_change_targets(&self, doc: &Document, target: NodeId) {
        for descendant in doc.descendants(target) {
            let expand = match doc.tag(descendant) {
                Some("input") => matches!(
                    doc.attr(descendant, "type"),
                    Some("radio") | Some("checkbox")
                ),
                Some("select") | Some("option") => true,
                _ => false,
            };
            if expand {
                let addr = locate(doc, descendant);
                let record = self.build_record(doc, descendant, "change", String::new(), addr);
                self.catalog.borrow_mut().push_record(record);
            }
        }
    }

    /// Emit one click record per descendant button of a table.
    fn expand_table_buttons(&self, doc: &Document, target: NodeId) {
        for descendant in doc.descendants(target) {
            if doc.tag(descendant) == Some("button") {
                let addr = locate(doc, descendant);
                let record = self.build_record(doc, descendant, "click", String::new(), addr);
                self.catalog.borrow_mut().push_record(record);
            }
        }
    }
}
