use page_probe::dom::document::{Document, NodeId, Rect};
use page_probe::identity::visibility::is_fully_visible;

fn doc_with_element(rect: Rect) -> (Document, NodeId) {
    let mut doc = Document::new("", "https://example.test/");
    let html = doc.create_element("html");
    let root = doc.root();
    doc.append_child(root, html);
    let div = doc.create_element("div");
    doc.append_child(html, div);
    if let Some(el) = doc.element_mut(div) {
        el.rect = rect;
    }
    (doc, div)
}

fn onscreen() -> Rect {
    Rect::new(10.0, 10.0, 100.0, 50.0)
}

// =========================================================================
// Style-based rejection
// =========================================================================

#[test]
fn display_none_hides_regardless_of_geometry() {
    let (mut doc, div) = doc_with_element(onscreen());
    doc.element_mut(div).expect("element").style.display = "none".to_string();
    assert!(!is_fully_visible(&doc, div), "display:none wins over geometry");
}

#[test]
fn hidden_visibility_hides() {
    let (mut doc, div) = doc_with_element(onscreen());
    doc.element_mut(div).expect("element").style.visibility = "hidden".to_string();
    assert!(!is_fully_visible(&doc, div));
}

#[test]
fn zero_opacity_hides() {
    let (mut doc, div) = doc_with_element(onscreen());
    doc.element_mut(div).expect("element").style.opacity = 0.0;
    assert!(!is_fully_visible(&doc, div));
}

// =========================================================================
// Geometry-based rejection
// =========================================================================

#[test]
fn zero_size_is_not_visible() {
    let (doc, div) = doc_with_element(Rect::new(10.0, 10.0, 0.0, 0.0));
    assert!(!is_fully_visible(&doc, div), "Empty render box");
}

#[test]
fn element_above_viewport_is_not_visible() {
    let (doc, div) = doc_with_element(Rect::new(10.0, -5.0, 100.0, 50.0));
    assert!(!is_fully_visible(&doc, div), "Negative top");
}

#[test]
fn element_partially_below_viewport_is_not_visible() {
    // Viewport is 1280x720 by default; bottom edge lands at 750.
    let (doc, div) = doc_with_element(Rect::new(10.0, 700.0, 100.0, 50.0));
    assert!(
        !is_fully_visible(&doc, div),
        "Fully-visible predicate, not any-pixel-visible"
    );
}

#[test]
fn element_past_right_edge_is_not_visible() {
    let (doc, div) = doc_with_element(Rect::new(1200.0, 10.0, 100.0, 50.0));
    assert!(!is_fully_visible(&doc, div));
}

// =========================================================================
// Acceptance
// =========================================================================

#[test]
fn fully_contained_element_is_visible() {
    let (doc, div) = doc_with_element(onscreen());
    assert!(is_fully_visible(&doc, div));
}

#[test]
fn element_flush_with_viewport_edges_is_visible() {
    let (doc, div) = doc_with_element(Rect::new(0.0, 0.0, 1280.0, 720.0));
    assert!(is_fully_visible(&doc, div), "Boundary inclusive on all edges");
}

#[test]
fn missing_element_is_not_visible() {
    let (doc, _div) = doc_with_element(onscreen());
    assert!(
        !is_fully_visible(&doc, doc.root()),
        "Non-element handle reports not-visible, not an error"
    );
}
