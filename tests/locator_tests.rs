use page_probe::dom::document::{Document, NodeId};
use page_probe::identity::locator::locate;

fn page_skeleton() -> (Document, NodeId) {
    let mut doc = Document::new("Sample", "https://example.test/");
    let html = doc.create_element("html");
    let root = doc.root();
    doc.append_child(root, html);
    let body = doc.create_element("body");
    doc.append_child(html, body);
    (doc, body)
}

// =========================================================================
// Identifier short-circuit
// =========================================================================

#[test]
fn identifier_address_is_independent_of_position() {
    // Same id, two structurally different documents.
    let (mut first, body) = page_skeleton();
    let target = first.create_element("button");
    first.set_attr(target, "id", "login");
    first.append_child(body, target);

    let (mut second, body) = page_skeleton();
    for _ in 0..5 {
        let filler = second.create_element("button");
        second.append_child(body, filler);
    }
    let moved = second.create_element("button");
    second.set_attr(moved, "id", "login");
    second.append_child(body, moved);

    assert_eq!(locate(&first, target), "//*[@id=\"login\"]");
    assert_eq!(
        locate(&first, target),
        locate(&second, moved),
        "Identifier addressing ignores sibling position"
    );
}

#[test]
fn empty_identifier_does_not_short_circuit() {
    let (mut doc, body) = page_skeleton();
    let div = doc.create_element("div");
    doc.set_attr(div, "id", "");
    doc.append_child(body, div);

    assert_eq!(
        locate(&doc, div),
        "/html/body/div",
        "Empty id falls back to the structural walk"
    );
}

// =========================================================================
// Structural walk
// =========================================================================

#[test]
fn unique_tags_get_no_positional_predicate() {
    let (mut doc, body) = page_skeleton();
    let span = doc.create_element("span");
    doc.append_child(body, span);

    assert_eq!(locate(&doc, span), "/html/body/span");
}

#[test]
fn same_tag_siblings_get_one_based_positions() {
    let (mut doc, body) = page_skeleton();
    let first = doc.create_element("div");
    doc.append_child(body, first);
    let second = doc.create_element("div");
    doc.append_child(body, second);
    // A different tag in between must not affect div numbering.
    let span = doc.create_element("span");
    doc.append_child(body, span);
    let third = doc.create_element("div");
    doc.append_child(body, third);

    assert_eq!(locate(&doc, first), "/html/body/div[1]");
    assert_eq!(locate(&doc, second), "/html/body/div[2]");
    assert_eq!(locate(&doc, third), "/html/body/div[3]");
    assert_eq!(
        locate(&doc, span),
        "/html/body/span",
        "Unique tag among mixed siblings stays unpredicated"
    );
}

#[test]
fn positions_beyond_nine_follow_document_order() {
    let (mut doc, body) = page_skeleton();
    let mut last = None;
    for _ in 0..12 {
        let div = doc.create_element("div");
        doc.append_child(body, div);
        last = Some(div);
    }

    assert_eq!(
        locate(&doc, last.expect("created twelve divs")),
        "/html/body/div[12]",
        "Ties are resolved purely by document order"
    );
}

#[test]
fn nested_predicates_compose_along_the_path() {
    let (mut doc, body) = page_skeleton();
    let first_ul = doc.create_element("ul");
    doc.append_child(body, first_ul);
    let second_ul = doc.create_element("ul");
    doc.append_child(body, second_ul);
    let li_a = doc.create_element("li");
    doc.append_child(second_ul, li_a);
    let li_b = doc.create_element("li");
    doc.append_child(second_ul, li_b);

    assert_eq!(locate(&doc, li_b), "/html/body/ul[2]/li[2]");
}

#[test]
fn address_is_deterministic_without_mutation() {
    let (mut doc, body) = page_skeleton();
    let div = doc.create_element("div");
    doc.append_child(body, div);
    let inner = doc.create_element("div");
    doc.append_child(div, inner);

    let first = locate(&doc, inner);
    let second = locate(&doc, inner);
    assert_eq!(first, second, "Repeated addressing is byte-identical");
    assert_eq!(first, "/html/body/div/div");
}

// =========================================================================
// Detached and non-element cases
// =========================================================================

#[test]
fn detached_element_has_empty_address() {
    let (mut doc, _body) = page_skeleton();
    let orphan = doc.create_element("div");

    assert_eq!(locate(&doc, orphan), "", "Never attached");
}

#[test]
fn element_under_detached_ancestor_has_empty_address() {
    let (mut doc, body) = page_skeleton();
    let wrapper = doc.create_element("div");
    doc.append_child(body, wrapper);
    let inner = doc.create_element("span");
    doc.append_child(wrapper, inner);

    assert_eq!(locate(&doc, inner), "/html/body/div/span");
    doc.detach(wrapper);
    assert_eq!(
        locate(&doc, inner),
        "",
        "Ancestor detachment empties the whole subtree's addresses"
    );
}

#[test]
fn detached_element_with_identifier_still_addresses_by_id() {
    let (mut doc, _body) = page_skeleton();
    let orphan = doc.create_element("div");
    doc.set_attr(orphan, "id", "floating");

    assert_eq!(
        locate(&doc, orphan),
        "//*[@id=\"floating\"]",
        "Identifier short-circuit does not need the tree"
    );
}

#[test]
fn document_root_has_empty_address() {
    let (doc, _body) = page_skeleton();
    assert_eq!(locate(&doc, doc.root()), "", "Root is not an element");
}
