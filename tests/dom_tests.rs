use page_probe::catalog::context::snapshot;
use page_probe::dom::document::{Document, Handler, NodeId};
use page_probe::dom::loader::{LoadError, load_page};
use page_probe::dom::markup::outer_html;

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
// Markup serialization
// =========================================================================

#[test]
fn outer_html_renders_attributes_sorted_and_nested_children() {
    let (mut doc, body) = page_skeleton();
    let div = doc.create_element("div");
    doc.append_child(body, div);
    // Insert out of alphabetical order; serialization must sort.
    doc.set_attr(div, "id", "panel");
    doc.set_attr(div, "class", "wide");
    let span = doc.create_element("span");
    doc.set_text(span, "hello");
    doc.append_child(div, span);

    assert_eq!(
        outer_html(&doc, div),
        "<div class=\"wide\" id=\"panel\"><span>hello</span></div>",
        "Attributes sorted, subtree included"
    );
}

#[test]
fn outer_html_handles_void_elements_and_escaping() {
    let (mut doc, body) = page_skeleton();
    let input = doc.create_element("input");
    doc.set_attr(input, "type", "checkbox");
    doc.set_attr(input, "value", "a\"b");
    doc.append_child(body, input);
    let p = doc.create_element("p");
    doc.set_text(p, "1 < 2 & 3 > 2");
    doc.append_child(body, p);

    assert_eq!(
        outer_html(&doc, input),
        "<input type=\"checkbox\" value=\"a&quot;b\">",
        "Void element, no closing tag, quoted attribute escaped"
    );
    assert_eq!(
        outer_html(&doc, p),
        "<p>1 &lt; 2 &amp; 3 &gt; 2</p>",
        "Text content escaped"
    );
}

#[test]
fn outer_html_is_deterministic_for_unchanged_node() {
    let (mut doc, body) = page_skeleton();
    let div = doc.create_element("div");
    doc.set_attr(div, "class", "x");
    doc.append_child(body, div);

    let first = outer_html(&doc, div);
    let second = outer_html(&doc, div);
    assert_eq!(first, second, "Re-serialization is byte-identical");
}

#[test]
fn outer_html_of_document_root_is_empty() {
    let (doc, _body) = page_skeleton();
    assert_eq!(outer_html(&doc, doc.root()), "", "Root is not an element");
}

// =========================================================================
// Document structure
// =========================================================================

#[test]
fn tags_are_lowercased_on_creation() {
    let mut doc = Document::new("", "");
    let table = doc.create_element("TABLE");
    assert_eq!(doc.tag(table), Some("table"), "Tag normalized to lowercase");
}

#[test]
fn detach_removes_from_parent_but_keeps_subtree() {
    let (mut doc, body) = page_skeleton();
    let div = doc.create_element("div");
    doc.append_child(body, div);
    let span = doc.create_element("span");
    doc.append_child(div, span);

    doc.detach(div);
    assert!(doc.parent(div).is_none(), "Detached node has no parent");
    assert_eq!(
        doc.children(div),
        &[span],
        "Detached subtree stays intact below the node"
    );
    assert!(
        !doc.elements().contains(&div),
        "Detached node no longer enumerated from the root"
    );
}

#[test]
fn elements_enumerates_in_document_order() {
    let (mut doc, body) = page_skeleton();
    let div = doc.create_element("div");
    doc.append_child(body, div);
    let a = doc.create_element("a");
    doc.append_child(div, a);
    let p = doc.create_element("p");
    doc.append_child(body, p);

    let tags: Vec<&str> = doc
        .elements()
        .into_iter()
        .filter_map(|n| doc.tag(n))
        .collect();
    assert_eq!(
        tags,
        vec!["html", "body", "div", "a", "p"],
        "Preorder document order"
    );
}

// =========================================================================
// Context snapshotting
// =========================================================================

#[test]
fn snapshot_captures_bounded_neighborhood() {
    let (mut doc, body) = page_skeleton();
    let left = doc.create_element("span");
    doc.set_text(left, "left");
    doc.append_child(body, left);
    let target = doc.create_element("button");
    doc.set_text(target, "go");
    doc.append_child(body, target);
    let right = doc.create_element("span");
    doc.set_text(right, "right");
    doc.append_child(body, right);

    let context = snapshot(&doc, target);
    assert_eq!(context.current_node, "<button>go</button>");
    assert!(
        context.parent_node.starts_with("<body>"),
        "Parent markup captured"
    );
    assert_eq!(
        context.sibling_nodes,
        vec!["<span>left</span>".to_string(), "<span>right</span>".to_string()],
        "Siblings exclude the element itself, document order"
    );
    assert_eq!(context.page_title, "Sample");
}

#[test]
fn snapshot_of_top_element_has_empty_parent() {
    let (doc, _body) = page_skeleton();
    let html = doc.children(doc.root())[0];
    let context = snapshot(&doc, html);
    assert_eq!(context.parent_node, "", "Document root is not a parent element");
    assert!(context.sibling_nodes.is_empty(), "No siblings at the top");
}

#[test]
fn snapshot_is_an_owned_copy() {
    let (mut doc, body) = page_skeleton();
    let div = doc.create_element("div");
    doc.append_child(body, div);

    let context = snapshot(&doc, div);
    doc.set_attr(div, "class", "added-later");

    assert_eq!(
        context.current_node, "<div></div>",
        "Later mutation does not change an emitted snapshot"
    );
}

// =========================================================================
// Page description loading
// =========================================================================

#[test]
fn load_page_builds_document_with_state_and_handlers() {
    let json = r#"{
        "url": "https://shop.test/cart",
        "title": "Cart",
        "viewport": { "width": 800.0, "height": 600.0 },
        "root": {
            "tag": "html",
            "children": [
                {
                    "tag": "body",
                    "children": [
                        {
                            "tag": "button",
                            "attrs": { "id": "buy" },
                            "text": "Buy",
                            "rect": { "x": 10.0, "y": 10.0, "width": 80.0, "height": 20.0 },
                            "on": { "click": { "name": "buy", "source": "function(){ buy(); }" } }
                        }
                    ]
                }
            ]
        }
    }"#;

    let doc = load_page(json).expect("valid page description");
    assert_eq!(doc.title, "Cart");
    assert_eq!(doc.url, "https://shop.test/cart");
    assert_eq!(doc.viewport.width, 800.0);

    let button = doc
        .elements()
        .into_iter()
        .find(|&n| doc.tag(n) == Some("button"))
        .expect("button loaded");
    assert_eq!(doc.id(button), "buy");
    let handler = doc.property(button, "click").expect("click property set");
    assert_eq!(handler.source_text(), Some("function(){ buy(); }"));
}

#[test]
fn load_page_defaults_optional_fields() {
    let doc = load_page(r#"{ "root": { "tag": "html" } }"#).expect("minimal description");
    assert_eq!(doc.title, "");
    assert_eq!(doc.viewport.width, 1280.0, "Default viewport");
    let html = doc.children(doc.root())[0];
    let el = doc.element(html).expect("root element");
    assert_eq!(el.style.display, "block", "Default computed style");
}

#[test]
fn load_page_rejects_malformed_json() {
    let err = load_page("{ not json").expect_err("must fail");
    assert!(
        matches!(err, LoadError::Parse { .. }),
        "Malformed input reports a parse error"
    );
}

#[test]
fn handler_without_source_models_unserializable_value() {
    let handler = Handler::opaque("bound");
    assert_eq!(handler.source_text(), None, "No text to digest");
}
