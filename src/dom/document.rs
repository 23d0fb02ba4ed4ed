use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ============================================================================
// Node handles and element data
// ============================================================================

/// Index handle into the document's node arena.
///
/// Handles stay valid for the lifetime of the `Document`; nodes are never
/// removed from the arena, only detached from the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// A script handler value as the page hands it to a registration call.
///
/// `source` is the handler's serialized source text; `None` models a value
/// that cannot be serialized to text (the digest of such a handler is the
/// empty string).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Handler {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub source: Option<String>,
}

impl Handler {
    /// A handler with serializable source text.
    pub fn scripted(name: &str, source: &str) -> Self {
        Self {
            name: name.to_string(),
            source: Some(source.to_string()),
        }
    }

    /// A handler value that cannot be serialized to text.
    pub fn opaque(name: &str) -> Self {
        Self {
            name: name.to_string(),
            source: None,
        }
    }

    pub fn source_text(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

/// Computed style subset consumed by the visibility oracle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedStyle {
    #[serde(default = "default_display")]
    pub display: String,

    #[serde(default = "default_visibility")]
    pub visibility: String,

    #[serde(default = "default_opacity")]
    pub opacity: f32,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            display: default_display(),
            visibility: default_visibility(),
            opacity: default_opacity(),
        }
    }
}

fn default_display() -> String {
    "block".to_string()
}
fn default_visibility() -> String {
    "visible".to_string()
}
fn default_opacity() -> f32 {
    1.0
}

/// Border-box rectangle in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Rect {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }
}

/// Viewport dimensions for the visibility oracle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

/// Payload of an element node.
///
/// Attributes are kept sorted so that markup serialization of an unchanged
/// element is byte-identical across calls.
#[derive(Debug, Clone)]
pub struct ElementData {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    pub text: Option<String>,
    pub style: ComputedStyle,
    pub rect: Rect,

    /// Listeners attached through the registration surface, in call order.
    pub listeners: Vec<(String, Handler)>,

    /// Directly assigned handler-property slots, keyed by bare event name
    /// ("click", not "onclick").
    pub properties: BTreeMap<String, Handler>,
}

impl ElementData {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: BTreeMap::new(),
            text: None,
            style: ComputedStyle::default(),
            rect: Rect::default(),
            listeners: Vec::new(),
            properties: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone)]
enum NodeData {
    Document,
    Element(ElementData),
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

// ============================================================================
// Page-effect ledgers (native method behavior)
// ============================================================================

/// A timer the page actually armed (native effect of the timer surface).
#[derive(Debug, Clone, PartialEq)]
pub struct ArmedTimer {
    pub id: u64,
    pub handler: Handler,
    pub delay_ms: f64,
    pub repeating: bool,
}

/// A request the page actually opened (native effect of the request surface).
#[derive(Debug, Clone, PartialEq)]
pub struct IssuedRequest {
    pub method: String,
    pub url: String,
}

// ============================================================================
// Document
// ============================================================================

/// In-memory document: node arena plus page-level state.
///
/// Supplies the query, serialization, and mutation primitives the
/// instrumentation core consumes, and ledgers recording the effects of the
/// native (unwrapped) host methods.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    pub title: String,
    pub url: String,
    pub viewport: Viewport,

    pub armed_timers: Vec<ArmedTimer>,
    pub opened_windows: Vec<String>,
    pub issued_requests: Vec<IssuedRequest>,
    pub sent_payloads: Vec<String>,
    next_timer_id: u64,
}

impl Document {
    /// Create a document with a single non-element root node.
    pub fn new(title: &str, url: &str) -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                data: NodeData::Document,
            }],
            title: title.to_string(),
            url: url.to_string(),
            viewport: Viewport::default(),
            armed_timers: Vec::new(),
            opened_windows: Vec::new(),
            issued_requests: Vec::new(),
            sent_payloads: Vec::new(),
            next_timer_id: 1,
        }
    }

    /// The non-element document root.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn is_document(&self, node: NodeId) -> bool {
        matches!(
            self.nodes.get(node.0).map(|n| &n.data),
            Some(NodeData::Document)
        )
    }

    // ------------------------------------------------------------------
    // Construction and mutation
    // ------------------------------------------------------------------

    /// Create a detached element. Tag names are lowercased on entry.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            data: NodeData::Element(ElementData::new(tag)),
        });
        id
    }

    /// Append `child` as the last child of `parent`, detaching it from any
    /// previous parent first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent == child || self.nodes.get(child.0).is_none() {
            return;
        }
        self.detach(child);
        if let Some(node) = self.nodes.get_mut(parent.0) {
            node.children.push(child);
        } else {
            return;
        }
        if let Some(node) = self.nodes.get_mut(child.0) {
            node.parent = Some(parent);
        }
    }

    /// Remove `node` from its parent's child list. The node and its subtree
    /// stay alive in the arena but are no longer reachable from the root.
    pub fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.nodes.get(node.0).and_then(|n| n.parent) else {
            return;
        };
        if let Some(parent_node) = self.nodes.get_mut(parent.0) {
            parent_node.children.retain(|&c| c != node);
        }
        if let Some(n) = self.nodes.get_mut(node.0) {
            n.parent = None;
        }
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(el) = self.element_mut(node) {
            el.attributes.insert(name.to_string(), value.to_string());
        }
    }

    pub fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(el) = self.element_mut(node) {
            el.text = Some(text.to_string());
        }
    }

    /// Attach a listener registered through the event-target surface.
    pub fn add_listener(&mut self, node: NodeId, kind: &str, handler: Handler) {
        if let Some(el) = self.element_mut(node) {
            el.listeners.push((kind.to_string(), handler));
        }
    }

    /// Assign a direct handler-property slot (bare event name).
    pub fn set_property(&mut self, node: NodeId, event: &str, handler: Handler) {
        if let Some(el) = self.element_mut(node) {
            el.properties.insert(event.to_string(), handler);
        }
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn element(&self, node: NodeId) -> Option<&ElementData> {
        match self.nodes.get(node.0).map(|n| &n.data) {
            Some(NodeData::Element(el)) => Some(el),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, node: NodeId) -> Option<&mut ElementData> {
        match self.nodes.get_mut(node.0).map(|n| &mut n.data) {
            Some(NodeData::Element(el)) => Some(el),
            _ => None,
        }
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|el| el.tag.as_str())
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)
            .and_then(|el| el.attributes.get(name))
            .map(|v| v.as_str())
    }

    /// The element's identifier attribute, empty string when absent.
    pub fn id(&self, node: NodeId) -> String {
        self.attr(node, "id").unwrap_or_default().to_string()
    }

    /// The element's class attribute, empty string when absent.
    pub fn class_name(&self, node: NodeId) -> String {
        self.attr(node, "class").unwrap_or_default().to_string()
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0).and_then(|n| n.parent)
    }

    /// Parent element, `None` when detached or when the parent is the
    /// document root (mirrors `parentElement`).
    pub fn parent_element(&self, node: NodeId) -> Option<NodeId> {
        self.parent(node).filter(|&p| !self.is_document(p))
    }

    /// Direct children in document order.
    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.0)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Preorder descendants of `node`, excluding `node` itself.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            out.push(current);
            for &child in self.children(current).iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    /// Every element attached to the document, in document order.
    pub fn elements(&self) -> Vec<NodeId> {
        self.descendants(self.root())
    }

    pub fn listeners(&self, node: NodeId) -> &[(String, Handler)] {
        self.element(node)
            .map(|el| el.listeners.as_slice())
            .unwrap_or(&[])
    }

    pub fn property(&self, node: NodeId, event: &str) -> Option<&Handler> {
        self.element(node).and_then(|el| el.properties.get(event))
    }

    // ------------------------------------------------------------------
    // Native method effects
    // ------------------------------------------------------------------

    /// Arm a timer and return its id (native effect of the timer surface).
    pub fn arm_timer(&mut self, handler: Handler, delay_ms: f64, repeating: bool) -> u64 {
        let id = self.next_timer_id;
        self.next_timer_id += 1;
        self.armed_timers.push(ArmedTimer {
            id,
            handler,
            delay_ms,
            repeating,
        });
        id
    }

    pub fn record_opened_window(&mut self, url: &str) {
        self.opened_windows.push(url.to_string());
    }

    pub fn record_request(&mut self, method: &str, url: &str) {
        self.issued_requests.push(IssuedRequest {
            method: method.to_string(),
            url: url.to_string(),
        });
    }

    pub fn record_sent_payload(&mut self, body: &str) {
        self.sent_payloads.push(body.to_string());
    }
}
