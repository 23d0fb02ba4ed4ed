use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

use crate::dom::document::{ComputedStyle, Document, Handler, NodeId, Rect, Viewport};

// ============================================================================
// Page description model (JSON)
// ============================================================================

/// Serialized page snapshot: page-level state plus the element tree.
///
/// This is the crate's ingestion boundary, the same shape a DOM-extraction
/// helper would emit from a live browser.
#[derive(Debug, Clone, Deserialize)]
pub struct PageDescription {
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub viewport: Viewport,

    pub root: NodeDescription,
}

/// One element in a page description.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeDescription {
    pub tag: String,

    #[serde(default)]
    pub attrs: BTreeMap<String, String>,

    #[serde(default)]
    pub text: Option<String>,

    #[serde(default)]
    pub style: ComputedStyle,

    #[serde(default)]
    pub rect: Rect,

    /// Directly assigned handler properties, keyed by bare event name.
    #[serde(default, rename = "on")]
    pub handlers: BTreeMap<String, Handler>,

    #[serde(default)]
    pub children: Vec<NodeDescription>,
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub enum LoadError {
    /// Page description file could not be read
    Io { path: String, source: std::io::Error },

    /// Page description JSON failed to parse
    Parse { source: serde_json::Error },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io { path, source } => {
                write!(f, "Failed to read page description '{}': {}", path, source)
            }
            LoadError::Parse { source } => {
                write!(f, "Invalid page description: {}", source)
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io { source, .. } => Some(source),
            LoadError::Parse { source } => Some(source),
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Parse a JSON page description into a live `Document`.
pub fn load_page(json: &str) -> Result<Document, LoadError> {
    let description: PageDescription =
        serde_json::from_str(json).map_err(|source| LoadError::Parse { source })?;
    Ok(build_document(&description))
}

/// Read and parse a page description file.
pub fn load_page_file(path: &str) -> Result<Document, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_string(),
        source,
    })?;
    load_page(&content)
}

/// Materialize a parsed description as a `Document`.
pub fn build_document(description: &PageDescription) -> Document {
    let mut doc = Document::new(&description.title, &description.url);
    doc.viewport = description.viewport;
    let root = doc.root();
    build_node(&mut doc, root, &description.root);
    doc
}

fn build_node(doc: &mut Document, parent: NodeId, description: &NodeDescription) {
    let node = doc.create_element(&description.tag);
    doc.append_child(parent, node);

    for (name, value) in &description.attrs {
        doc.set_attr(node, name, value);
    }
    if let Some(text) = &description.text {
        doc.set_text(node, text);
    }
    for (event, handler) in &description.handlers {
        doc.set_property(node, event, handler.clone());
    }
    if let Some(el) = doc.element_mut(node) {
        el.style = description.style.clone();
        el.rect = description.rect;
    }

    for child in &description.children {
        build_node(doc, node, child);
    }
}
