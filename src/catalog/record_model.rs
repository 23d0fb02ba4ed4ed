use serde::{Deserialize, Serialize};

// ============================================================================
// Normalized interaction records
// ============================================================================

/// Bounded structural neighborhood of an element, captured at observation
/// time. Owned snapshot: later DOM mutation does not change an emitted
/// context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomContext {
    /// The element's own serialized markup.
    pub current_node: String,

    /// Parent markup, empty string when the element has no parent element.
    pub parent_node: String,

    /// Markup of every sibling other than the element itself, document order.
    pub sibling_nodes: Vec<String>,

    pub page_title: String,
}

/// One observed interaction binding.
///
/// Field names follow the wire shape downstream crawler tooling consumes.
/// `function_id`, `addr`, and `id` may be empty; uniqueness is not
/// guaranteed — deduplication is a consumer concern keyed on
/// `(function_id, addr, event)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub event: String,

    /// Content digest of the handler's source text; empty when the handler
    /// cannot be serialized, or for implied sub-targets of a compound widget.
    pub function_id: String,

    /// Structural address at observation time.
    pub addr: String,

    pub id: String,
    pub tag: String,

    #[serde(rename = "class")]
    pub class_name: String,

    pub dom_context: DomContext,
    pub url: String,
    pub is_visible: bool,
}

/// One observed timer registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerRecord {
    pub function_id: String,
    pub function_name: String,

    /// Delay as forwarded (after clamping).
    pub delay_ms: f64,

    pub repeating: bool,
}

/// One observed request initiation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestRecord {
    pub method: String,
    pub url: String,
}
