use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dom::document::{Document, Handler, NodeId};
use crate::intercept::page::Page;

// ============================================================================
// Call scripts
// ============================================================================

/// A scripted sequence of host calls to drive an instrumented page.
///
/// Deserialized from YAML; used to replay registration/timer/navigation
/// activity against a loaded page description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallScript {
    pub calls: Vec<ScriptCall>,
}

/// One scripted host call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptCall {
    /// Register an event listener on a target element
    Listen {
        target: String,
        event: String,
        handler: Handler,
    },

    /// Arm a one-shot timer
    Timeout { handler: Handler, delay_ms: f64 },

    /// Arm a repeating timer
    Interval { handler: Handler, delay_ms: f64 },

    /// Open a new window/tab
    OpenWindow { url: String },

    /// Open a request
    RequestOpen { method: String, url: String },

    /// Send the pending request body
    RequestSend { body: String },
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub enum ScriptError {
    /// Script file could not be read
    Io { path: String, source: std::io::Error },

    /// Script YAML failed to parse
    Parse { source: serde_yaml::Error },

    /// A scripted target selector matched no element
    ElementNotFound { selector: String },
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::Io { path, source } => {
                write!(f, "Failed to read call script '{}': {}", path, source)
            }
            ScriptError::Parse { source } => {
                write!(f, "Invalid call script: {}", source)
            }
            ScriptError::ElementNotFound { selector } => {
                write!(f, "No element matches script target '{}'", selector)
            }
        }
    }
}

impl std::error::Error for ScriptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScriptError::Io { source, .. } => Some(source),
            ScriptError::Parse { source } => Some(source),
            ScriptError::ElementNotFound { .. } => None,
        }
    }
}

// ============================================================================
// Loading and replay
// ============================================================================

pub fn load_script(yaml: &str) -> Result<CallScript, ScriptError> {
    serde_yaml::from_str(yaml).map_err(|source| ScriptError::Parse { source })
}

pub fn load_script_file(path: &str) -> Result<CallScript, ScriptError> {
    let content = std::fs::read_to_string(path).map_err(|source| ScriptError::Io {
        path: path.to_string(),
        source,
    })?;
    load_script(&content)
}

/// Resolve a script target: `#id` for an identifier lookup, otherwise the
/// first element with the given tag, in document order.
pub fn resolve_target(doc: &Document, selector: &str) -> Option<NodeId> {
    if let Some(id) = selector.strip_prefix('#') {
        doc.elements()
            .into_iter()
            .find(|&node| doc.attr(node, "id") == Some(id))
    } else {
        let tag = selector.to_ascii_lowercase();
        doc.elements()
            .into_iter()
            .find(|&node| doc.tag(node) == Some(tag.as_str()))
    }
}

/// Drive every scripted call through the page's host surfaces, in order.
pub fn replay(page: &mut Page, script: &CallScript) -> Result<(), ScriptError> {
    for call in &script.calls {
        match call {
            ScriptCall::Listen {
                target,
                event,
                handler,
            } => {
                let node = resolve_target(&page.document, target).ok_or_else(|| {
                    ScriptError::ElementNotFound {
                        selector: target.clone(),
                    }
                })?;
                page.add_event_listener(node, event, handler.clone());
            }
            ScriptCall::Timeout { handler, delay_ms } => {
                page.set_timeout(handler.clone(), *delay_ms);
            }
            ScriptCall::Interval { handler, delay_ms } => {
                page.set_interval(handler.clone(), *delay_ms);
            }
            ScriptCall::OpenWindow { url } => {
                page.open_window(url);
            }
            ScriptCall::RequestOpen { method, url } => {
                page.request_open(method, url);
            }
            ScriptCall::RequestSend { body } => {
                page.request_send(body);
            }
        }
    }
    Ok(())
}
