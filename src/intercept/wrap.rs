use std::collections::HashMap;
use std::fmt;

use crate::dom::document::{Document, Handler, NodeId};

// ============================================================================
// Call values
// ============================================================================

/// A value crossing the host-method boundary (argument or return).
#[derive(Debug, Clone, PartialEq)]
pub enum CallValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Node(NodeId),
    Handler(Handler),
}

impl CallValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CallValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CallValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_handler(&self) -> Option<&Handler> {
        match self {
            CallValue::Handler(h) => Some(h),
            _ => None,
        }
    }
}

/// Native implementation of a host method.
pub type NativeMethod =
    Box<dyn FnMut(&mut Document, Option<NodeId>, &[CallValue]) -> CallValue>;

/// Observation callback invoked before a wrapped method forwards.
pub type CallObserver = Box<dyn FnMut(&mut Document, Option<NodeId>, &[CallValue])>;

// ============================================================================
// Wrap modes
// ============================================================================

/// How an installed wrap treats the underlying method.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WrapMode {
    /// Observe, then forward and return the original result unchanged.
    Transparent,

    /// Observe, never forward; the call returns `Null`.
    Suppress,

    /// Transparent, but the numeric argument at `arg_index` is capped at
    /// `max` before the observer sees it and before forwarding.
    Clamp { arg_index: usize, max: f64 },
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub enum InstrumentError {
    /// Install target has no method slot under that name
    UnknownMethod { object: String, method: String },

    /// Uninstall target is not currently wrapped
    NotWrapped { object: String, method: String },

    /// Uninstall handle does not match the outermost wrap (restore is LIFO)
    RestoreOrder { object: String, method: String },
}

impl fmt::Display for InstrumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstrumentError::UnknownMethod { object, method } => {
                write!(f, "No method '{}' on {}", method, object)
            }
            InstrumentError::NotWrapped { object, method } => {
                write!(f, "Method '{}' on {} is not wrapped", method, object)
            }
            InstrumentError::RestoreOrder { object, method } => {
                write!(
                    f,
                    "Handle does not match the outermost wrap of '{}' on {} (restore wraps in reverse install order)",
                    method, object
                )
            }
        }
    }
}

impl std::error::Error for InstrumentError {}

// ============================================================================
// Host objects and method slots
// ============================================================================

enum Slot {
    Native(NativeMethod),
    Wrapped(Box<WrappedMethod>),
}

struct WrappedMethod {
    id: u64,
    mode: WrapMode,
    observer: CallObserver,
    inner: Slot,
}

/// Capability returned by `HostObject::install`; required to restore the
/// original method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapHandle {
    object: String,
    method: String,
    id: u64,
}

impl WrapHandle {
    pub fn method(&self) -> &str {
        &self.method
    }
}

/// A host object exposing named, interceptable method slots.
///
/// Stands in for the global/prototype objects a page script would patch:
/// method slots can be replaced by wraps that observe every call while
/// preserving (or deliberately suppressing, or bounding) the original
/// behavior. Re-wrapping an already wrapped slot is allowed and compounds
/// interception; restore order is strictly LIFO.
pub struct HostObject {
    name: String,
    slots: HashMap<String, Slot>,
    next_wrap_id: u64,
}

impl HostObject {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            slots: HashMap::new(),
            next_wrap_id: 1,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Define (or replace) the native implementation of a method slot.
    pub fn define(&mut self, method: &str, native: NativeMethod) {
        self.slots.insert(method.to_string(), Slot::Native(native));
    }

    pub fn is_wrapped(&self, method: &str) -> bool {
        matches!(self.slots.get(method), Some(Slot::Wrapped(_)))
    }

    /// Call a method slot through whatever wraps are installed.
    ///
    /// An unknown method returns `Null`; host invocation is never allowed to
    /// fail, since a failure here would break the page rather than the
    /// observation layer.
    pub fn invoke(
        &mut self,
        doc: &mut Document,
        method: &str,
        receiver: Option<NodeId>,
        mut args: Vec<CallValue>,
    ) -> CallValue {
        match self.slots.get_mut(method) {
            Some(slot) => invoke_slot(slot, doc, receiver, &mut args),
            None => CallValue::Null,
        }
    }

    /// Wrap a method slot. Returns the capability handle needed to restore
    /// the original implementation.
    pub fn install(
        &mut self,
        method: &str,
        mode: WrapMode,
        observer: CallObserver,
    ) -> Result<WrapHandle, InstrumentError> {
        let inner = self
            .slots
            .remove(method)
            .ok_or_else(|| InstrumentError::UnknownMethod {
                object: self.name.clone(),
                method: method.to_string(),
            })?;

        let id = self.next_wrap_id;
        self.next_wrap_id += 1;
        self.slots.insert(
            method.to_string(),
            Slot::Wrapped(Box::new(WrappedMethod {
                id,
                mode,
                observer,
                inner,
            })),
        );

        Ok(WrapHandle {
            object: self.name.clone(),
            method: method.to_string(),
            id,
        })
    }

    /// Remove the outermost wrap of a method slot, restoring whatever was
    /// underneath. The handle must identify that outermost wrap.
    pub fn uninstall(&mut self, handle: &WrapHandle) -> Result<(), InstrumentError> {
        let slot = self
            .slots
            .remove(&handle.method)
            .ok_or_else(|| InstrumentError::UnknownMethod {
                object: self.name.clone(),
                method: handle.method.clone(),
            })?;

        match slot {
            Slot::Wrapped(wrapped) if wrapped.id == handle.id => {
                self.slots.insert(handle.method.clone(), wrapped.inner);
                Ok(())
            }
            Slot::Wrapped(wrapped) => {
                self.slots
                    .insert(handle.method.clone(), Slot::Wrapped(wrapped));
                Err(InstrumentError::RestoreOrder {
                    object: self.name.clone(),
                    method: handle.method.clone(),
                })
            }
            native => {
                self.slots.insert(handle.method.clone(), native);
                Err(InstrumentError::NotWrapped {
                    object: self.name.clone(),
                    method: handle.method.clone(),
                })
            }
        }
    }
}

fn invoke_slot(
    slot: &mut Slot,
    doc: &mut Document,
    receiver: Option<NodeId>,
    args: &mut Vec<CallValue>,
) -> CallValue {
    match slot {
        Slot::Native(native) => native(doc, receiver, args),
        Slot::Wrapped(wrapped) => {
            if let WrapMode::Clamp { arg_index, max } = wrapped.mode {
                if let Some(CallValue::Number(n)) = args.get_mut(arg_index) {
                    if *n > max {
                        *n = max;
                    }
                }
            }
            (wrapped.observer)(doc, receiver, args);
            match wrapped.mode {
                WrapMode::Suppress => CallValue::Null,
                _ => invoke_slot(&mut wrapped.inner, doc, receiver, args),
            }
        }
    }
}
