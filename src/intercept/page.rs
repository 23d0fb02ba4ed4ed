use crate::dom::document::{Document, Handler, NodeId};
use crate::intercept::wrap::{CallValue, HostObject};

// ============================================================================
// Host method names
// ============================================================================

pub const ADD_EVENT_LISTENER: &str = "addEventListener";
pub const SET_TIMEOUT: &str = "setTimeout";
pub const SET_INTERVAL: &str = "setInterval";
pub const OPEN: &str = "open";
pub const SEND: &str = "send";

// ============================================================================
// Page
// ============================================================================

/// A live page: the document plus the host surfaces scripts call into.
///
/// Every call goes through the surface's method slots, so installed wraps
/// observe it; the native implementations record their effects on the
/// document (listener lists, armed timers, opened windows, issued requests),
/// which is what transparent wraps must preserve and suppressing wraps must
/// prevent.
pub struct Page {
    pub document: Document,

    /// `addEventListener` surface (element prototype analog).
    pub event_target: HostObject,

    /// Timer and navigation surface (`setTimeout`, `setInterval`, `open`).
    pub window: HostObject,

    /// Request surface (`open`, `send`).
    pub request: HostObject,
}

impl Page {
    pub fn new(document: Document) -> Self {
        let mut event_target = HostObject::new("EventTarget");
        event_target.define(
            ADD_EVENT_LISTENER,
            Box::new(|doc, receiver, args| {
                if let (Some(node), Some(CallValue::Text(kind)), Some(CallValue::Handler(h))) =
                    (receiver, args.first(), args.get(1))
                {
                    doc.add_listener(node, kind, h.clone());
                }
                CallValue::Null
            }),
        );

        let mut window = HostObject::new("Window");
        window.define(
            SET_TIMEOUT,
            Box::new(|doc, _receiver, args| arm_timer(doc, args, false)),
        );
        window.define(
            SET_INTERVAL,
            Box::new(|doc, _receiver, args| arm_timer(doc, args, true)),
        );
        window.define(
            OPEN,
            Box::new(|doc, _receiver, args| {
                if let Some(CallValue::Text(url)) = args.first() {
                    doc.record_opened_window(url);
                    return CallValue::Bool(true);
                }
                CallValue::Null
            }),
        );

        let mut request = HostObject::new("XMLHttpRequest");
        request.define(
            OPEN,
            Box::new(|doc, _receiver, args| {
                if let (Some(CallValue::Text(method)), Some(CallValue::Text(url))) =
                    (args.first(), args.get(1))
                {
                    doc.record_request(method, url);
                }
                CallValue::Null
            }),
        );
        request.define(
            SEND,
            Box::new(|doc, _receiver, args| {
                if let Some(CallValue::Text(body)) = args.first() {
                    doc.record_sent_payload(body);
                }
                CallValue::Null
            }),
        );

        Self {
            document,
            event_target,
            window,
            request,
        }
    }

    // ------------------------------------------------------------------
    // Script-facing entry points
    // ------------------------------------------------------------------

    pub fn add_event_listener(&mut self, target: NodeId, kind: &str, handler: Handler) {
        self.event_target.invoke(
            &mut self.document,
            ADD_EVENT_LISTENER,
            Some(target),
            vec![
                CallValue::Text(kind.to_string()),
                CallValue::Handler(handler),
            ],
        );
    }

    pub fn set_timeout(&mut self, handler: Handler, delay_ms: f64) -> CallValue {
        self.window.invoke(
            &mut self.document,
            SET_TIMEOUT,
            None,
            vec![CallValue::Handler(handler), CallValue::Number(delay_ms)],
        )
    }

    pub fn set_interval(&mut self, handler: Handler, delay_ms: f64) -> CallValue {
        self.window.invoke(
            &mut self.document,
            SET_INTERVAL,
            None,
            vec![CallValue::Handler(handler), CallValue::Number(delay_ms)],
        )
    }

    pub fn open_window(&mut self, url: &str) -> CallValue {
        self.window.invoke(
            &mut self.document,
            OPEN,
            None,
            vec![CallValue::Text(url.to_string())],
        )
    }

    pub fn request_open(&mut self, method: &str, url: &str) -> CallValue {
        self.request.invoke(
            &mut self.document,
            OPEN,
            None,
            vec![
                CallValue::Text(method.to_string()),
                CallValue::Text(url.to_string()),
            ],
        )
    }

    pub fn request_send(&mut self, body: &str) -> CallValue {
        self.request.invoke(
            &mut self.document,
            SEND,
            None,
            vec![CallValue::Text(body.to_string())],
        )
    }
}

fn arm_timer(doc: &mut Document, args: &[CallValue], repeating: bool) -> CallValue {
    let Some(CallValue::Handler(handler)) = args.first() else {
        return CallValue::Null;
    };
    let delay_ms = args.get(1).and_then(CallValue::as_number).unwrap_or(0.0);
    CallValue::Number(doc.arm_timer(handler.clone(), delay_ms, repeating) as f64)
}
