use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::catalog::catalog::Catalog;
use crate::catalog::cataloger::Cataloger;
use crate::catalog::record_model::{RequestRecord, TimerRecord};
use crate::dom::document::Handler;
use crate::identity::digest::ContentDigest;
use crate::identity::locator::locate;
use crate::intercept::page::{ADD_EVENT_LISTENER, OPEN, Page, SEND, SET_INTERVAL, SET_TIMEOUT};
use crate::intercept::wrap::{CallValue, InstrumentError, WrapHandle, WrapMode};
use crate::trace::logger::TraceLogger;
use crate::trace::trace::ProbeEvent;

// ============================================================================
// Session configuration
// ============================================================================

/// Requested timer delays above this are rewritten to it before forwarding.
pub const DEFAULT_MAX_TIMER_DELAY_MS: f64 = 65_000.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Upper bound applied to forwarded timer delays.
    #[serde(default = "default_max_timer_delay_ms")]
    pub max_timer_delay_ms: f64,

    /// JSONL trace sink for intercepted calls; `None` disables tracing.
    #[serde(default)]
    pub trace_file: Option<String>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            max_timer_delay_ms: DEFAULT_MAX_TIMER_DELAY_MS,
            trace_file: None,
        }
    }
}

fn default_max_timer_delay_ms() -> f64 {
    DEFAULT_MAX_TIMER_DELAY_MS
}

// ============================================================================
// Instrumentation session
// ============================================================================

/// Which host surface a wrap was installed on; needed to route uninstall.
enum Surface {
    EventTarget,
    Window,
    Request,
}

/// One instrumented page: the catalog plus the capability handles for every
/// installed wrap.
///
/// The session owns the catalog; observers share it through
/// `Rc<RefCell<_>>` (single-threaded by construction). Explicit lifecycle:
/// `install` wraps the host surfaces and creates the empty catalog,
/// `uninstall` restores every original method in reverse install order.
pub struct ProbeSession {
    catalog: Rc<RefCell<Catalog>>,
    handles: Vec<(Surface, WrapHandle)>,
}

impl ProbeSession {
    /// Wrap the page's host surfaces and start cataloging.
    ///
    /// - `addEventListener`: transparent wrap into the interaction cataloger.
    /// - `setTimeout` / `setInterval`: clamped wrap (delay argument capped at
    ///   `config.max_timer_delay_ms`) into the timer sequence.
    /// - `window.open`: suppressing wrap into the navigation-target sequence.
    /// - request `open`: transparent wrap into the request sequence.
    /// - request `send`: transparent wrap, trace log only.
    pub fn install(
        page: &mut Page,
        config: &ProbeConfig,
        digest: Rc<dyn ContentDigest>,
    ) -> Result<Self, InstrumentError> {
        let catalog = Rc::new(RefCell::new(Catalog::new()));
        let tracer: Option<Rc<TraceLogger>> = config
            .trace_file
            .as_deref()
            .map(|path| Rc::new(TraceLogger::new(path)));
        let mut handles = Vec::new();

        // Handler registrations.
        let cataloger = Cataloger::new(Rc::clone(&catalog), Rc::clone(&digest));
        let registration_tracer = tracer.clone();
        let handle = page.event_target.install(
            ADD_EVENT_LISTENER,
            WrapMode::Transparent,
            Box::new(move |doc, receiver, args| {
                let Some(target) = receiver else { return };
                let (Some(CallValue::Text(kind)), Some(CallValue::Handler(handler))) =
                    (args.first(), args.get(1))
                else {
                    return;
                };
                cataloger.observe_registration(doc, target, kind, handler);
                if let Some(tracer) = &registration_tracer {
                    tracer.log(
                        &ProbeEvent::now(ADD_EVENT_LISTENER)
                            .with_target(locate(doc, target))
                            .with_event(kind),
                    );
                }
            }),
        )?;
        handles.push((Surface::EventTarget, handle));

        // Timer registrations, delay-clamped.
        for (method, repeating) in [(SET_TIMEOUT, false), (SET_INTERVAL, true)] {
            let catalog_ref = Rc::clone(&catalog);
            let digest_ref = Rc::clone(&digest);
            let timer_tracer = tracer.clone();
            let handle = page.window.install(
                method,
                WrapMode::Clamp {
                    arg_index: 1,
                    max: config.max_timer_delay_ms,
                },
                Box::new(move |_doc, _receiver, args| {
                    let Some(handler) = args.first().and_then(CallValue::as_handler) else {
                        return;
                    };
                    let delay_ms = args.get(1).and_then(CallValue::as_number).unwrap_or(0.0);
                    catalog_ref.borrow_mut().push_timer(TimerRecord {
                        function_id: digest_of(&*digest_ref, handler),
                        function_name: handler.name.clone(),
                        delay_ms,
                        repeating,
                    });
                    if let Some(tracer) = &timer_tracer {
                        tracer.log(&ProbeEvent::now(method).with_detail(delay_ms));
                    }
                }),
            )?;
            handles.push((Surface::Window, handle));
        }

        // Window opens: record the intent, prevent the navigation.
        let catalog_ref = Rc::clone(&catalog);
        let open_tracer = tracer.clone();
        let handle = page.window.install(
            OPEN,
            WrapMode::Suppress,
            Box::new(move |_doc, _receiver, args| {
                let Some(url) = args.first().and_then(CallValue::as_text) else {
                    return;
                };
                catalog_ref.borrow_mut().push_window_target(url.to_string());
                if let Some(tracer) = &open_tracer {
                    tracer.log(&ProbeEvent::now(OPEN).with_detail(url));
                }
            }),
        )?;
        handles.push((Surface::Window, handle));

        // Request initiations.
        let catalog_ref = Rc::clone(&catalog);
        let request_tracer = tracer.clone();
        let handle = page.request.install(
            OPEN,
            WrapMode::Transparent,
            Box::new(move |_doc, _receiver, args| {
                let (Some(method), Some(url)) = (
                    args.first().and_then(CallValue::as_text),
                    args.get(1).and_then(CallValue::as_text),
                ) else {
                    return;
                };
                catalog_ref.borrow_mut().push_request(RequestRecord {
                    method: method.to_string(),
                    url: url.to_string(),
                });
                if let Some(tracer) = &request_tracer {
                    tracer.log(&ProbeEvent::now(OPEN).with_detail(format!("{} {}", method, url)));
                }
            }),
        )?;
        handles.push((Surface::Request, handle));

        // Request payloads are observed but only traced.
        let send_tracer = tracer.clone();
        let handle = page.request.install(
            SEND,
            WrapMode::Transparent,
            Box::new(move |_doc, _receiver, args| {
                if let Some(tracer) = &send_tracer {
                    let body = args.first().and_then(CallValue::as_text).unwrap_or("");
                    tracer.log(&ProbeEvent::now(SEND).with_detail(body));
                }
            }),
        )?;
        handles.push((Surface::Request, handle));

        Ok(Self { catalog, handles })
    }

    /// Shared handle to the live catalog.
    pub fn catalog(&self) -> Rc<RefCell<Catalog>> {
        Rc::clone(&self.catalog)
    }

    /// Owned snapshot of the catalog as observed so far.
    pub fn export(&self) -> Catalog {
        self.catalog.borrow().clone()
    }

    /// Restore every wrapped method, newest first, and consume the session.
    pub fn uninstall(mut self, page: &mut Page) -> Result<(), InstrumentError> {
        while let Some((surface, handle)) = self.handles.pop() {
            match surface {
                Surface::EventTarget => page.event_target.uninstall(&handle)?,
                Surface::Window => page.window.uninstall(&handle)?,
                Surface::Request => page.request.uninstall(&handle)?,
            }
        }
        Ok(())
    }
}

fn digest_of(digest: &dyn ContentDigest, handler: &Handler) -> String {
    handler
        .source_text()
        .map(|source| digest.digest(source))
        .unwrap_or_default()
}
