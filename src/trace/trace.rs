use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

// ============================================================================
// Intercepted-call trace events
// ============================================================================

/// One JSONL line per intercepted host call.
#[derive(Debug, Serialize)]
pub struct ProbeEvent {
    pub timestamp_ms: u128,

    /// Intercepted method name ("addEventListener", "setTimeout", ...).
    pub call: String,

    /// Structural address of the receiver, when the call has one.
    pub target: Option<String>,

    /// Event kind for registration calls.
    pub event: Option<String>,

    /// Free-form payload (URL, delay, request body...).
    pub detail: Option<String>,
}

impl ProbeEvent {
    pub fn now(call: &str) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            call: call.to_string(),
            target: None,
            event: None,
            detail: None,
        }
    }

    pub fn with_target(mut self, target: impl ToString) -> Self {
        self.target = Some(target.to_string());
        self
    }

    pub fn with_event(mut self, event: impl ToString) -> Self {
        self.event = Some(event.to_string());
        self
    }

    pub fn with_detail(mut self, detail: impl ToString) -> Self {
        self.detail = Some(detail.to_string());
        self
    }
}
