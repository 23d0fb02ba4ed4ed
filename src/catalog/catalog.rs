use serde::{Deserialize, Serialize};

use crate::catalog::record_model::{InteractionRecord, RequestRecord, TimerRecord};

// ============================================================================
// Session catalog
// ============================================================================

/// Append-only catalog of everything observed during an instrumentation
/// session.
///
/// Created empty at install time and grows monotonically; this layer never
/// prunes or compacts it. Records append in the exact order their
/// originating calls occur, including reentrant calls, so consumers can rely
/// on catalog order as a session timeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// Handler-registration observations (plus compound-widget expansions).
    pub records: Vec<InteractionRecord>,

    /// Timer registrations, parallel to `records`.
    pub timers: Vec<TimerRecord>,

    /// Request initiations, parallel to `records`.
    pub requests: Vec<RequestRecord>,

    /// Navigation-target URLs from suppressed window-open calls.
    pub window_targets: Vec<String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_record(&mut self, record: InteractionRecord) {
        self.records.push(record);
    }

    pub fn push_timer(&mut self, timer: TimerRecord) {
        self.timers.push(timer);
    }

    pub fn push_request(&mut self, request: RequestRecord) {
        self.requests.push(request);
    }

    pub fn push_window_target(&mut self, url: String) {
        self.window_targets.push(url);
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
            && self.timers.is_empty()
            && self.requests.is_empty()
            && self.window_targets.is_empty()
    }
}
