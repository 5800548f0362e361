/// Statistics tracking for dispatch
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of the bridge counters
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchStats {
    /// Calls to `post`
    pub events_posted: u64,
    /// Posts that returned `true`
    pub events_cancelled: u64,
    /// External listener invocations, failed ones included
    pub listeners_invoked: u64,
    /// Listener invocations that returned an error or panicked
    pub listener_failures: u64,
    /// Internal handler invocations, failed ones included
    pub handlers_invoked: u64,
    /// Handler invocations that returned an error or panicked
    pub handler_failures: u64,
    /// Handler caches built so far
    pub handler_caches: u64,
}

#[derive(Debug, Default)]
pub(super) struct DispatchCounters {
    events_posted: AtomicU64,
    events_cancelled: AtomicU64,
    listeners_invoked: AtomicU64,
    listener_failures: AtomicU64,
    handlers_invoked: AtomicU64,
    handler_failures: AtomicU64,
}

impl DispatchCounters {
    pub(super) fn record_post(&self, cancelled: bool) {
        self.events_posted.fetch_add(1, Ordering::Relaxed);
        if cancelled {
            self.events_cancelled.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(super) fn record_listener(&self, failed: bool) {
        self.listeners_invoked.fetch_add(1, Ordering::Relaxed);
        if failed {
            self.listener_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(super) fn record_handler(&self, failed: bool) {
        self.handlers_invoked.fetch_add(1, Ordering::Relaxed);
        if failed {
            self.handler_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(super) fn snapshot(&self, handler_caches: u64) -> DispatchStats {
        DispatchStats {
            events_posted: self.events_posted.load(Ordering::Relaxed),
            events_cancelled: self.events_cancelled.load(Ordering::Relaxed),
            listeners_invoked: self.listeners_invoked.load(Ordering::Relaxed),
            listener_failures: self.listener_failures.load(Ordering::Relaxed),
            handlers_invoked: self.handlers_invoked.load(Ordering::Relaxed),
            handler_failures: self.handler_failures.load(Ordering::Relaxed),
            handler_caches,
        }
    }
}
