/// The merged dispatch loop
use super::core::OrderBridge;
use crate::error::DispatchError;
use crate::event::{Event, EventTypeId};
use crate::handler::HandlerCache;
use crate::listener::ListenerHandle;
use crate::order::Phase;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{error, trace};

impl OrderBridge {
    /// Dispatches one fired event.
    ///
    /// Listeners run in the order given. Before the first listener of each
    /// priority bucket, every internal phase up to and including the bucket's
    /// paired phase is flushed. Untagged listeners never trigger a flush.
    /// Phases still pending once the listeners are exhausted are flushed at
    /// the end, so every internal handler runs exactly once per call.
    ///
    /// Failures in listeners or handlers are logged and skipped.
    ///
    /// Returns `true` iff the event ends up both cancelable and cancelled.
    pub fn post(&self, event: &mut dyn Event, listeners: &[ListenerHandle]) -> bool {
        let cache = self.resolver.resolve_type(self.dispatch_type(event));
        // `None` once POST has been flushed
        let mut next_phase = Some(Phase::Pre);

        for listener in listeners {
            if let Some(bucket) = listener.priority() {
                let boundary = self.tables.priorities().phase_for(bucket);
                // A bucket already flushed past must not move the cursor back
                if let Some(from) = next_phase.filter(|from| *from <= boundary) {
                    self.flush(event, &cache, Phase::span(from, boundary));
                    next_phase = boundary.next();
                }
            }
            self.invoke_listener(listener, event);
        }

        if let Some(from) = next_phase {
            self.flush(event, &cache, Phase::span(from, Phase::Post));
        }

        let cancelled = event.is_cancelable() && event.is_cancelled();
        self.counters.record_post(cancelled);
        cancelled
    }

    /// Event type whose handler cache serves `event`. A posted external event
    /// runs the handlers of the internal type it is mapped from.
    fn dispatch_type(&self, event: &dyn Event) -> EventTypeId {
        let event_type = event.event_type();
        match self.tables.event_types().internal_for(&event_type) {
            Some(internal) => internal.clone(),
            None => event_type,
        }
    }

    fn flush(&self, event: &mut dyn Event, cache: &HandlerCache, phases: &[Phase]) {
        for &phase in phases {
            let handlers = cache.handlers(phase);
            if handlers.is_empty() {
                continue;
            }
            trace!("⏩ Flushing {} handlers at {}", handlers.len(), phase);

            for handler in handlers {
                let result = isolate(|| handler.invoke(&mut *event));
                if let Err(e) = &result {
                    error!(
                        "❌ Handler {} failed at {} for {}: {}",
                        handler.name(),
                        phase,
                        event.event_type(),
                        e
                    );
                }
                self.counters.record_handler(result.is_err());
            }
        }
    }

    fn invoke_listener(&self, listener: &ListenerHandle, event: &mut dyn Event) {
        let result = isolate(|| listener.invoke(&mut *event));
        if let Err(e) = &result {
            error!(
                "❌ Listener {} ({:?}) failed for {}: {}",
                listener.name(),
                listener.priority(),
                event.event_type(),
                e
            );
        }
        self.counters.record_listener(result.is_err());
    }
}

/// Runs one callback, turning a panic into a [`DispatchError`].
fn isolate<F>(callback: F) -> Result<(), DispatchError>
where
    F: FnOnce() -> Result<(), DispatchError>,
{
    match catch_unwind(AssertUnwindSafe(callback)) {
        Ok(result) => result,
        Err(payload) => Err(DispatchError::from_panic(payload)),
    }
}
