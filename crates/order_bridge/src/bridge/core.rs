/// Core OrderBridge implementation
use super::stats::{DispatchCounters, DispatchStats};
use crate::event::{Event, EventTypeId};
use crate::handler::{HandlerCacheResolver, HandlerRegistry};
use crate::tables::BridgeTables;
use std::fmt;
use tracing::{info, warn};

/// Merges externally prioritized listeners with phase-ordered internal
/// handlers into one dispatch order.
///
/// The bridge owns its tables and the handler registry; both are fixed once
/// the bridge is constructed. Dispatch takes `&self`, so one bridge can be
/// shared between threads behind an `Arc`.
pub struct OrderBridge {
    pub(super) tables: BridgeTables,
    pub(super) resolver: HandlerCacheResolver,
    pub(super) counters: DispatchCounters,
}

impl OrderBridge {
    /// Creates a bridge and precomputes the handler cache of every event
    /// type the registry knows about.
    pub fn new(tables: BridgeTables, registry: HandlerRegistry) -> Self {
        let handlers = registry.handler_count();
        let resolver = HandlerCacheResolver::new(registry);
        let precomputed = resolver.precompute();

        info!(
            "🌉 Order bridge ready: {} handlers across {} event types",
            handlers, precomputed
        );

        Self {
            tables,
            resolver,
            counters: DispatchCounters::default(),
        }
    }

    pub fn tables(&self) -> &BridgeTables {
        &self.tables
    }

    pub fn resolver(&self) -> &HandlerCacheResolver {
        &self.resolver
    }

    /// External event type paired with `internal`, if any
    pub fn external_type_for(&self, internal: &EventTypeId) -> Option<&EventTypeId> {
        self.tables.event_types().external_for(internal)
    }

    /// Converts an internal event into its external representation.
    ///
    /// Returns `None` for event types without a mapping.
    pub fn to_external(&self, event: &dyn Event) -> Option<Box<dyn Event>> {
        let event_type = event.event_type();
        let converted = self.tables.conversion_for(&event_type)?.apply(event);
        if converted.is_none() {
            warn!("⚠️ {} reports a mapped type but is not its registered struct", event_type);
        }
        converted
    }

    pub fn stats(&self) -> DispatchStats {
        self.counters.snapshot(self.resolver.caches_built())
    }
}

impl fmt::Debug for OrderBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderBridge")
            .field("tables", &self.tables)
            .field("resolver", &self.resolver)
            .finish()
    }
}
