//! Internal handler registration and the per-type handler caches

use crate::error::{BridgeError, DispatchError};
use crate::event::{Event, EventTypeId};
use crate::hierarchy::EventHierarchy;
use crate::order::Phase;
use compact_str::CompactString;
use dashmap::DashMap;
use smallvec::SmallVec;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

type HandlerFn = dyn Fn(&mut dyn Event) -> Result<(), DispatchError> + Send + Sync;

/// An internal handler bound to an event type and a phase.
pub struct RegisteredHandler {
    name: CompactString,
    event_type: EventTypeId,
    phase: Phase,
    callback: Box<HandlerFn>,
}

impl RegisteredHandler {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The type this handler was registered against (possibly a supertype)
    pub fn event_type(&self) -> &EventTypeId {
        &self.event_type
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn invoke(&self, event: &mut dyn Event) -> Result<(), DispatchError> {
        (self.callback)(event)
    }
}

impl fmt::Debug for RegisteredHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredHandler")
            .field("name", &self.name)
            .field("event_type", &self.event_type)
            .field("phase", &self.phase)
            .finish()
    }
}

/// Handlers for one concrete event type, bucketed by phase.
///
/// Within a phase, handlers registered on the type itself come first, then
/// those of its parent, and so on; ties keep registration order.
#[derive(Debug, Default)]
pub struct HandlerCache {
    by_phase: [SmallVec<[Arc<RegisteredHandler>; 4]>; Phase::COUNT],
}

impl HandlerCache {
    #[inline]
    pub fn handlers(&self, phase: Phase) -> &[Arc<RegisteredHandler>] {
        &self.by_phase[phase.index()]
    }

    pub fn len(&self) -> usize {
        self.by_phase.iter().map(|handlers| handlers.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Registration table read by the bridge. Filled at startup, then handed to
/// [`HandlerCacheResolver`].
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<EventTypeId, Vec<Arc<RegisteredHandler>>>,
    hierarchy: EventHierarchy,
    total: usize,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` to run at `phase` for `event_type` and its descendants.
    pub fn register<F>(
        &mut self,
        event_type: impl Into<EventTypeId>,
        phase: Phase,
        name: &str,
        handler: F,
    ) -> &mut Self
    where
        F: Fn(&mut dyn Event) -> Result<(), DispatchError> + Send + Sync + 'static,
    {
        let event_type = event_type.into();
        let registered = Arc::new(RegisteredHandler {
            name: CompactString::new(name),
            event_type: event_type.clone(),
            phase,
            callback: Box::new(handler),
        });

        debug!("📝 Registered handler {} for {} at {}", name, event_type, phase);
        self.handlers.entry(event_type).or_default().push(registered);
        self.total += 1;
        self
    }

    /// Shorthand for `hierarchy_mut().declare(child, parent)`
    pub fn declare_parent(
        &mut self,
        child: impl Into<EventTypeId>,
        parent: impl Into<EventTypeId>,
    ) -> Result<&mut Self, BridgeError> {
        self.hierarchy.declare(child, parent)?;
        Ok(self)
    }

    pub fn hierarchy(&self) -> &EventHierarchy {
        &self.hierarchy
    }

    pub fn hierarchy_mut(&mut self) -> &mut EventHierarchy {
        &mut self.hierarchy
    }

    pub fn handler_count(&self) -> usize {
        self.total
    }

    /// Every type that has handlers or appears in the hierarchy.
    pub fn known_types(&self) -> BTreeSet<EventTypeId> {
        let mut types = self.hierarchy.known_types();
        types.extend(self.handlers.keys().cloned());
        types
    }

    /// Gathers the handlers of `event_type` and all of its ancestors.
    pub fn build_cache(&self, event_type: &EventTypeId) -> HandlerCache {
        let mut cache = HandlerCache::default();
        for ancestor in self.hierarchy.lineage(event_type) {
            let Some(handlers) = self.handlers.get(&ancestor) else {
                continue;
            };
            for handler in handlers {
                cache.by_phase[handler.phase.index()].push(handler.clone());
            }
        }
        cache
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("event_types", &self.handlers.len())
            .field("handlers", &self.total)
            .finish()
    }
}

/// Memoizes one [`HandlerCache`] per concrete event type.
///
/// Entries are inserted through the map's entry API, so two threads
/// resolving the same new type never observe a partially built cache.
pub struct HandlerCacheResolver {
    registry: HandlerRegistry,
    caches: DashMap<EventTypeId, Arc<HandlerCache>>,
    built: AtomicU64,
}

impl HandlerCacheResolver {
    pub fn new(registry: HandlerRegistry) -> Self {
        Self {
            registry,
            caches: DashMap::new(),
            built: AtomicU64::new(0),
        }
    }

    /// Builds caches for every type the registry knows about and returns
    /// the number of types covered.
    pub fn precompute(&self) -> usize {
        let types = self.registry.known_types();
        let count = types.len();
        for event_type in types {
            self.resolve_type(event_type);
        }
        count
    }

    /// Handler cache for the runtime type of `event`.
    pub fn resolve(&self, event: &dyn Event) -> Arc<HandlerCache> {
        self.resolve_type(event.event_type())
    }

    pub fn resolve_type(&self, event_type: EventTypeId) -> Arc<HandlerCache> {
        if let Some(cache) = self.caches.get(&event_type) {
            return cache.value().clone();
        }

        let key = event_type.clone();
        self.caches
            .entry(event_type)
            .or_insert_with(|| {
                let cache = self.registry.build_cache(&key);
                self.built.fetch_add(1, Ordering::Relaxed);
                debug!("🗂️ Built handler cache for {} ({} handlers)", key, cache.len());
                Arc::new(cache)
            })
            .value()
            .clone()
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Number of cached event types
    pub fn cached_types(&self) -> usize {
        self.caches.len()
    }

    /// Number of caches built since creation
    pub fn caches_built(&self) -> u64 {
        self.built.load(Ordering::Relaxed)
    }
}

impl fmt::Debug for HandlerCacheResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerCacheResolver")
            .field("registry", &self.registry)
            .field("cached_types", &self.caches.len())
            .finish()
    }
}
