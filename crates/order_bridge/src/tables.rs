//! Startup lookup tables: priority→phase, internal→external event type, and
//! the conversions derived from the latter.
//!
//! Everything here is validated once in [`BridgeTables::build`] and is
//! immutable afterwards. Dispatch never re-checks these invariants.

use crate::config::TableConfig;
use crate::error::BridgeError;
use crate::event::{Event, EventTypeId, TypedEvent};
use crate::order::{Phase, PriorityBucket};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

/// One-to-one pairing between the five priority buckets and five phases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityPhaseMap {
    forward: [Phase; PriorityBucket::COUNT],
    inverse: [Option<PriorityBucket>; Phase::COUNT],
}

impl PriorityPhaseMap {
    /// Builds the map, failing unless the pairs form a bijection between all
    /// buckets and the phases they name.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, BridgeError>
    where
        I: IntoIterator<Item = (PriorityBucket, Phase)>,
    {
        let mut forward: [Option<Phase>; PriorityBucket::COUNT] = [None; PriorityBucket::COUNT];
        let mut inverse: [Option<PriorityBucket>; Phase::COUNT] = [None; Phase::COUNT];

        for (bucket, phase) in pairs {
            if forward[bucket.index()].is_some() {
                return Err(BridgeError::DuplicatePriority(bucket));
            }
            if let Some(first) = inverse[phase.index()] {
                return Err(BridgeError::PhaseCollision {
                    phase,
                    first,
                    second: bucket,
                });
            }
            forward[bucket.index()] = Some(phase);
            inverse[phase.index()] = Some(bucket);
        }

        let mut resolved = [Phase::Default; PriorityBucket::COUNT];
        for bucket in PriorityBucket::ALL {
            resolved[bucket.index()] =
                forward[bucket.index()].ok_or(BridgeError::MissingPriority(bucket))?;
        }

        Ok(Self {
            forward: resolved,
            inverse,
        })
    }

    #[inline]
    pub fn phase_for(&self, bucket: PriorityBucket) -> Phase {
        self.forward[bucket.index()]
    }

    /// Inverse lookup; `None` for phases no bucket is paired with
    #[inline]
    pub fn bucket_for(&self, phase: Phase) -> Option<PriorityBucket> {
        self.inverse[phase.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (PriorityBucket, Phase)> + '_ {
        PriorityBucket::ALL
            .into_iter()
            .map(move |bucket| (bucket, self.phase_for(bucket)))
    }
}

/// Which external event type represents each internal event type.
///
/// The pairing is one-to-one, so a posted external event selects exactly one
/// internal type whose handlers run for it.
#[derive(Debug, Clone, Default)]
pub struct EventTypeMap {
    entries: HashMap<EventTypeId, EventTypeId>,
    inverse: HashMap<EventTypeId, EventTypeId>,
}

impl EventTypeMap {
    pub fn from_pairs<I>(pairs: I) -> Result<Self, BridgeError>
    where
        I: IntoIterator<Item = (EventTypeId, EventTypeId)>,
    {
        let mut entries = HashMap::new();
        let mut inverse: HashMap<EventTypeId, EventTypeId> = HashMap::new();
        for (internal, external) in pairs {
            if entries.contains_key(&internal) {
                return Err(BridgeError::DuplicateEventMapping(internal));
            }
            if let Some(first) = inverse.get(&external) {
                return Err(BridgeError::SharedExternalType {
                    external,
                    first: first.clone(),
                    second: internal,
                });
            }
            inverse.insert(external.clone(), internal.clone());
            entries.insert(internal, external);
        }
        Ok(Self { entries, inverse })
    }

    pub fn external_for(&self, internal: &EventTypeId) -> Option<&EventTypeId> {
        self.entries.get(internal)
    }

    /// Internal type whose handler cache serves a posted `external` event
    pub fn internal_for(&self, external: &EventTypeId) -> Option<&EventTypeId> {
        self.inverse.get(external)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EventTypeId, &EventTypeId)> {
        self.entries.iter()
    }
}

/// Implemented by external event types that can be built from an internal one.
pub trait FromInternal<I: TypedEvent>: TypedEvent {
    fn from_internal(event: &I) -> Self;
}

type ConvertFn = dyn Fn(&dyn Event) -> Option<Box<dyn Event>> + Send + Sync;

/// A conversion from one internal event type into its external representation.
#[derive(Clone)]
pub struct Conversion {
    internal: EventTypeId,
    output: EventTypeId,
    convert: Arc<ConvertFn>,
}

impl Conversion {
    pub fn internal(&self) -> &EventTypeId {
        &self.internal
    }

    /// The external type this conversion produces
    pub fn output(&self) -> &EventTypeId {
        &self.output
    }

    /// `None` when `event` is not an instance of the internal type, or when
    /// the result is not of the declared output type
    pub fn apply(&self, event: &dyn Event) -> Option<Box<dyn Event>> {
        let converted = (self.convert)(event)?;
        let produced = converted.event_type();
        if produced != self.output {
            warn!(
                "⚠️ Conversion from {} produced {} instead of {}",
                self.internal, produced, self.output
            );
            return None;
        }
        Some(converted)
    }
}

impl fmt::Debug for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Conversion")
            .field("internal", &self.internal)
            .field("output", &self.output)
            .finish()
    }
}

/// Conversions supplied by event type implementations before the tables are built.
#[derive(Debug, Default)]
pub struct ConversionRegistry {
    conversions: Vec<Conversion>,
}

impl ConversionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `X::from_internal` as the conversion for internal type `I`.
    pub fn register<I, X>(&mut self) -> &mut Self
    where
        I: TypedEvent,
        X: FromInternal<I>,
    {
        self.conversions.push(Conversion {
            internal: I::static_type(),
            output: X::static_type(),
            convert: Arc::new(|event: &dyn Event| {
                event
                    .downcast_ref::<I>()
                    .map(|internal| Box::new(X::from_internal(internal)) as Box<dyn Event>)
            }),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.conversions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversions.is_empty()
    }
}

/// The validated, immutable tables injected into [`crate::OrderBridge`].
#[derive(Debug, Clone)]
pub struct BridgeTables {
    priorities: PriorityPhaseMap,
    event_types: EventTypeMap,
    conversions: HashMap<EventTypeId, Conversion>,
}

impl BridgeTables {
    /// Validates the pairing data and resolves a conversion for every mapped
    /// event type.
    pub fn build(config: &TableConfig, registry: ConversionRegistry) -> Result<Self, BridgeError> {
        let priorities = PriorityPhaseMap::from_pairs(
            config.priorities.iter().map(|pair| (pair.bucket, pair.phase)),
        )?;
        let event_types = EventTypeMap::from_pairs(
            config
                .event_mappings
                .iter()
                .map(|mapping| (mapping.internal.clone(), mapping.external.clone())),
        )?;

        let mut registered: HashMap<EventTypeId, Conversion> = HashMap::new();
        for conversion in registry.conversions {
            if registered.contains_key(&conversion.internal) {
                return Err(BridgeError::DuplicateConversion(conversion.internal));
            }
            registered.insert(conversion.internal.clone(), conversion);
        }

        let mut conversions = HashMap::with_capacity(event_types.len());
        for (internal, external) in event_types.iter() {
            let conversion = registered.remove(internal).ok_or_else(|| {
                BridgeError::MissingConversion {
                    internal: internal.clone(),
                    external: external.clone(),
                }
            })?;
            if conversion.output != *external {
                return Err(BridgeError::ConversionReturnType {
                    external: external.clone(),
                    returned: conversion.output,
                });
            }
            conversions.insert(internal.clone(), conversion);
        }

        for unused in registered.keys() {
            warn!("⚠️ Conversion from {} has no event mapping and will never be used", unused);
        }

        info!(
            "🔧 Bridge tables built: {} priorities, {} event mappings",
            PriorityBucket::COUNT,
            conversions.len()
        );

        Ok(Self {
            priorities,
            event_types,
            conversions,
        })
    }

    /// Tables with the standard priority pairing and no event mappings
    pub fn standard() -> Result<Self, BridgeError> {
        Self::build(&TableConfig::default(), ConversionRegistry::new())
    }

    pub fn priorities(&self) -> &PriorityPhaseMap {
        &self.priorities
    }

    pub fn event_types(&self) -> &EventTypeMap {
        &self.event_types
    }

    pub fn conversion_for(&self, internal: &EventTypeId) -> Option<&Conversion> {
        self.conversions.get(internal)
    }
}
