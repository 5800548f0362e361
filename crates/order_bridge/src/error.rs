//! Error types for the order bridge

use crate::event::EventTypeId;
use crate::order::{Phase, PriorityBucket};

/// Startup errors raised while building the bridge tables.
///
/// These describe a broken configuration. Nothing in the bridge catches them;
/// the embedding application is expected to abort initialization.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// A priority bucket was never paired with a phase
    #[error("Priority {0} has no phase pairing")]
    MissingPriority(PriorityBucket),

    /// A priority bucket was paired more than once
    #[error("Priority {0} is paired more than once")]
    DuplicatePriority(PriorityBucket),

    /// Two priority buckets were paired with the same phase
    #[error("Phase {phase} is claimed by both {first} and {second}")]
    PhaseCollision {
        phase: Phase,
        first: PriorityBucket,
        second: PriorityBucket,
    },

    /// An internal event type was mapped to more than one external type
    #[error("Event type {0} is mapped more than once")]
    DuplicateEventMapping(EventTypeId),

    /// Two internal event types were mapped to the same external type
    #[error("External event type {external} is claimed by both {first} and {second}")]
    SharedExternalType {
        external: EventTypeId,
        first: EventTypeId,
        second: EventTypeId,
    },

    /// No conversion was registered for a mapped pair
    #[error("Unable to locate a conversion into {external} from {internal}")]
    MissingConversion {
        internal: EventTypeId,
        external: EventTypeId,
    },

    /// More than one conversion was registered for the same internal type
    #[error("Conversion from {0} is registered more than once")]
    DuplicateConversion(EventTypeId),

    /// The registered conversion produces a different type than the mapping declares
    #[error("Conversion into {external} has an invalid signature: it returns {returned}")]
    ConversionReturnType {
        external: EventTypeId,
        returned: EventTypeId,
    },

    /// Declaring a parent would make the event hierarchy cyclic
    #[error("Declaring {parent} as parent of {child} creates a cycle")]
    HierarchyCycle {
        child: EventTypeId,
        parent: EventTypeId,
    },

    /// Configuration could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),

    /// A global tracing subscriber was already installed
    #[error("Logging setup failed: {0}")]
    Logging(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for BridgeError {
    fn from(err: toml::de::Error) -> Self {
        BridgeError::Config(err.to_string())
    }
}

/// Errors raised by a single listener or handler invocation.
///
/// Dispatch logs and counts these, then moves on to the next invocation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DispatchError {
    /// An external listener reported a failure
    #[error("listener refused the event: {0}")]
    ListenerFailed(String),

    /// An internal handler reported a failure
    #[error("handler refused the event: {0}")]
    HandlerFailed(String),

    /// The callback panicked
    #[error("panicked: {0}")]
    Panicked(String),
}

impl DispatchError {
    /// Convenience constructor for listener implementations
    pub fn listener(reason: impl Into<String>) -> Self {
        DispatchError::ListenerFailed(reason.into())
    }

    /// Convenience constructor for handler implementations
    pub fn handler(reason: impl Into<String>) -> Self {
        DispatchError::HandlerFailed(reason.into())
    }

    pub(crate) fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown payload".to_string()
        };

        DispatchError::Panicked(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_errors_carry_only_the_reason() {
        assert_eq!(
            DispatchError::listener("refused").to_string(),
            "listener refused the event: refused"
        );
        assert_eq!(
            DispatchError::handler("bad state").to_string(),
            "handler refused the event: bad state"
        );
    }

    #[test]
    fn test_panic_payloads() {
        let from_str = DispatchError::from_panic(Box::new("boom"));
        let from_string = DispatchError::from_panic(Box::new(String::from("bang")));
        let opaque = DispatchError::from_panic(Box::new(7_u8));

        assert_eq!(from_str.to_string(), "panicked: boom");
        assert_eq!(from_string.to_string(), "panicked: bang");
        assert_eq!(opaque.to_string(), "panicked: unknown payload");
    }
}
