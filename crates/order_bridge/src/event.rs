//! Event model shared by internal handlers and external listeners

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt::{self, Debug};

/// Name identifying an event type, e.g. `world.chunk.load`.
///
/// Runtime dispatch keys on this rather than on Rust types, so several event
/// types may share one struct and hierarchies can be declared explicitly.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventTypeId(CompactString);

impl EventTypeId {
    pub fn new(name: &str) -> Self {
        Self(CompactString::new(name))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EventTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl From<&str> for EventTypeId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Upcast helper so `dyn Event` can be downcast to its concrete type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Trait that every dispatched event implements.
///
/// The same instance is seen by internal handlers and external listeners, so
/// cancellation set by either side is visible to the other.
pub trait Event: AsAny + Send + Sync + Debug + 'static {
    /// Runtime type of this instance; selects the handler cache
    fn event_type(&self) -> EventTypeId;

    fn is_cancelable(&self) -> bool {
        false
    }

    fn is_cancelled(&self) -> bool {
        false
    }

    /// Ignored by events that are not cancelable
    fn set_cancelled(&mut self, _cancelled: bool) {}
}

/// Event whose Rust type always corresponds to one event type id.
pub trait TypedEvent: Event + Sized {
    fn static_type() -> EventTypeId;
}

impl dyn Event {
    pub fn downcast_ref<T: Event>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Event>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    pub fn is<T: Event>(&self) -> bool {
        self.as_any().is::<T>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Explosion {
        cancelled: bool,
    }

    impl Event for Explosion {
        fn event_type(&self) -> EventTypeId {
            Self::static_type()
        }

        fn is_cancelable(&self) -> bool {
            true
        }

        fn is_cancelled(&self) -> bool {
            self.cancelled
        }

        fn set_cancelled(&mut self, cancelled: bool) {
            self.cancelled = cancelled;
        }
    }

    impl TypedEvent for Explosion {
        fn static_type() -> EventTypeId {
            EventTypeId::new("world.explosion")
        }
    }

    #[derive(Debug)]
    struct Tick;

    impl Event for Tick {
        fn event_type(&self) -> EventTypeId {
            EventTypeId::new("server.tick")
        }
    }

    #[test]
    fn test_downcast_through_dyn_event() {
        let mut explosion = Explosion { cancelled: false };
        let event: &mut dyn Event = &mut explosion;

        assert!(event.is::<Explosion>());
        assert!(event.downcast_ref::<Tick>().is_none());

        event.downcast_mut::<Explosion>().unwrap().cancelled = true;
        assert!(event.is_cancelled());
        assert_eq!(event.event_type().as_str(), "world.explosion");
    }

    #[test]
    fn test_non_cancelable_defaults() {
        let mut tick = Tick;
        tick.set_cancelled(true);
        assert!(!tick.is_cancelable());
        assert!(!tick.is_cancelled());
    }

    #[test]
    fn test_event_type_id_display() {
        let id: EventTypeId = "world.chunk.load".into();
        assert_eq!(id.to_string(), "world.chunk.load");
        assert_eq!(id, EventTypeId::new("world.chunk.load"));
    }
}
