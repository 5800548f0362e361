//! # Order Bridge
//!
//! Bridges an external dispatcher that orders its listeners by five coarse
//! priority buckets onto an internal handler registry that orders handlers by
//! a finer list of phases, producing one global dispatch order per event.
//!
//! ## Key Concepts
//!
//! - **Phase**: fine-grained ordered stage internal handlers register against
//! - **PriorityBucket**: coarse ordered stage of the external dispatcher
//! - **ListenerHandle**: opaque external listener, optionally tagged with a bucket
//! - **HandlerCache**: per event type, the handlers of every phase
//! - **Flush**: running all handlers of a range of phases, in phase order
//!
//! Priority-tagged listeners act as interleave points: internal handlers of a
//! phase always run before external listeners of the paired bucket and after
//! handlers of every earlier phase.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use order_bridge::*;
//!
//! #[derive(Debug)]
//! struct BlockBreak {
//!     cancelled: bool,
//! }
//!
//! impl Event for BlockBreak {
//!     fn event_type(&self) -> EventTypeId {
//!         EventTypeId::new("block.break")
//!     }
//!     fn is_cancelable(&self) -> bool {
//!         true
//!     }
//!     fn is_cancelled(&self) -> bool {
//!         self.cancelled
//!     }
//!     fn set_cancelled(&mut self, cancelled: bool) {
//!         self.cancelled = cancelled;
//!     }
//! }
//!
//! fn main() -> Result<()> {
//!     let tables = BridgeTables::build(&TableConfig::default(), ConversionRegistry::new())?;
//!
//!     let mut handlers = HandlerRegistry::new();
//!     handlers.register("block.break", Phase::Early, "protect-spawn", |event| {
//!         event.set_cancelled(true);
//!         Ok(())
//!     });
//!
//!     let bridge = OrderBridge::new(tables, handlers);
//!     let listeners = [ListenerHandle::from_fn("audit", Some(PriorityBucket::Low), |_| Ok(()))];
//!
//!     let cancelled = bridge.post(&mut BlockBreak { cancelled: false }, &listeners);
//!     assert!(cancelled);
//!     Ok(())
//! }
//! ```

pub mod bridge;
pub mod config;
pub mod error;
pub mod event;
pub mod handler;
pub mod hierarchy;
pub mod listener;
pub mod logging;
pub mod order;
pub mod tables;

pub use bridge::{DispatchStats, OrderBridge};
pub use config::{BridgeConfig, EventMapping, LoggingSettings, PriorityPairing, TableConfig};
pub use error::{BridgeError, DispatchError};
pub use event::{Event, EventTypeId, TypedEvent};
pub use handler::{HandlerCache, HandlerCacheResolver, HandlerRegistry, RegisteredHandler};
pub use hierarchy::EventHierarchy;
pub use listener::{FnListener, Listener, ListenerHandle};
pub use order::{Phase, PriorityBucket};
pub use tables::{
    BridgeTables, Conversion, ConversionRegistry, EventTypeMap, FromInternal, PriorityPhaseMap,
};

/// Result type used for startup operations
pub type Result<T> = std::result::Result<T, BridgeError>;
