//! External listener handles supplied by the host dispatcher

use crate::error::DispatchError;
use crate::event::Event;
use crate::order::PriorityBucket;
use compact_str::CompactString;
use std::fmt;
use std::sync::Arc;

/// A listener owned by the external dispatcher.
pub trait Listener: Send + Sync {
    fn invoke(&self, event: &mut dyn Event) -> Result<(), DispatchError>;

    /// Name used when logging failures
    fn name(&self) -> &str {
        "anonymous-listener"
    }
}

/// Closure-backed [`Listener`]
pub struct FnListener<F> {
    name: CompactString,
    callback: F,
}

impl<F> FnListener<F>
where
    F: Fn(&mut dyn Event) -> Result<(), DispatchError> + Send + Sync,
{
    pub fn new(name: &str, callback: F) -> Self {
        Self {
            name: CompactString::new(name),
            callback,
        }
    }
}

impl<F> Listener for FnListener<F>
where
    F: Fn(&mut dyn Event) -> Result<(), DispatchError> + Send + Sync,
{
    fn invoke(&self, event: &mut dyn Event) -> Result<(), DispatchError> {
        (self.callback)(event)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Opaque listener reference, optionally tagged with the bucket it was
/// registered under.
///
/// Tagged handles mark flush boundaries during dispatch. Untagged handles run
/// exactly where they appear in the supplied sequence.
#[derive(Clone)]
pub struct ListenerHandle {
    priority: Option<PriorityBucket>,
    listener: Arc<dyn Listener>,
}

impl ListenerHandle {
    pub fn new(listener: Arc<dyn Listener>, priority: Option<PriorityBucket>) -> Self {
        Self { priority, listener }
    }

    pub fn prioritized(priority: PriorityBucket, listener: Arc<dyn Listener>) -> Self {
        Self::new(listener, Some(priority))
    }

    pub fn unordered(listener: Arc<dyn Listener>) -> Self {
        Self::new(listener, None)
    }

    /// Wraps a closure in a handle
    pub fn from_fn<F>(name: &str, priority: Option<PriorityBucket>, callback: F) -> Self
    where
        F: Fn(&mut dyn Event) -> Result<(), DispatchError> + Send + Sync + 'static,
    {
        Self::new(Arc::new(FnListener::new(name, callback)), priority)
    }

    #[inline]
    pub fn priority(&self) -> Option<PriorityBucket> {
        self.priority
    }

    pub fn name(&self) -> &str {
        self.listener.name()
    }

    #[inline]
    pub fn invoke(&self, event: &mut dyn Event) -> Result<(), DispatchError> {
        self.listener.invoke(event)
    }
}

impl fmt::Debug for ListenerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerHandle")
            .field("name", &self.listener.name())
            .field("priority", &self.priority)
            .finish()
    }
}
