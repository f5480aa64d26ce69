//! Handler Registry Module
//!
//! Maps inbound event names to ordered lists of subscriber callbacks.
//! Registration hands back a [`Subscription`] that acts as the disposer;
//! handlers for one event always fire in registration order.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use serde_json::Value;
use tracing::trace;

/// Subscriber callback for one event name.
///
/// Reference-counted so dispatch can snapshot the handler list and invoke it
/// outside the registry lock.
pub type Handler = Arc<dyn Fn(&Value) + Send + Sync>;

// == Handler Registry ==
/// Event name to ordered handler list.
#[derive(Default)]
pub struct HandlerRegistry {
    next_id: u64,
    handlers: HashMap<String, Vec<(u64, Handler)>>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `event`, returning its registration id.
    pub fn register(&mut self, event: &str, handler: Handler) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.handlers
            .entry(event.to_string())
            .or_default()
            .push((id, handler));
        id
    }

    /// Removes the handler with `id` from `event`. Returns whether anything
    /// was removed.
    pub fn unregister(&mut self, event: &str, id: u64) -> bool {
        let Some(list) = self.handlers.get_mut(event) else {
            return false;
        };

        let before = list.len();
        list.retain(|(handler_id, _)| *handler_id != id);
        let removed = list.len() != before;

        if list.is_empty() {
            self.handlers.remove(event);
        }
        removed
    }

    /// Returns the handlers for `event` in registration order.
    pub fn handlers_for(&self, event: &str) -> Vec<Handler> {
        self.handlers
            .get(event)
            .map(|list| list.iter().map(|(_, handler)| Arc::clone(handler)).collect())
            .unwrap_or_default()
    }

    /// Number of handlers registered for `event`.
    pub fn handler_count(&self, event: &str) -> usize {
        self.handlers.get(event).map_or(0, Vec::len)
    }
}

/// Dispatches `event` to every registered handler, in registration order.
/// Returns the number of handlers invoked.
///
/// The handler list is snapshotted and the lock released before any handler
/// runs, so a handler may register or cancel subscriptions mid-dispatch
/// without re-entering the lock.
pub fn dispatch(registry: &Mutex<HandlerRegistry>, event: &str, payload: &Value) -> usize {
    let handlers = lock_registry(registry).handlers_for(event);

    if handlers.is_empty() {
        trace!(event, "inbound event has no subscribers");
        return 0;
    }

    for handler in &handlers {
        handler(payload);
    }
    handlers.len()
}

/// Locks a shared registry, recovering from poisoning: handlers are caller
/// code and a panicking handler must not wedge the whole client.
pub(crate) fn lock_registry(
    registry: &Mutex<HandlerRegistry>,
) -> MutexGuard<'_, HandlerRegistry> {
    registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// == Subscription ==
/// Disposer for one registered handler.
///
/// Cancellation is explicit: dropping the subscription leaves the handler
/// registered, so handles can be ignored safely.
pub struct Subscription {
    event: String,
    id: u64,
    registry: Weak<Mutex<HandlerRegistry>>,
}

impl Subscription {
    pub(crate) fn new(event: String, id: u64, registry: &Arc<Mutex<HandlerRegistry>>) -> Self {
        Self {
            event,
            id,
            registry: Arc::downgrade(registry),
        }
    }

    /// The event name this subscription listens on.
    pub fn event(&self) -> &str {
        &self.event
    }

    /// Unregisters the handler. No-op if the client is already gone.
    pub fn cancel(self) {
        if let Some(registry) = self.registry.upgrade() {
            lock_registry(&registry).unregister(&self.event, self.id);
        }
    }
}
