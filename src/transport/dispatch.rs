//! Event listener registry.
//!
//! Routes uncorrelated inbound messages to listeners by event name.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::protocol::{Event, EventName};

// ============================================================================
// Types
// ============================================================================

/// Event listener callback type.
///
/// Called on the connection's event loop for each matching event, so it
/// should return quickly; spawn a task for anything slow.
pub type EventListener = Arc<dyn Fn(&Event) + Send + Sync>;

// ============================================================================
// EventDispatcher
// ============================================================================

/// Event name to ordered listener list.
///
/// Keyed by wire name, so `EventName::Other("Page.loadEventFired")` and
/// `EventName::PageLoadEventFired` share one entry.
#[derive(Default)]
pub struct EventDispatcher {
    listeners: Mutex<FxHashMap<String, Vec<EventListener>>>,
}

impl EventDispatcher {
    /// Creates an empty dispatcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a listener for `event`.
    pub fn register(&self, event: &EventName, listener: EventListener) {
        self.listeners
            .lock()
            .entry(event.as_str().to_string())
            .or_default()
            .push(listener);
    }

    /// Invokes every listener for the event's name, in registration order.
    ///
    /// The listener list is copied out before any listener runs; a listener
    /// may register further listeners, which see the next event.
    ///
    /// Returns the number of listeners invoked.
    pub fn dispatch(&self, event: &Event) -> usize {
        let listeners = self.listeners.lock().get(&event.method).cloned();

        let Some(listeners) = listeners else {
            trace!(method = %event.method, "No listeners for event");
            return 0;
        };

        for listener in &listeners {
            listener(event);
        }

        listeners.len()
    }

    /// Returns the number of listeners registered for `event`.
    #[must_use]
    pub fn listener_count(&self, event: &EventName) -> usize {
        self.listeners
            .lock()
            .get(event.as_str())
            .map_or(0, Vec::len)
    }
}

// ============================================================================
// Tests
// ============================================================================
