//! In-memory transport for tests
//!
//! Records every submitted event in order. Public so downstream users can
//! assert on reported events in their own test suites.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use faultline_core::domain::Event;
use faultline_core::ports::ITransport;

/// Transport that records events instead of delivering them.
#[derive(Default)]
pub struct MemoryTransport {
    events: Mutex<Vec<Event>>,
}

impl MemoryTransport {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all recorded events in submission order.
    pub fn events(&self) -> Vec<Event> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Discards all recorded events.
    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl ITransport for MemoryTransport {
    fn send(&self, event: Event) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }

    fn flush(&self, _timeout: Duration) -> bool {
        // Recording is synchronous; nothing is ever pending.
        true
    }
}
