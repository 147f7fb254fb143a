//! Transport port (driven/secondary port)
//!
//! This module defines the interface for handing finished events to the
//! delivery layer. Implementations may POST to an ingestion endpoint, write
//! to a local queue, or record events in memory for tests.
//!
//! ## Design Notes
//!
//! - `send` is fire-and-forget: it must not block the caller on network
//!   I/O. Adapters that perform I/O own a delivery worker and enqueue.
//! - The trait is deliberately synchronous so capture is usable from any
//!   thread or async task without requiring a runtime; `flush` is the only
//!   operation allowed to block, bounded by its timeout.
//! - Implementations must be safe for concurrent submission from many
//!   threads without external locking.

use std::time::Duration;

use crate::domain::Event;

/// Port trait for outbound event delivery.
pub trait ITransport: Send + Sync {
    /// Accepts one finished event for delivery.
    ///
    /// Must return quickly; delivery failures are the adapter's concern and
    /// are never surfaced to the capture path.
    fn send(&self, event: Event);

    /// Blocks until every previously accepted event has been handed off, or
    /// the timeout elapses.
    ///
    /// Returns `true` when everything was handed off in time. A zero
    /// timeout never blocks and reports the current state.
    fn flush(&self, timeout: Duration) -> bool;
}
