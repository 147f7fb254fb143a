//! Transport adapters
//!
//! Implementations of the [`ITransport`](faultline_core::ports::ITransport)
//! port:
//!
//! - [`HttpTransport`] - the default adapter, delivering events to an HTTP
//!   ingestion endpoint from a background worker thread
//! - [`MemoryTransport`] - an in-memory recorder for tests

pub mod http;
pub mod memory;

pub use http::HttpTransport;
pub use memory::MemoryTransport;
