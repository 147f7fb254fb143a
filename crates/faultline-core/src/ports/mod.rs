//! Port definitions (hexagonal architecture interfaces)
//!
//! Ports are the interfaces the reporting core depends on, with
//! implementations living in adapter code.
//!
//! ## Ports Overview
//!
//! - [`ITransport`] - Outbound event delivery (HTTP adapter, test doubles)

pub mod transport;

pub use transport::ITransport;
