//! Faultline Core - Domain types and ports
//!
//! This crate contains the I/O-free core of Faultline:
//! - **Domain entities** - `Event`, `Breadcrumb`, `User`, `Level`
//! - **Configuration** - `Config` and `ConfigBuilder` for client construction
//! - **Port definitions** - `ITransport`, the outbound delivery interface
//!   that adapter code in `faultline-report` implements
//!
//! # Architecture
//!
//! The domain module contains pure data types with no external side effects.
//! Ports define trait interfaces that transport adapters implement. The
//! reporting facade in `faultline-report` orchestrates both.

pub mod config;
pub mod domain;
pub mod ports;
