//! Domain entities for event reporting
//!
//! This module contains the core data types for Faultline:
//! - Events: the immutable records submitted to a transport
//! - Breadcrumbs: bounded-history trail entries enriching later events
//! - Users: optional identity attached to events
//! - Severity levels shared by events and breadcrumbs

pub mod breadcrumb;
pub mod event;
pub mod user;

// Re-export commonly used types
pub use breadcrumb::Breadcrumb;
pub use event::{Event, EventId, Exception, Level};
pub use user::User;
