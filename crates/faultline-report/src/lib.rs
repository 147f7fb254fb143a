//! Faultline Report - Reporting facade and transports
//!
//! Provides:
//! - `Reporter`: facade constructing the client and issuing captures
//! - `Hub`: per-call-path reporting context with thread-local ambient binding
//! - `Scope`: user/tags/breadcrumb state copied onto events at capture time
//! - `Client`: submission funnel applying sampling and configuration stamps
//! - `HttpTransport` / `MemoryTransport`: delivery adapters
//! - Panic recovery: `Reporter::protect`, `Hub::recover`, `install_panic_hook`
//!
//! # Usage
//!
//! ```rust,no_run
//! use faultline_report::{Config, Hub, Reporter};
//!
//! # fn main() -> Result<(), faultline_report::ReportError> {
//! let config = Config::builder("https://ingest.example.com/events")
//!     .environment("staging")
//!     .release("myapp@1.4.2")
//!     .build()?;
//! let reporter = Reporter::new(config)?;
//!
//! // One isolated context per request/task:
//! let hub = reporter.derive_hub();
//! Hub::run(hub, || {
//!     Hub::current().set_tag("request_id", "r-123");
//!     Hub::current().capture_message("handler started");
//! });
//!
//! reporter.flush(std::time::Duration::from_secs(2));
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod hub;
pub mod recovery;
pub mod reporter;
pub mod scope;
pub mod transport;

pub use client::Client;
pub use error::ReportError;
pub use hub::{Hub, HubGuard};
pub use recovery::{install_panic_hook, payload_message};
pub use reporter::Reporter;
pub use scope::Scope;
pub use transport::{HttpTransport, MemoryTransport};

// Re-export the core types so most users need a single import.
pub use faultline_core::config::{Config, ConfigBuilder, ConfigError};
pub use faultline_core::domain::{Breadcrumb, Event, EventId, Exception, Level, User};
pub use faultline_core::ports::ITransport;
