//! Reporting facade
//!
//! The [`Reporter`] is the entry point of the crate: it constructs the
//! transport and client from a [`Config`], hands out per-call-path hubs,
//! and offers ambient-context conveniences that resolve the current hub's
//! scope while always submitting through the facade's own client.
//!
//! Construction is the only fallible step. A `Reporter` that exists always
//! has a working client, so no operation needs a defensive
//! failed-construction check.

use std::sync::Arc;
use std::time::Duration;

use faultline_core::config::Config;
use faultline_core::domain::{Breadcrumb, Event, EventId, Level, User};
use faultline_core::ports::ITransport;

use crate::client::Client;
use crate::error::ReportError;
use crate::hub::{apply_direct_tags, Hub};
use crate::transport::HttpTransport;

/// Facade over a constructed reporting client.
///
/// # Example
///
/// ```rust,no_run
/// use faultline_core::config::Config;
/// use faultline_report::Reporter;
///
/// # fn main() -> Result<(), faultline_report::ReportError> {
/// let config = Config::builder("https://ingest.example.com/events")
///     .environment("staging")
///     .build()?;
/// let reporter = Reporter::new(config)?;
///
/// let hub = reporter.derive_hub();
/// hub.set_tag("request_id", "r-123");
/// hub.capture_message("handler started");
/// # Ok(())
/// # }
/// ```
pub struct Reporter {
    client: Arc<Client>,
}

impl Reporter {
    /// Constructs a reporter with the default HTTP transport.
    ///
    /// Fails with [`ReportError::Construction`] when the transport rejects
    /// the endpoint (e.g. a malformed URL).
    pub fn new(config: Config) -> Result<Self, ReportError> {
        let transport = HttpTransport::new(&config.endpoint)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Constructs a reporter over an explicit transport.
    ///
    /// The injection seam for tests and custom delivery mechanisms.
    pub fn with_transport(config: Config, transport: Arc<dyn ITransport>) -> Self {
        Self {
            client: Arc::new(Client::new(config, transport)),
        }
    }

    /// Returns the underlying client handle.
    pub fn client(&self) -> &Arc<Client> {
        &self.client
    }

    /// Returns the configuration this reporter was built with.
    pub fn config(&self) -> &Config {
        self.client.config()
    }

    /// Binds this reporter's client to the process default hub, making
    /// ambient captures work on threads with no explicit binding.
    pub fn install(&self) {
        Hub::default_hub().bind_client(Some(Arc::clone(&self.client)));
    }

    /// Derives a new reporting context for one call path.
    ///
    /// Inherits the scope of the hub currently bound to this thread (the
    /// process default scope when none is bound) and binds this reporter's
    /// client. The parent is never mutated; every call yields an
    /// independent child.
    pub fn derive_hub(&self) -> Arc<Hub> {
        let scope = Hub::current().scope_snapshot();
        Arc::new(Hub::with_scope(Some(Arc::clone(&self.client)), scope))
    }

    // ========================================================================
    // Ambient-context conveniences
    // ========================================================================

    /// Sets the user on the current ambient context.
    pub fn set_user(&self, user: User) {
        Hub::current().set_user(user);
    }

    /// Sets one tag on the current ambient context.
    pub fn set_tag(&self, key: impl Into<String>, value: impl Into<String>) {
        Hub::current().set_tag(key, value);
    }

    /// Sets several tags on the current ambient context.
    pub fn set_tags<I, K, V>(&self, tags: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Hub::current().set_tags(tags);
    }

    /// Appends a breadcrumb to the current ambient context.
    pub fn add_breadcrumb(&self, breadcrumb: Breadcrumb) {
        Hub::current().add_breadcrumb(breadcrumb);
    }

    /// Captures an error against the current ambient context.
    pub fn capture_error<E>(&self, err: &E) -> Option<EventId>
    where
        E: std::error::Error + ?Sized,
    {
        self.capture(Event::from_error(err))
    }

    /// Captures an error with additional tags; direct tags win over scope
    /// tags on key collision.
    pub fn capture_error_with_tags<E>(&self, err: &E, tags: &[(&str, &str)]) -> Option<EventId>
    where
        E: std::error::Error + ?Sized,
    {
        let mut event = Event::from_error(err);
        apply_direct_tags(&mut event, tags);
        self.capture(event)
    }

    /// Captures an informational message against the current ambient
    /// context.
    pub fn capture_message(&self, message: impl Into<String>) -> Option<EventId> {
        self.capture(Event::message(Level::Info, message))
    }

    /// Captures an informational message with additional tags.
    pub fn capture_message_with_tags(
        &self,
        message: impl Into<String>,
        tags: &[(&str, &str)],
    ) -> Option<EventId> {
        let mut event = Event::message(Level::Info, message);
        apply_direct_tags(&mut event, tags);
        self.capture(event)
    }

    /// Blocks until all previously submitted events are handed off, or the
    /// timeout elapses. Zero timeout never blocks.
    pub fn flush(&self, timeout: Duration) -> bool {
        self.client.flush(timeout)
    }

    /// Ambient capture path: current scope, this reporter's client.
    pub(crate) fn capture(&self, event: Event) -> Option<EventId> {
        let scope = Hub::current().scope_snapshot();
        self.client.capture_event(event, Some(&scope))
    }
}
