//! Reporting client
//!
//! The [`Client`] owns the transport handle and the immutable configuration
//! snapshot. It is the single submission funnel: every capture path builds
//! an event, and the client decides whether it is submitted (empty-payload
//! guard, sampling), stamps configuration metadata, and hands it to the
//! transport. Submission is safe from any number of threads without
//! external locking; the transport owns delivery I/O.

use std::sync::Arc;
use std::time::Duration;

use faultline_core::config::Config;
use faultline_core::domain::{Event, EventId, Level};
use faultline_core::ports::ITransport;
use tracing::debug;

use crate::scope::Scope;

/// Shared handle to the configured transport.
pub struct Client {
    config: Config,
    transport: Arc<dyn ITransport>,
}

impl Client {
    /// Creates a client over an already-constructed transport.
    pub fn new(config: Config, transport: Arc<dyn ITransport>) -> Self {
        Self { config, transport }
    }

    /// Returns the configuration this client was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Submits one event, enriched with the given scope.
    ///
    /// Returns the event id, or `None` when the event was suppressed: an
    /// empty message, or a losing sampling draw. Tags already present on
    /// the event win over scope tags.
    pub fn capture_event(&self, mut event: Event, scope: Option<&Scope>) -> Option<EventId> {
        if event.message.is_empty() {
            debug!("event suppressed: empty message");
            return None;
        }
        if !self.sample() {
            debug!(level = %event.level, "event suppressed by sample rate");
            return None;
        }

        event.environment = self.config.environment.clone();
        event.release = self.config.release.clone();
        if let Some(scope) = scope {
            scope.apply_to_event(&mut event);
        }
        if self.should_attach_backtrace(&event) {
            event.backtrace = Some(std::backtrace::Backtrace::force_capture().to_string());
        }

        let id = event.id;
        if self.config.debug {
            debug!(event_id = %id, level = %event.level, "capturing event");
        }
        self.transport.send(event);
        Some(id)
    }

    /// Blocks until all previously submitted events are handed off, or the
    /// timeout elapses. A zero timeout never blocks.
    pub fn flush(&self, timeout: Duration) -> bool {
        self.transport.flush(timeout)
    }

    /// Event sampling decision. A rate of 1.0 always submits, 0.0 always
    /// suppresses; anything in between is a uniform draw.
    fn sample(&self) -> bool {
        let rate = self.config.sample_rate;
        if rate >= 1.0 {
            return true;
        }
        if rate <= 0.0 {
            return false;
        }
        rand::random::<f64>() < rate
    }

    fn should_attach_backtrace(&self, event: &Event) -> bool {
        self.config.attach_stacktrace
            && event.backtrace.is_none()
            && (event.exception.is_some() || event.level == Level::Fatal)
    }
}

#[cfg(test)]
mod tests {
    use faultline_core::config::Config;
    use faultline_core::domain::Breadcrumb;

    use super::*;
    use crate::transport::MemoryTransport;

    fn test_client(transport: Arc<MemoryTransport>) -> Client {
        let config = Config::builder("https://ingest.example.com").build().unwrap();
        Client::new(config, transport)
    }

    #[test]
    fn empty_message_is_suppressed() {
        let transport = Arc::new(MemoryTransport::new());
        let client = test_client(Arc::clone(&transport));

        let id = client.capture_event(Event::message(Level::Info, ""), None);
        assert!(id.is_none());
        assert!(transport.events().is_empty());
    }

    #[test]
    fn captured_event_is_stamped_with_config() {
        let transport = Arc::new(MemoryTransport::new());
        let config = Config::builder("https://ingest.example.com")
            .environment("staging")
            .release("app@1.0.0")
            .build()
            .unwrap();
        let client = Client::new(config, transport.clone());

        let id = client.capture_event(Event::message(Level::Info, "hello"), None);
        assert!(id.is_some());

        let events = transport.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].environment, "staging");
        assert_eq!(events[0].release.as_deref(), Some("app@1.0.0"));
        assert_eq!(events[0].id, id.unwrap());
    }

    #[test]
    fn zero_sample_rate_suppresses_everything() {
        let transport = Arc::new(MemoryTransport::new());
        let config = Config::builder("https://ingest.example.com")
            .sample_rate(0.0)
            .build()
            .unwrap();
        let client = Client::new(config, transport.clone());

        for _ in 0..10 {
            assert!(client
                .capture_event(Event::message(Level::Error, "boom"), None)
                .is_none());
        }
        assert!(transport.events().is_empty());
    }

    #[test]
    fn scope_state_is_applied() {
        let transport = Arc::new(MemoryTransport::new());
        let client = test_client(Arc::clone(&transport));

        let mut scope = Scope::default();
        scope.set_tag("zone", "eu");
        scope.add_breadcrumb(Breadcrumb::new("t", "step"));

        client.capture_event(Event::message(Level::Info, "m"), Some(&scope));

        let events = transport.events();
        assert_eq!(events[0].tags["zone"], "eu");
        assert_eq!(events[0].breadcrumbs.len(), 1);
    }

    #[test]
    fn backtrace_attaches_to_error_events_only() {
        let transport = Arc::new(MemoryTransport::new());
        let client = test_client(Arc::clone(&transport));

        let err = std::io::Error::new(std::io::ErrorKind::Other, "io fail");
        client.capture_event(Event::from_error(&err), None);
        client.capture_event(Event::message(Level::Info, "plain"), None);

        let events = transport.events();
        assert!(events[0].backtrace.is_some());
        assert!(events[1].backtrace.is_none());
    }

    #[test]
    fn backtrace_respects_config_flag() {
        let transport = Arc::new(MemoryTransport::new());
        let config = Config::builder("https://ingest.example.com")
            .attach_stacktrace(false)
            .build()
            .unwrap();
        let client = Client::new(config, transport.clone());

        let err = std::io::Error::new(std::io::ErrorKind::Other, "io fail");
        client.capture_event(Event::from_error(&err), None);
        assert!(transport.events()[0].backtrace.is_none());
    }

    #[test]
    fn flush_delegates_to_transport() {
        let transport = Arc::new(MemoryTransport::new());
        let client = test_client(transport);
        assert!(client.flush(Duration::ZERO));
    }
}
