//! HTTP delivery transport
//!
//! The default [`ITransport`] adapter. Events are enqueued to a background
//! worker thread that POSTs them as JSON to the configured ingestion
//! endpoint, so capture never blocks on network I/O. An in-flight counter
//! backs `flush`: it is incremented on enqueue and decremented once the
//! delivery attempt finishes, successful or not. Delivery failures are
//! logged and dropped; best-effort telemetry must not crash or block the
//! caller.

use std::sync::mpsc;
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration;

use faultline_core::domain::Event;
use faultline_core::ports::ITransport;
use reqwest::Url;
use tracing::{debug, warn};

use crate::error::ReportError;

/// Timeout applied to each delivery request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Count of events accepted but not yet through their delivery attempt.
struct Inflight {
    count: Mutex<usize>,
    drained: Condvar,
}

impl Inflight {
    fn new() -> Self {
        Self {
            count: Mutex::new(0),
            drained: Condvar::new(),
        }
    }

    fn increment(&self) {
        *self.count.lock().unwrap_or_else(PoisonError::into_inner) += 1;
    }

    fn decrement(&self) {
        let mut count = self.count.lock().unwrap_or_else(PoisonError::into_inner);
        *count = count.saturating_sub(1);
        if *count == 0 {
            self.drained.notify_all();
        }
    }

    /// Waits until the count reaches zero or the timeout elapses. A zero
    /// timeout never blocks and reports the current state.
    fn wait_drained(&self, timeout: Duration) -> bool {
        let count = self.count.lock().unwrap_or_else(PoisonError::into_inner);
        if *count == 0 {
            return true;
        }
        if timeout.is_zero() {
            return false;
        }
        let (count, _) = self
            .drained
            .wait_timeout_while(count, timeout, |pending| *pending > 0)
            .unwrap_or_else(PoisonError::into_inner);
        *count == 0
    }
}

/// Transport delivering events to an HTTP ingestion endpoint.
pub struct HttpTransport {
    sender: Mutex<Option<mpsc::Sender<Event>>>,
    inflight: Arc<Inflight>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl HttpTransport {
    /// Creates the transport and spawns its delivery worker.
    ///
    /// Fails with [`ReportError::Construction`] when the endpoint is not a
    /// valid URL.
    pub fn new(endpoint: &str) -> Result<Self, ReportError> {
        let url = Url::parse(endpoint)
            .map_err(|e| ReportError::Construction(format!("invalid endpoint URL: {e}")))?;

        let (sender, receiver) = mpsc::channel::<Event>();
        let inflight = Arc::new(Inflight::new());
        let worker_inflight = Arc::clone(&inflight);

        let worker = std::thread::Builder::new()
            .name("faultline-transport".to_string())
            .spawn(move || deliver_loop(url, receiver, worker_inflight))
            .map_err(|e| ReportError::Construction(format!("failed to spawn worker: {e}")))?;

        Ok(Self {
            sender: Mutex::new(Some(sender)),
            inflight,
            worker: Mutex::new(Some(worker)),
        })
    }
}

impl ITransport for HttpTransport {
    fn send(&self, event: Event) {
        let sender = self.sender.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(sender) = sender.as_ref() {
            self.inflight.increment();
            if sender.send(event).is_err() {
                self.inflight.decrement();
                warn!("delivery worker is gone; event dropped");
            }
        }
    }

    fn flush(&self, timeout: Duration) -> bool {
        self.inflight.wait_drained(timeout)
    }
}

impl Drop for HttpTransport {
    fn drop(&mut self) {
        // Closing the channel lets the worker drain the queue and exit.
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(worker) = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            let _ = worker.join();
        }
    }
}

/// Delivery loop run on the worker thread.
///
/// The blocking HTTP client is built here rather than in `new`: it owns its
/// own connection state and must not be created on a thread that runs an
/// async runtime.
fn deliver_loop(url: Url, receiver: mpsc::Receiver<Event>, inflight: Arc<Inflight>) {
    let client = match reqwest::blocking::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
    {
        Ok(client) => Some(client),
        Err(e) => {
            warn!(error = %e, "failed to build HTTP client; events will be dropped");
            None
        }
    };

    for event in receiver {
        if let Some(client) = &client {
            match client.post(url.clone()).json(&event).send() {
                Ok(response) if response.status().is_success() => {
                    debug!(event_id = %event.id, "event delivered");
                }
                Ok(response) => {
                    warn!(event_id = %event.id, status = %response.status(), "event rejected by endpoint");
                }
                Err(e) => {
                    warn!(event_id = %event.id, error = %e, "event delivery failed");
                }
            }
        }
        inflight.decrement();
    }
}

#[cfg(test)]
mod tests {
    use faultline_core::domain::{Event, Level};

    use super::*;

    #[test]
    fn malformed_endpoint_is_rejected() {
        assert!(matches!(
            HttpTransport::new("not a url"),
            Err(ReportError::Construction(_))
        ));
    }

    #[test]
    fn idle_flush_returns_immediately() {
        let transport = HttpTransport::new("http://127.0.0.1:9/events").unwrap();
        assert!(transport.flush(Duration::ZERO));
        assert!(transport.flush(Duration::from_secs(1)));
    }

    #[test]
    fn failed_deliveries_still_drain() {
        // Port 9 (discard) is closed on loopback; delivery fails fast but
        // the in-flight count must still reach zero.
        let transport = HttpTransport::new("http://127.0.0.1:9/events").unwrap();
        transport.send(Event::message(Level::Error, "boom"));
        assert!(transport.flush(Duration::from_secs(30)));
    }

    #[test]
    fn drop_joins_the_worker() {
        let transport = HttpTransport::new("http://127.0.0.1:9/events").unwrap();
        transport.send(Event::message(Level::Info, "pending"));
        drop(transport);
    }
}
