//! Panic recovery and reporting
//!
//! The guaranteed-delivery path for unexpected failures: recovered panic
//! payloads are coerced into `Fatal` events and submitted through the same
//! path as captured errors. Reporting never swallows the failure itself;
//! whether execution resumes or unwinding continues is the caller's choice,
//! steered by the `rethrow_after_recover` configuration knob.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use faultline_core::domain::{Event, EventId, Level};
use tracing::error;

use crate::hub::{apply_direct_tags, Hub};
use crate::reporter::Reporter;

/// How long the process panic hook waits for the transport to hand off the
/// crash event before the previous hook runs.
const HOOK_FLUSH_TIMEOUT: Duration = Duration::from_secs(2);

/// Renders a panic payload as text.
///
/// Returns `None` for payloads that are neither `&str` nor `String`.
pub fn payload_message(payload: &(dyn Any + Send)) -> Option<String> {
    if let Some(s) = payload.downcast_ref::<&str>() {
        Some((*s).to_string())
    } else if let Some(s) = payload.downcast_ref::<String>() {
        Some(s.clone())
    } else {
        None
    }
}

/// Builds the `Fatal` event for a recovered failure.
///
/// Returns `None` when the payload renders to an empty message, which makes
/// the whole recovery a no-op. Payloads that cannot be rendered are coerced
/// to a placeholder message rather than discarded.
fn recovered_event(payload: &(dyn Any + Send), extra_tags: &[(&str, &str)]) -> Option<Event> {
    let message = match payload_message(payload) {
        Some(message) if message.is_empty() => return None,
        Some(message) => message,
        None => "unknown panic".to_string(),
    };

    let mut event = Event::message(Level::Fatal, message);
    event
        .tags
        .insert("captured_at".to_string(), Utc::now().to_rfc3339());
    apply_direct_tags(&mut event, extra_tags);
    Some(event)
}

impl Hub {
    /// Reports a recovered failure against this context.
    ///
    /// A payload rendering to an empty message is a no-op. Extra tags win
    /// over scope tags on key collision. The failure itself is not
    /// consumed; propagation stays with the caller.
    pub fn recover(&self, payload: &(dyn Any + Send), extra_tags: &[(&str, &str)]) -> Option<EventId> {
        let event = recovered_event(payload, extra_tags)?;
        error!(message = %event.message, "recovered from panic");
        self.capture_event(event)
    }
}

impl Reporter {
    /// Reports a recovered failure against the current ambient context.
    pub fn recover(&self, payload: &(dyn Any + Send), extra_tags: &[(&str, &str)]) -> Option<EventId> {
        let event = recovered_event(payload, extra_tags)?;
        error!(message = %event.message, "recovered from panic");
        self.capture(event)
    }

    /// Runs `f`, reporting any panic before handing it back.
    ///
    /// With `rethrow_after_recover` unset (the default) the panic payload
    /// is returned in `Err` and the caller decides what to do with it.
    /// When set, unwinding resumes after the report.
    pub fn protect<F, T>(&self, f: F) -> Result<T, Box<dyn Any + Send + 'static>>
    where
        F: FnOnce() -> T,
    {
        match panic::catch_unwind(AssertUnwindSafe(f)) {
            Ok(value) => Ok(value),
            Err(payload) => {
                self.recover(payload.as_ref(), &[]);
                if self.config().rethrow_after_recover {
                    panic::resume_unwind(payload);
                }
                Err(payload)
            }
        }
    }
}

/// Installs a process panic hook that reports panics as `Fatal` events.
///
/// Chains with the existing panic hook so default behavior (stderr output)
/// is preserved. The hook snapshots the panicking thread's ambient scope,
/// records the panic location as a tag, and flushes briefly so the event is
/// handed off before the process dies.
pub fn install_panic_hook(reporter: &Reporter) {
    let client = Arc::clone(reporter.client());
    let previous_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        let message = payload_message(panic_info.payload())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "unknown panic".to_string());

        let mut event = Event::message(Level::Fatal, message);
        event
            .tags
            .insert("captured_at".to_string(), Utc::now().to_rfc3339());
        if let Some(location) = panic_info.location() {
            event.tags.insert(
                "panic.location".to_string(),
                format!("{}:{}:{}", location.file(), location.line(), location.column()),
            );
        }

        let scope = Hub::current().scope_snapshot();
        client.capture_event(event, Some(&scope));
        client.flush(HOOK_FLUSH_TIMEOUT);

        previous_hook(panic_info);
    }));
}
