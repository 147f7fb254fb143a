//! Reporting contexts (hubs)
//!
//! A [`Hub`] binds a shared [`Client`] handle to one call path's [`Scope`].
//! Hubs are cheap to derive, isolated from one another, and shared within a
//! call path via `Arc`.
//!
//! Explicit hub passing is the primary API. The ambient "current hub" is a
//! convenience implemented as a thread-local stack bound through the RAII
//! [`HubGuard`], never as a single shared global, so two concurrent call
//! paths cannot observe each other's ambient binding. A process-wide
//! default hub is the final fallback; it starts without a client and
//! captures nothing until a reporter installs one.

use std::cell::RefCell;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use faultline_core::domain::{Breadcrumb, Event, EventId, Level, User};
use once_cell::sync::Lazy;

use crate::client::Client;
use crate::scope::Scope;

static DEFAULT_HUB: Lazy<Arc<Hub>> = Lazy::new(|| Arc::new(Hub::disconnected()));

thread_local! {
    static HUB_STACK: RefCell<Vec<Arc<Hub>>> = RefCell::new(Vec::new());
}

/// One call path's reporting context.
pub struct Hub {
    client: RwLock<Option<Arc<Client>>>,
    scope: Mutex<Scope>,
}

impl Hub {
    /// Creates a hub bound to a client, with an empty scope sized to the
    /// client's breadcrumb bound.
    pub fn new(client: Arc<Client>) -> Self {
        let scope = Scope::new(client.config().max_breadcrumbs);
        Self {
            client: RwLock::new(Some(client)),
            scope: Mutex::new(scope),
        }
    }

    /// Creates a hub with no client. All captures on it are no-ops until a
    /// client is bound.
    pub fn disconnected() -> Self {
        Self {
            client: RwLock::new(None),
            scope: Mutex::new(Scope::default()),
        }
    }

    /// Creates a hub from an explicit client and scope.
    pub fn with_scope(client: Option<Arc<Client>>, mut scope: Scope) -> Self {
        if let Some(client) = &client {
            scope.set_max_breadcrumbs(client.config().max_breadcrumbs);
        }
        Self {
            client: RwLock::new(client),
            scope: Mutex::new(scope),
        }
    }

    /// Returns the bound client, if any.
    pub fn client(&self) -> Option<Arc<Client>> {
        self.client
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Binds (or clears) the client on this hub. Binding also resizes the
    /// scope's breadcrumb bound to match the client configuration.
    pub fn bind_client(&self, client: Option<Arc<Client>>) {
        if let Some(client) = &client {
            self.with_scope_mut(|scope| {
                scope.set_max_breadcrumbs(client.config().max_breadcrumbs);
            });
        }
        *self.client.write().unwrap_or_else(PoisonError::into_inner) = client;
    }

    /// Derives a child hub: same client, cloned scope.
    ///
    /// The parent is never mutated, and every call yields an independent
    /// child even if one was derived before.
    pub fn derive(&self) -> Arc<Hub> {
        Arc::new(Self {
            client: RwLock::new(self.client()),
            scope: Mutex::new(self.scope_snapshot()),
        })
    }

    // ========================================================================
    // Ambient (thread-local) binding
    // ========================================================================

    /// Returns the hub bound to the current thread, falling back to the
    /// process default hub.
    pub fn current() -> Arc<Hub> {
        HUB_STACK
            .with(|stack| stack.borrow().last().cloned())
            .unwrap_or_else(|| DEFAULT_HUB.clone())
    }

    /// Returns the process-wide default hub.
    pub fn default_hub() -> Arc<Hub> {
        DEFAULT_HUB.clone()
    }

    /// Binds `hub` as the current hub for this thread until the returned
    /// guard is dropped. Bindings nest LIFO.
    pub fn bind(hub: Arc<Hub>) -> HubGuard {
        HUB_STACK.with(|stack| stack.borrow_mut().push(hub));
        HubGuard {
            _not_send: PhantomData,
        }
    }

    /// Runs `f` with `hub` bound as the current hub.
    pub fn run<F, R>(hub: Arc<Hub>, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let _guard = Hub::bind(hub);
        f()
    }

    // ========================================================================
    // Scope operations
    // ========================================================================

    /// Sets the current user on this hub's scope.
    pub fn set_user(&self, user: User) {
        self.with_scope_mut(|scope| scope.set_user(Some(user)));
    }

    /// Sets one tag on this hub's scope. Last write wins.
    pub fn set_tag(&self, key: impl Into<String>, value: impl Into<String>) {
        let (key, value) = (key.into(), value.into());
        self.with_scope_mut(|scope| scope.set_tag(key, value));
    }

    /// Sets several tags on this hub's scope.
    pub fn set_tags<I, K, V>(&self, tags: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.with_scope_mut(|scope| scope.set_tags(tags));
    }

    /// Appends a breadcrumb to this hub's scope, evicting oldest-first past
    /// the configured bound.
    pub fn add_breadcrumb(&self, breadcrumb: Breadcrumb) {
        self.with_scope_mut(|scope| scope.add_breadcrumb(breadcrumb));
    }

    /// Runs a closure with mutable access to this hub's scope.
    pub fn configure_scope<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Scope) -> R,
    {
        self.with_scope_mut(f)
    }

    /// Returns a clone of this hub's scope as of now.
    pub fn scope_snapshot(&self) -> Scope {
        self.scope
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    // ========================================================================
    // Capture operations
    // ========================================================================

    /// Submits a prepared event enriched with this hub's scope.
    ///
    /// Returns `None` on a disconnected hub or when the client suppresses
    /// the event. The scope lock is released before the transport is
    /// involved.
    pub fn capture_event(&self, event: Event) -> Option<EventId> {
        let client = self.client()?;
        let scope = self.scope_snapshot();
        client.capture_event(event, Some(&scope))
    }

    /// Captures an error with `Error` severity and its source chain.
    pub fn capture_error<E>(&self, err: &E) -> Option<EventId>
    where
        E: std::error::Error + ?Sized,
    {
        self.capture_event(Event::from_error(err))
    }

    /// Captures an error with additional tags. Directly supplied tags win
    /// over scope tags on key collision.
    pub fn capture_error_with_tags<E>(&self, err: &E, tags: &[(&str, &str)]) -> Option<EventId>
    where
        E: std::error::Error + ?Sized,
    {
        let mut event = Event::from_error(err);
        apply_direct_tags(&mut event, tags);
        self.capture_event(event)
    }

    /// Captures an informational message.
    pub fn capture_message(&self, message: impl Into<String>) -> Option<EventId> {
        self.capture_event(Event::message(Level::Info, message))
    }

    /// Captures an informational message with additional tags.
    pub fn capture_message_with_tags(
        &self,
        message: impl Into<String>,
        tags: &[(&str, &str)],
    ) -> Option<EventId> {
        let mut event = Event::message(Level::Info, message);
        apply_direct_tags(&mut event, tags);
        self.capture_event(event)
    }

    /// Flushes the bound client. A disconnected hub has nothing pending and
    /// reports `true`.
    pub fn flush(&self, timeout: Duration) -> bool {
        match self.client() {
            Some(client) => client.flush(timeout),
            None => true,
        }
    }

    fn with_scope_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Scope) -> R,
    {
        let mut scope = self.scope.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut scope)
    }
}

/// RAII guard for a thread-local hub binding. Pops the binding on drop.
///
/// Not `Send`: the binding belongs to the thread that created it.
pub struct HubGuard {
    _not_send: PhantomData<*const ()>,
}

impl Drop for HubGuard {
    fn drop(&mut self) {
        HUB_STACK.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

pub(crate) fn apply_direct_tags(event: &mut Event, tags: &[(&str, &str)]) {
    for (key, value) in tags {
        event.tags.insert((*key).to_string(), (*value).to_string());
    }
}
