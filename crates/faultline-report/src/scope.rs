//! Per-context scope state
//!
//! A [`Scope`] is the mutable bag of contextual metadata carried by one
//! reporting context: the current user, key/value tags, and a bounded
//! breadcrumb ring buffer. Scopes are cloned when a context is derived and
//! copied onto events at capture time; the capture path never holds a scope
//! lock while talking to the transport.

use std::collections::{BTreeMap, VecDeque};

use faultline_core::domain::{Breadcrumb, Event, User};

/// Default breadcrumb bound used by scopes not tied to a client.
const DEFAULT_MAX_BREADCRUMBS: usize = 100;

/// Contextual metadata for one reporting context.
#[derive(Debug, Clone)]
pub struct Scope {
    user: Option<User>,
    tags: BTreeMap<String, String>,
    breadcrumbs: VecDeque<Breadcrumb>,
    max_breadcrumbs: usize,
}

impl Default for Scope {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BREADCRUMBS)
    }
}

impl Scope {
    /// Creates an empty scope with the given breadcrumb bound.
    pub fn new(max_breadcrumbs: usize) -> Self {
        Self {
            user: None,
            tags: BTreeMap::new(),
            breadcrumbs: VecDeque::new(),
            max_breadcrumbs,
        }
    }

    /// Sets the current user. `None` clears it.
    pub fn set_user(&mut self, user: Option<User>) {
        self.user = user;
    }

    /// Returns the current user, if any.
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Sets one tag. Last write wins for the same key.
    pub fn set_tag(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.tags.insert(key.into(), value.into());
    }

    /// Sets several tags at once. Last write wins per key.
    pub fn set_tags<I, K, V>(&mut self, tags: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in tags {
            self.tags.insert(key.into(), value.into());
        }
    }

    /// Returns the current tags.
    pub fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }

    /// Appends a breadcrumb, evicting the oldest entry once the bound is
    /// exceeded.
    pub fn add_breadcrumb(&mut self, breadcrumb: Breadcrumb) {
        if self.max_breadcrumbs == 0 {
            return;
        }
        self.breadcrumbs.push_back(breadcrumb);
        while self.breadcrumbs.len() > self.max_breadcrumbs {
            self.breadcrumbs.pop_front();
        }
    }

    /// Returns the retained breadcrumbs, oldest first.
    pub fn breadcrumbs(&self) -> impl Iterator<Item = &Breadcrumb> {
        self.breadcrumbs.iter()
    }

    /// Changes the breadcrumb bound, evicting oldest entries if the current
    /// trail exceeds the new bound.
    pub fn set_max_breadcrumbs(&mut self, max: usize) {
        self.max_breadcrumbs = max;
        while self.breadcrumbs.len() > max {
            self.breadcrumbs.pop_front();
        }
    }

    /// Copies this scope's state onto an event.
    ///
    /// Tags already present on the event win over scope tags, so directly
    /// supplied tags take precedence on key collision. The scope user is
    /// only used when the event carries none of its own.
    pub fn apply_to_event(&self, event: &mut Event) {
        if event.user.is_none() {
            event.user = self.user.clone();
        }
        for (key, value) in &self.tags {
            event.tags.entry(key.clone()).or_insert_with(|| value.clone());
        }
        event.breadcrumbs.extend(self.breadcrumbs.iter().cloned());
    }
}

#[cfg(test)]
mod tests {
    use faultline_core::domain::{Event, Level};

    use super::*;

    #[test]
    fn breadcrumbs_evict_oldest_first() {
        let mut scope = Scope::new(2);
        scope.add_breadcrumb(Breadcrumb::new("t", "A"));
        scope.add_breadcrumb(Breadcrumb::new("t", "B"));
        scope.add_breadcrumb(Breadcrumb::new("t", "C"));

        let messages: Vec<&str> = scope.breadcrumbs().map(|b| b.message.as_str()).collect();
        assert_eq!(messages, vec!["B", "C"]);
    }

    #[test]
    fn zero_bound_retains_nothing() {
        let mut scope = Scope::new(0);
        scope.add_breadcrumb(Breadcrumb::new("t", "A"));
        assert_eq!(scope.breadcrumbs().count(), 0);
    }

    #[test]
    fn tags_last_write_wins() {
        let mut scope = Scope::default();
        scope.set_tag("region", "eu-west");
        scope.set_tag("region", "us-east");
        assert_eq!(scope.tags()["region"], "us-east");
    }

    #[test]
    fn set_tags_merges() {
        let mut scope = Scope::default();
        scope.set_tag("a", "1");
        scope.set_tags([("b", "2"), ("a", "3")]);
        assert_eq!(scope.tags()["a"], "3");
        assert_eq!(scope.tags()["b"], "2");
    }

    #[test]
    fn apply_prefers_event_tags() {
        let mut scope = Scope::default();
        scope.set_tag("k", "scope");
        scope.set_tag("only_scope", "yes");

        let mut event = Event::message(Level::Info, "m");
        event.tags.insert("k".to_string(), "direct".to_string());
        scope.apply_to_event(&mut event);

        assert_eq!(event.tags["k"], "direct");
        assert_eq!(event.tags["only_scope"], "yes");
    }

    #[test]
    fn apply_copies_user_and_breadcrumbs() {
        let mut scope = Scope::default();
        scope.set_user(Some(User::with_id("u-1")));
        scope.add_breadcrumb(Breadcrumb::new("auth", "login"));

        let mut event = Event::message(Level::Info, "m");
        scope.apply_to_event(&mut event);

        assert_eq!(event.user.unwrap().id.as_deref(), Some("u-1"));
        assert_eq!(event.breadcrumbs.len(), 1);
        assert_eq!(event.breadcrumbs[0].message, "login");
    }

    #[test]
    fn shrinking_bound_trims_existing_trail() {
        let mut scope = Scope::new(5);
        for name in ["A", "B", "C", "D"] {
            scope.add_breadcrumb(Breadcrumb::new("t", name));
        }
        scope.set_max_breadcrumbs(2);
        let messages: Vec<&str> = scope.breadcrumbs().map(|b| b.message.as_str()).collect();
        assert_eq!(messages, vec!["C", "D"]);
    }
}
