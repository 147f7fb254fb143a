//! Reportable event records
//!
//! An [`Event`] is a point-in-time record of an exception, a message, or a
//! recovered failure, together with the contextual state (user, tags,
//! breadcrumbs) in effect at capture time. Events are never mutated after
//! creation and are submitted to a transport exactly once.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::breadcrumb::Breadcrumb;
use crate::domain::user::User;

/// Opaque identifier assigned to an event at capture time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    /// Generates a fresh identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Severity level for events and breadcrumbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    /// Diagnostic detail, normally only useful with `debug` enabled.
    Debug,
    /// Informational message (the default for captured messages).
    Info,
    /// Something unexpected that did not interrupt the operation.
    Warning,
    /// A handled error (the default for captured exceptions).
    Error,
    /// An unrecoverable failure, e.g. a reported panic.
    Fatal,
}

impl Default for Level {
    fn default() -> Self {
        Level::Info
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warning => "warning",
            Level::Error => "error",
            Level::Fatal => "fatal",
        };
        write!(f, "{}", s)
    }
}

/// Structured description of a captured error value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exception {
    /// Type name of the error value as seen at the capture site.
    pub kind: String,
    /// Rendered error message.
    pub value: String,
    /// Rendered messages of the error's source chain, outermost first.
    pub chain: Vec<String>,
}

/// A single reportable occurrence.
///
/// Built by the capture path, enriched with scope state, then handed to the
/// transport. The `environment` and `release` fields are stamped from the
/// client configuration at capture time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub timestamp: DateTime<Utc>,
    pub level: Level,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception: Option<Exception>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backtrace: Option<String>,
    pub environment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub breadcrumbs: Vec<Breadcrumb>,
}

impl Event {
    /// Creates a bare message event at the given level.
    ///
    /// Contextual fields (user, tags, breadcrumbs, environment, release)
    /// are filled in by the capture path.
    pub fn message(level: Level, message: impl Into<String>) -> Self {
        Self {
            id: EventId::new(),
            timestamp: Utc::now(),
            level,
            message: message.into(),
            exception: None,
            backtrace: None,
            environment: String::new(),
            release: None,
            user: None,
            tags: BTreeMap::new(),
            breadcrumbs: Vec::new(),
        }
    }

    /// Creates an error event from any `std::error::Error` value.
    ///
    /// Records the rendered message, the concrete type name, and the source
    /// chain (outermost cause first).
    pub fn from_error<E>(err: &E) -> Self
    where
        E: std::error::Error + ?Sized,
    {
        let mut chain = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            chain.push(cause.to_string());
            source = cause.source();
        }

        let mut event = Self::message(Level::Error, err.to_string());
        event.exception = Some(Exception {
            kind: std::any::type_name::<E>().to_string(),
            value: err.to_string(),
            chain,
        });
        event
    }
}
