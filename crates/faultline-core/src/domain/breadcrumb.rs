//! Breadcrumb trail entries
//!
//! Breadcrumbs record the steps leading up to a reported event. They live in
//! a bounded per-context ring buffer and are copied onto each event at
//! capture time.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::event::Level;

/// A timestamped trail entry describing one step leading up to an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Breadcrumb {
    pub timestamp: DateTime<Utc>,
    /// Grouping key, e.g. `"http"`, `"db"`, `"auth"`.
    pub category: String,
    pub message: String,
    pub level: Level,
    /// Free-form structured payload.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, serde_json::Value>,
}

impl Breadcrumb {
    /// Creates a new breadcrumb with the given category and message.
    ///
    /// Uses `Info` level and no data payload by default.
    pub fn new(category: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            category: category.into(),
            message: message.into(),
            level: Level::Info,
            data: BTreeMap::new(),
        }
    }

    /// Sets the severity level.
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Attaches one structured data entry.
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breadcrumb_creation() {
        let crumb = Breadcrumb::new("http", "GET /api/items");
        assert_eq!(crumb.category, "http");
        assert_eq!(crumb.message, "GET /api/items");
        assert_eq!(crumb.level, Level::Info);
        assert!(crumb.data.is_empty());
    }

    #[test]
    fn test_breadcrumb_builder_methods() {
        let crumb = Breadcrumb::new("db", "query failed")
            .with_level(Level::Warning)
            .with_data("rows", 0)
            .with_data("table", "accounts");

        assert_eq!(crumb.level, Level::Warning);
        assert_eq!(crumb.data["rows"], 0);
        assert_eq!(crumb.data["table"], "accounts");
    }
}
