//! User identity attached to events

use serde::{Deserialize, Serialize};

/// The user associated with a reporting context.
///
/// All fields are optional; an all-`None` user is still valid and simply
/// adds nothing to submitted events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
}

impl User {
    /// Creates a user with just an id.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_id() {
        let user = User::with_id("u-42");
        assert_eq!(user.id.as_deref(), Some("u-42"));
        assert!(user.username.is_none());
    }

    #[test]
    fn test_serializes_only_set_fields() {
        let user = User::with_id("u-42");
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["id"], "u-42");
        assert!(json.get("email").is_none());
    }
}
