use std::fmt;

use serde::{Deserialize, Serialize};

/// Creation timestamp stamped on every record unless real clocks are enabled.
pub const PLACEHOLDER_CREATED_AT: &str = "2024-01-15T10:30:00Z";

/// A registered account. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    username: String,
    email: String,
    created_at: String, // RFC3339 UTC
}

impl User {
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self::with_created_at(username, email, PLACEHOLDER_CREATED_AT)
    }

    pub fn with_created_at(
        username: impl Into<String>,
        email: impl Into<String>,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            created_at: created_at.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn created_at(&self) -> &str {
        &self.created_at
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "User: {} ({})", self.username, self.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_placeholder_timestamp() {
        let user = User::new("john_doe", "john@example.com");
        assert_eq!(user.username(), "john_doe");
        assert_eq!(user.email(), "john@example.com");
        assert_eq!(user.created_at(), PLACEHOLDER_CREATED_AT);
    }

    #[test]
    fn test_display() {
        let user = User::new("jane_smith", "jane@example.com");
        assert_eq!(user.to_string(), "User: jane_smith (jane@example.com)");
    }

    #[test]
    fn test_serializes_camel_case() {
        let user = User::new("john_doe", "john@example.com");
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["username"], "john_doe");
        assert_eq!(value["createdAt"], PLACEHOLDER_CREATED_AT);
        assert!(value.get("created_at").is_none());
    }
}
