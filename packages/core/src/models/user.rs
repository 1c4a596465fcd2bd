//! User and account shapes
//!
//! A `User` is the authenticated identity; a `UserProfile` is the document
//! kept in the `users` collection. Nodes point at users by id only, so none
//! of these types carry relational data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the session cookie whose presence gates protected routes.
///
/// Only the name is shared here; reading and writing the cookie belongs to
/// whatever front end sits on top.
pub const SESSION_COOKIE_NAME: &str = "auth-session";

/// An authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl User {
    /// Placeholder returned when a profile cannot be read.
    pub fn fallback(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: "User".to_string(),
            email: "user@example.com".to_string(),
            display_name: None,
        }
    }
}

/// Document stored under `users/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub is_recruiter: bool,
    pub created_at: DateTime<Utc>,
}

/// Signup form. The password only lives as long as this value.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Login form.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for SignUpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignUpRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_document_shape() {
        let profile = UserProfile {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            is_recruiter: true,
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(value["isRecruiter"], true);
        assert!(value.get("createdAt").is_some());
    }

    #[test]
    fn test_debug_redacts_password() {
        let request = SignUpRequest {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "hunter2".to_string(),
        };
        let rendered = format!("{:?}", request);
        assert!(!rendered.contains("hunter2"));
    }
}
