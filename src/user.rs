//! The cached user record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role assigned by the server. Moderators can administer users and posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    #[serde(rename = "USER")]
    User,
    #[serde(rename = "MODERATOR")]
    Moderator,
}

/// Denormalized snapshot of the authenticated user's profile.
///
/// Written alongside the session token at login/registration time, read at
/// every protected-page mount and deleted whenever token validation fails.
/// It is a best-effort cache: nothing keeps it in sync with the server record
/// between validations, and it carries no TTL of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl CachedUser {
    pub fn is_moderator(&self) -> bool {
        self.role == UserRole::Moderator
    }
}

#[cfg(any(test, feature = "mocks"))]
impl CachedUser {
    pub fn mock() -> Self {
        CachedUser {
            id: 1,
            username: "testuser".to_owned(),
            email: "test@example.com".to_owned(),
            role: UserRole::User,
            created_at: Utc::now(),
        }
    }

    pub fn mock_from_username(username: &str) -> Self {
        CachedUser {
            id: 1,
            username: username.to_owned(),
            email: format!("{username}@example.com"),
            role: UserRole::User,
            created_at: Utc::now(),
        }
    }

    pub fn mock_moderator() -> Self {
        CachedUser {
            id: 2,
            username: "mod".to_owned(),
            email: "mod@example.com".to_owned(),
            role: UserRole::Moderator,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape_is_camel_case() {
        let user = CachedUser::mock();
        let json = serde_json::to_string(&user).unwrap();

        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"role\":\"USER\""));
        assert!(!json.contains("created_at"));
    }

    #[test]
    fn test_deserialize_login_response_user() {
        // the shape the login/registration endpoints return
        let json = r#"{
            "id": 42,
            "username": "octocat",
            "email": "octo@example.com",
            "role": "MODERATOR",
            "createdAt": "2024-03-01T12:00:00Z"
        }"#;

        let user: CachedUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, 42);
        assert_eq!(user.username, "octocat");
        assert_eq!(user.role, UserRole::Moderator);
        assert!(user.is_moderator());
    }

    #[test]
    fn test_roundtrip() {
        let user = CachedUser::mock_moderator();
        let json = serde_json::to_string(&user).unwrap();
        let restored: CachedUser = serde_json::from_str(&json).unwrap();
        assert_eq!(user, restored);
    }
}
