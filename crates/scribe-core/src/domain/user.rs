use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationErrors;

/// Longest username accepted at registration.
pub const USERNAME_MAX_LEN: usize = 150;

/// User entity - an identity that owns posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID and timestamp.
    pub fn new(username: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            username,
            password_hash,
            created_at: Utc::now(),
        }
    }

    /// Check a candidate username: 1..=150 chars of letters, digits and `@.+-_`.
    pub fn validate_username(username: &str) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if username.trim().is_empty() {
            errors.add("username", "This field may not be blank.");
        } else if username.chars().count() > USERNAME_MAX_LEN {
            errors.add(
                "username",
                format!("Ensure this field has no more than {USERNAME_MAX_LEN} characters."),
            );
        } else if !username
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
        {
            errors.add(
                "username",
                "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
            );
        }

        errors.into_result()
    }
}

/// A user together with the ids of the posts a given requester may see.
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub user: User,
    pub post_ids: Vec<Uuid>,
}
