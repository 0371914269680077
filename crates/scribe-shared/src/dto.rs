//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub username: String,
    pub password: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response containing authentication tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// The authenticated caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    pub id: Uuid,
    pub username: String,
}

/// Body for creating or updating a post.
///
/// Every field is optional so that missing fields surface as validation
/// errors. Read-only fields such as `author` and `slug` are not part of the
/// body and are ignored if a client sends them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub is_published: Option<bool>,
}

/// A post as presented to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub url: String,
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    /// Author's username.
    pub author: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

/// A user and links to the posts the caller may see.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub url: String,
    pub id: Uuid,
    pub username: String,
    pub posts: Vec<String>,
}

/// Entry points of the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiRootResponse {
    pub users: String,
    pub posts: String,
}
