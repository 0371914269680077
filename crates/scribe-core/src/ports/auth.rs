//! Ports for issuing bearer tokens and storing passwords.

use uuid::Uuid;

/// What a verified access token says about its holder.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub user_id: Uuid,
    pub username: String,
    /// Expiry as a unix timestamp.
    pub exp: i64,
}

/// Issues and verifies bearer tokens.
pub trait TokenService: Send + Sync {
    fn generate_token(&self, user_id: Uuid, username: &str) -> Result<String, AuthError>;

    /// Decode `token`, rejecting bad signatures, foreign issuers and expired
    /// tokens.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Lifetime of issued tokens, in seconds.
    fn expiration_seconds(&self) -> i64;
}

/// One-way password storage.
pub trait PasswordService: Send + Sync {
    /// Hash `password` into a self-describing (PHC) string.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// `Ok(false)` on mismatch; `Err` only when `hash` cannot be parsed.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing authorization header")]
    MissingAuth,

    #[error("Hashing error: {0}")]
    HashingError(String),
}

impl AuthError {
    /// True when the caller presented nothing usable, as opposed to a
    /// server-side failure.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, AuthError::HashingError(_))
    }
}
