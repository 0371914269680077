//! Account handlers: registration, login and the current identity.

use actix_web::{HttpResponse, web};

use scribe_core::domain::User;
use scribe_core::ports::AuthError;
use scribe_shared::dto::{AuthResponse, LoginRequest, MeResponse, RegisterUserRequest};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const PASSWORD_MIN_LEN: usize = 8;

fn token_response(state: &AppState, user: &User) -> AppResult<AuthResponse> {
    let token = state.tokens.generate_token(user.id, &user.username)?;

    Ok(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: state.tokens.expiration_seconds().max(0) as u64,
    })
}

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let mut errors = User::validate_username(&req.username).err().unwrap_or_default();
    if req.password.chars().count() < PASSWORD_MIN_LEN {
        errors.add(
            "password",
            format!("Ensure this field has at least {PASSWORD_MIN_LEN} characters."),
        );
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors.into_fields()));
    }

    if state.user_repo.find_by_username(&req.username).await?.is_some() {
        return Err(AppError::Conflict("Username already taken".to_string()));
    }

    let password_hash = state.passwords.hash(&req.password)?;
    // a concurrent registration can still win the race; the unique
    // constraint surfaces it as a conflict
    let user = state
        .user_repo
        .insert(User::new(req.username, password_hash))
        .await?;

    tracing::info!(user_id = %user.id, username = %user.username, "User registered");

    Ok(HttpResponse::Created().json(token_response(&state, &user)?))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .user_repo
        .find_by_username(&req.username)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    if !state.passwords.verify(&req.password, &user.password_hash)? {
        tracing::debug!(username = %req.username, "Login rejected");
        return Err(AppError::Unauthorized);
    }

    Ok(HttpResponse::Ok().json(token_response(&state, &user)?))
}

/// GET /api/auth/me - Protected route
pub async fn me(identity: Identity) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(MeResponse {
        id: identity.user_id,
        username: identity.username,
    }))
}
