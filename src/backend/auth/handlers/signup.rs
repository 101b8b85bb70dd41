/**
 * Signup Handler
 *
 * `POST /api/auth/signup`
 *
 * 1. Validate username, email and password
 * 2. Reject taken usernames and e-mails
 * 3. Hash the password with bcrypt and create the user
 * 4. Return a token for immediate authentication
 */

use axum::{extract::State, http::StatusCode, response::Json};
use bcrypt::{hash, DEFAULT_COST};

use crate::backend::auth::handlers::types::{AuthResponse, SignupRequest};
use crate::backend::auth::sessions::create_token;
use crate::backend::auth::users::{create_user, get_user_by_email, get_user_by_username};
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// Validate username format
///
/// 3-30 characters, a leading letter, then letters, digits or underscores.
pub(crate) fn is_valid_username(username: &str) -> bool {
    if username.len() < 3 || username.len() > 30 {
        return false;
    }

    let mut chars = username.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }

    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Sign up handler
///
/// # Errors
///
/// * `400 Bad Request` - invalid username, e-mail or password
/// * `409 Conflict` - username or e-mail already registered
/// * `503 Service Unavailable` - no database configured
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), BackendError> {
    let pool = state.require_db()?;
    tracing::info!("Signup request for username: {}", request.username);

    if !is_valid_username(&request.username) {
        return Err(BackendError::bad_request(
            "Username must be 3-30 chars, start with a letter, and contain only letters, numbers, and underscores",
        ));
    }
    if !request.email.contains('@') {
        return Err(BackendError::bad_request("Invalid email format"));
    }
    if request.password.len() < 8 {
        return Err(BackendError::bad_request(
            "Password must be at least 8 characters",
        ));
    }

    if get_user_by_username(pool, &request.username).await?.is_some() {
        return Err(BackendError::handler(
            StatusCode::CONFLICT,
            "Username already taken",
        ));
    }
    if get_user_by_email(pool, &request.email).await?.is_some() {
        return Err(BackendError::handler(
            StatusCode::CONFLICT,
            "Email already registered",
        ));
    }

    let password_hash = hash(&request.password, DEFAULT_COST).map_err(|e| {
        tracing::error!("Failed to hash password: {:?}", e);
        BackendError::handler(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create user")
    })?;

    let user = create_user(pool, &request.username, &request.email, &password_hash).await?;

    let token = create_token(user.id, &user.username).map_err(|e| {
        tracing::error!("Failed to create token: {:?}", e);
        BackendError::handler(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create session")
    })?;

    tracing::info!("User created: {}", user.id);
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user_id: user.id,
            username: user.username,
        }),
    ))
}
