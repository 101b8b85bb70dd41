/**
 * Login Handler
 *
 * `POST /api/auth/login`
 *
 * Unknown users and wrong passwords both answer 401 with the same message.
 */

use axum::{extract::State, http::StatusCode, response::Json};
use bcrypt::verify;

use crate::backend::auth::handlers::types::{AuthResponse, LoginRequest};
use crate::backend::auth::sessions::create_token;
use crate::backend::auth::users::find_by_login;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Login handler
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, BackendError> {
    let pool = state.require_db()?;

    let Some(user) = find_by_login(pool, &request.username).await? else {
        tracing::warn!("Login attempt for unknown user: {}", request.username);
        return Err(BackendError::unauthorized(INVALID_CREDENTIALS));
    };

    let valid = verify(&request.password, &user.password_hash).map_err(|e| {
        tracing::error!("Failed to verify password: {:?}", e);
        BackendError::handler(StatusCode::INTERNAL_SERVER_ERROR, "Failed to verify credentials")
    })?;
    if !valid {
        tracing::warn!("Invalid password for user: {}", user.id);
        return Err(BackendError::unauthorized(INVALID_CREDENTIALS));
    }

    let token = create_token(user.id, &user.username).map_err(|e| {
        tracing::error!("Failed to create token: {:?}", e);
        BackendError::handler(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create session")
    })?;

    tracing::info!("User logged in: {}", user.id);
    Ok(Json(AuthResponse {
        token,
        user_id: user.id,
        username: user.username,
    }))
}
