/**
 * Session Handlers
 *
 * `GET /api/auth/session` echoes the identity resolved by the auth
 * middleware. `POST /api/auth/logout` only acknowledges: tokens are
 * stateless and the client discards its copy.
 */

use axum::response::Json;
use serde_json::{json, Value};

use crate::backend::auth::handlers::types::SessionResponse;
use crate::backend::middleware::AuthUser;

/// Current session handler
pub async fn session(AuthUser(user): AuthUser) -> Json<SessionResponse> {
    Json(SessionResponse {
        user_id: user.user_id,
        username: user.username,
    })
}

/// Logout handler
pub async fn logout(AuthUser(user): AuthUser) -> Json<Value> {
    tracing::info!("User logged out: {}", user.user_id);
    Json(json!({ "message": "Logged out" }))
}
