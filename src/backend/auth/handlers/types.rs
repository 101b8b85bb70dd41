/**
 * Authentication Handler Types
 */

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sign up request
#[derive(Deserialize, Serialize, Debug)]
pub struct SignupRequest {
    /// 3-30 chars, starts with a letter, alphanumeric + underscore
    pub username: String,
    pub email: String,
    /// At least 8 characters; hashed before storage
    pub password: String,
}

/// Login request
#[derive(Deserialize, Serialize, Debug)]
pub struct LoginRequest {
    /// Username or e-mail address
    #[serde(alias = "email")]
    pub username: String,
    pub password: String,
}

/// Returned by signup and login
#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// Bearer token (30-day expiration)
    pub token: String,
    pub user_id: Uuid,
    pub username: String,
}

/// Returned by `GET /api/auth/session`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub user_id: Uuid,
    pub username: String,
}
