//! Middleware Module
//!
//! - **`auth`** - bearer token authentication for protected routes

pub mod auth;

pub use auth::{auth_middleware, AuthUser, AuthenticatedUser};
