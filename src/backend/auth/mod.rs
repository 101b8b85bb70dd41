//! Authentication Module
//!
//! User registration, login and JWT session tokens.
//!
//! - **`users`** - User data model and database operations
//! - **`sessions`** - JWT token generation and validation
//! - **`handlers`** - HTTP handlers for authentication endpoints
//!
//! # Authentication Flow
//!
//! 1. **Signup**: username, e-mail and password → user created → token returned
//! 2. **Login**: username or e-mail and password → verified → token returned
//! 3. **Session**: bearer token → middleware resolves the user → identity returned
//!
//! Passwords are hashed with bcrypt. Tokens expire after 30 days.

/// User data model and database operations
pub mod users;

/// JWT token generation and validation
pub mod sessions;

/// HTTP handlers for authentication endpoints
pub mod handlers;

pub use handlers::{login, logout, session, signup};
pub use handlers::{AuthResponse, LoginRequest, SessionResponse, SignupRequest};
