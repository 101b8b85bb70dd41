//! Backend Module
//!
//! All server-side code: the Axum HTTP server, the annotation engine and
//! its storage, texts, friends and authentication.
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── annotations/    - Annotation engine, storage port and adapters
//! ├── texts/          - Text documents and sharing
//! ├── friends/        - Friend requests and friendships
//! ├── auth/           - Signup, login, JWT sessions
//! ├── middleware/     - Bearer token authentication
//! ├── server/         - Configuration, state, initialization
//! ├── routes/         - Route configuration
//! └── error/          - Error types
//! ```
//!
//! # Error Handling
//!
//! Handlers return `Result<_, BackendError>`. Engine and database
//! errors convert into it with `?` and render as `{ "error", "status" }`.

/// Annotation engine and storage
pub mod annotations;

/// Text documents
pub mod texts;

/// Friend system
pub mod friends;

/// Authentication and user management
pub mod auth;

/// Middleware for request processing
pub mod middleware;

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Backend error types
pub mod error;

pub use annotations::{AnnotationEngine, EngineError};
pub use error::BackendError;
pub use server::{create_app, AppState, ServerConfig};
