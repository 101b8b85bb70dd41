//! Backend Error Module
//!
//! Error types returned by HTTP handlers and their conversion to responses.
//!
//! - **`types`** - `BackendError` and its status code mapping
//! - **`conversion`** - `IntoResponse` implementation
//!
//! Handlers return `Result<_, BackendError>`; engine and database
//! errors convert into it with `?`.

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

pub use types::BackendError;
