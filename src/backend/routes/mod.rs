//! Route Configuration Module
//!
//! - **`router`** - router assembly, CORS, tracing and static files
//! - **`api_routes`** - public and protected API routes

/// Main router creation
pub mod router;

/// API routes
pub mod api_routes;

pub use router::create_router;
