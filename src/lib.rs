//! Lecotes - collaborative text annotation backend
//!
//! Users write or share texts, annotate character ranges in them, reply to
//! and vote on annotations, and keep a friend list.
//!
//! # Module Structure
//!
//! - **`shared`** - Plain data types: ranges, annotations, replies, votes,
//!   texts, friend requests
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Annotation engine with overlap merging
//!   - PostgreSQL and in-memory storage
//!   - Axum routes, JWT authentication
//!
//! # Overlap Merging
//!
//! Annotation ranges are half-open `[start, end)` character offsets. A new
//! annotation that overlaps an existing one on the same text is merged into
//! it: the existing range is widened to cover both and the new content is
//! stored as a reply.
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - enables the `backend` module and the server binary
//!
//! # Usage
//!
//! ```rust,no_run
//! use lecotes::backend::server::{create_app, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let app = create_app(ServerConfig::from_env()?).await;
//! // Serve `app` with axum::serve
//! # Ok(())
//! # }
//! ```

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;
