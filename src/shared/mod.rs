//! Shared Module
//!
//! Types and data structures shared between the server and its clients.
//! Everything here is plain data plus validation; nothing touches the
//! network or the database.
//!
//! # Overview
//!
//! - `annotations` - ranges, annotations, replies, votes
//! - `texts` - text documents and sharing
//! - `friends` - friend requests and friendships
//! - `error` - validation errors

/// Annotation, reply and vote types
pub mod annotations;

/// Text document types
pub mod texts;

/// Friend request types
pub mod friends;

/// Shared error types
pub mod error;

/// Re-export commonly used types for convenience
pub use annotations::{Annotation, Reply, TextAnnotations, TextRange, VoteTarget, VoteValue};
pub use error::SharedError;
pub use texts::Text;
