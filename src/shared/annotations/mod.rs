//! Annotations Module
//!
//! Data structures for the annotation system:
//!
//! - `TextRange` - half-open character range with overlap and union
//! - `Annotation` / `Reply` - stored rows
//! - `AnnotationView` / `ReplyView` - rows joined with author usernames
//! - `Vote`, `VoteValue`, `VoteTarget` - one vote per user and target

pub mod annotation;
pub mod range;
pub mod vote;

pub use annotation::{
    Annotation, AnnotationView, CreateAnnotationRequest, CreateReplyRequest,
    MergedAnnotationResponse, Reply, ReplyView, TextAnnotations,
};
pub use range::TextRange;
pub use vote::{Vote, VoteRequest, VoteTarget, VoteValue};
