/**
 * Annotation Storage Port
 *
 * The engine talks to persistence through these two traits. `AnnotationStore`
 * covers pool-level reads; every multi-step mutation runs inside a `StoreTx`
 * obtained from `AnnotationStore::begin`.
 *
 * # Units of Work
 *
 * A `StoreTx` is a storage transaction. Its writes become visible only after
 * `commit`; dropping it without committing rolls everything back. Adapters
 * must make `lock_text` serialize concurrent units of work on the same text.
 */

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::shared::annotations::{
    Annotation, AnnotationView, Reply, ReplyView, TextRange, Vote, VoteTarget, VoteValue,
};
use crate::shared::texts::Text;

/// Errors raised by storage adapters
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write
    #[error("unique constraint violated: {constraint}")]
    UniqueViolation {
        /// Name of the violated constraint, if the backend reports it
        constraint: String,
    },

    /// The transaction lost a serialization race or deadlocked
    #[error("transaction could not be serialized: {message}")]
    SerializationFailure { message: String },

    /// Any other storage failure
    #[error("storage query failed: {message}")]
    Query { message: String },
}

impl StoreError {
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return Self::UniqueViolation {
                    constraint: db_err.constraint().unwrap_or("unknown").to_string(),
                };
            }
            // 40001 serialization_failure, 40P01 deadlock_detected
            if matches!(db_err.code().as_deref(), Some("40001") | Some("40P01")) {
                return Self::SerializationFailure {
                    message: db_err.message().to_string(),
                };
            }
        }
        Self::query(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Ordering for annotation listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationOrder {
    /// `range_start` ascending, then `created_at`, then id
    ByRange,
    /// `votes` descending, then `created_at` ascending, then id
    ByVotes,
}

/// Values for a new annotation row
#[derive(Debug, Clone)]
pub struct NewAnnotation {
    pub text_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub range: TextRange,
}

/// Values for a new reply row
#[derive(Debug, Clone)]
pub struct NewReply {
    pub annotation_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
}

/// Pool-level access to annotation storage
#[async_trait]
pub trait AnnotationStore: Send + Sync {
    /// Open a unit of work
    async fn begin(&self) -> StoreResult<Box<dyn StoreTx>>;

    async fn find_text(&self, text_id: Uuid) -> StoreResult<Option<Text>>;

    async fn find_annotation(&self, annotation_id: Uuid) -> StoreResult<Option<Annotation>>;

    async fn find_reply(&self, reply_id: Uuid) -> StoreResult<Option<Reply>>;

    /// Annotations on a text joined with their authors' usernames
    async fn list_annotations(
        &self,
        text_id: Uuid,
        order: AnnotationOrder,
    ) -> StoreResult<Vec<AnnotationView>>;

    /// Replies to annotations on a text, oldest first, joined with usernames
    async fn list_replies(&self, text_id: Uuid) -> StoreResult<Vec<ReplyView>>;
}

/// A storage transaction
#[async_trait]
pub trait StoreTx: Send {
    /// Fetch a text and hold its lock until the transaction ends
    async fn lock_text(&mut self, text_id: Uuid) -> StoreResult<Option<Text>>;

    async fn find_text(&mut self, text_id: Uuid) -> StoreResult<Option<Text>>;

    /// Annotations on `text_id` overlapping `range`, ordered by `range_start`
    /// then `created_at`
    async fn find_overlapping(
        &mut self,
        text_id: Uuid,
        range: TextRange,
    ) -> StoreResult<Vec<Annotation>>;

    async fn insert_annotation(&mut self, annotation: NewAnnotation) -> StoreResult<Annotation>;

    /// Replace an annotation's range and bump `updated_at`
    async fn update_annotation_range(
        &mut self,
        annotation_id: Uuid,
        range: TextRange,
    ) -> StoreResult<Annotation>;

    async fn find_annotation(&mut self, annotation_id: Uuid) -> StoreResult<Option<Annotation>>;

    async fn find_reply(&mut self, reply_id: Uuid) -> StoreResult<Option<Reply>>;

    async fn insert_reply(&mut self, reply: NewReply) -> StoreResult<Reply>;

    async fn find_vote(&mut self, target: VoteTarget, user_id: Uuid) -> StoreResult<Option<Vote>>;

    /// Insert a vote row; a second vote by the same user on the same target
    /// fails with `StoreError::UniqueViolation`
    async fn insert_vote(
        &mut self,
        target: VoteTarget,
        user_id: Uuid,
        value: VoteValue,
    ) -> StoreResult<Vote>;

    /// Add `delta` to the target's vote counter, returning the new total
    async fn increment_votes(&mut self, target: VoteTarget, delta: i32) -> StoreResult<i32>;

    /// Delete every reply (and their votes) of an annotation
    async fn delete_replies_for_annotation(&mut self, annotation_id: Uuid) -> StoreResult<u64>;

    /// Delete an annotation and its votes
    async fn delete_annotation(&mut self, annotation_id: Uuid) -> StoreResult<bool>;

    /// Delete a reply and its votes
    async fn delete_reply(&mut self, reply_id: Uuid) -> StoreResult<bool>;

    async fn commit(self: Box<Self>) -> StoreResult<()>;
}
