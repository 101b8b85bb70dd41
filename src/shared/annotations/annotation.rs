//! Annotation and Reply Data Structures
//!
//! Rows as stored, plus the joined views returned by listing endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::range::TextRange;

/// An annotation over a range of a text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
pub struct Annotation {
    /// Unique annotation ID
    pub id: Uuid,
    /// Text this annotation belongs to
    pub text_id: Uuid,
    /// Author of the annotation
    pub user_id: Uuid,
    /// Annotation body
    pub content: String,
    /// Inclusive start offset
    pub range_start: i32,
    /// Exclusive end offset
    pub range_end: i32,
    /// Sum of all votes cast on this annotation
    pub votes: i32,
    pub created_at: DateTime<Utc>,
    /// Bumped whenever the range is widened by a merge
    pub updated_at: DateTime<Utc>,
}

impl Annotation {
    /// The stored range
    pub fn range(&self) -> TextRange {
        TextRange::from_stored(self.range_start, self.range_end)
    }
}

/// A reply attached to an annotation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
pub struct Reply {
    /// Unique reply ID
    pub id: Uuid,
    /// Parent annotation
    pub annotation_id: Uuid,
    /// Author of the reply
    pub user_id: Uuid,
    pub content: String,
    pub votes: i32,
    pub created_at: DateTime<Utc>,
}

/// Annotation joined with its author's username
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
pub struct AnnotationView {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub annotation: Annotation,
    pub username: String,
}

/// Reply joined with its author's username
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
pub struct ReplyView {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub reply: Reply,
    pub username: String,
}

/// Annotations of a text and all replies to them
///
/// The two collections are parallel; callers correlate replies to their
/// annotation through `annotation_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TextAnnotations {
    pub annotations: Vec<AnnotationView>,
    pub replies: Vec<ReplyView>,
}

impl TextAnnotations {
    /// Replies belonging to one annotation, in listing order
    pub fn replies_for(&self, annotation_id: Uuid) -> impl Iterator<Item = &ReplyView> {
        self.replies
            .iter()
            .filter(move |view| view.reply.annotation_id == annotation_id)
    }
}

/// Request body for `POST /api/annotations/create`
///
/// Fields are optional so that a missing value surfaces as a validation
/// error rather than a deserialization rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAnnotationRequest {
    pub text_id: Option<Uuid>,
    pub content: Option<String>,
    pub range_start: Option<i32>,
    pub range_end: Option<i32>,
}

/// Request body for `POST /api/annotations/reply`
///
/// Optional fields, as in `CreateAnnotationRequest`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReplyRequest {
    pub annotation_id: Option<Uuid>,
    pub content: Option<String>,
}

/// Response returned when a submission was merged into an existing annotation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MergedAnnotationResponse {
    pub message: String,
    pub annotation: Annotation,
    pub reply: Reply,
}
