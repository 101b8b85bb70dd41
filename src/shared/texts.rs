//! Text Data Structures
//!
//! Texts are the documents users annotate. A text has a single owner and may
//! be shared read-only with other users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::annotations::{AnnotationView, ReplyView};

/// A text document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
pub struct Text {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Text {
    /// Length of the content in characters, the unit annotation ranges use
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }
}

/// A user a text is shared with
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
pub struct SharedUser {
    pub username: String,
    pub email: String,
}

/// Request body for `POST /api/texts/create`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTextRequest {
    pub title: String,
    pub content: String,
    /// E-mail addresses to share the text with; unknown addresses are skipped
    #[serde(default)]
    pub shared_with: Vec<String>,
}

/// Response after creating a text
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTextResponse {
    pub id: Uuid,
    pub shared_with: Vec<SharedUser>,
}

/// Texts visible to the current user
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TextListResponse {
    pub owned: Vec<Text>,
    pub shared: Vec<Text>,
}

/// A text with everything needed to render it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextDetailResponse {
    pub text: Text,
    pub annotations: Vec<AnnotationView>,
    pub replies: Vec<ReplyView>,
    pub shared_with: Vec<SharedUser>,
}
