/**
 * Annotation Engine
 *
 * Owns the annotation lifecycle: creation with overlap detection and merge,
 * replies, votes and cascading deletes.
 *
 * # Merge Policy
 *
 * A submission whose range overlaps an existing annotation on the same text
 * is absorbed by the first overlapping annotation (lowest `range_start`, then
 * oldest): its range is widened to the union of both ranges and the
 * submitted content is stored as a reply. Otherwise a new annotation is
 * created with the exact submitted range.
 *
 * # Transactions
 *
 * Each mutation runs inside a single `StoreTx`. `create` locks the text row
 * first, so concurrent submissions on the same text are serialized and
 * cannot both observe "no overlap". Replies and deletes take the same lock,
 * so a merge never races the removal of its target. An early return drops
 * the transaction, which rolls it back.
 */

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::backend::annotations::error::{EngineError, EngineResult};
use crate::backend::annotations::store::{
    AnnotationOrder, AnnotationStore, NewAnnotation, NewReply, StoreError, StoreTx,
};
use crate::shared::annotations::{
    Annotation, CreateAnnotationRequest, CreateReplyRequest, Reply, TextAnnotations, TextRange,
    VoteTarget, VoteValue,
};
use crate::shared::texts::Text;

/// Result of `AnnotationEngine::create`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// No overlap: a new annotation was stored
    Created(Annotation),
    /// Overlap: an existing annotation was widened and received a reply
    Merged { annotation: Annotation, reply: Reply },
}

impl CreateOutcome {
    /// The annotation that now covers the submitted range
    pub fn annotation(&self) -> &Annotation {
        match self {
            CreateOutcome::Created(annotation) => annotation,
            CreateOutcome::Merged { annotation, .. } => annotation,
        }
    }

    pub fn is_merged(&self) -> bool {
        matches!(self, CreateOutcome::Merged { .. })
    }
}

/// A successfully recorded vote
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct VoteReceipt {
    pub target_id: Uuid,
    pub value: VoteValue,
    /// Counter value after applying this vote
    pub votes: i32,
}

/// Annotation lifecycle operations over an `AnnotationStore`
#[derive(Clone)]
pub struct AnnotationEngine {
    store: Arc<dyn AnnotationStore>,
}

impl AnnotationEngine {
    pub fn new(store: Arc<dyn AnnotationStore>) -> Self {
        Self { store }
    }

    /// The underlying store, for read-only listings outside the engine
    pub fn store(&self) -> &Arc<dyn AnnotationStore> {
        &self.store
    }

    /// `create` from a request body, rejecting missing fields
    pub async fn submit(
        &self,
        user_id: Uuid,
        request: CreateAnnotationRequest,
    ) -> EngineResult<CreateOutcome> {
        let text_id = require_field(request.text_id, "textId")?;
        let content = require_content(request.content.as_deref())?;
        let range_start = require_field(request.range_start, "rangeStart")?;
        let range_end = require_field(request.range_end, "rangeEnd")?;

        self.create(text_id, user_id, &content, range_start, range_end)
            .await
    }

    /// Create an annotation or merge it into an overlapping one
    pub async fn create(
        &self,
        text_id: Uuid,
        user_id: Uuid,
        content: &str,
        range_start: i32,
        range_end: i32,
    ) -> EngineResult<CreateOutcome> {
        let content = require_content(Some(content))?;
        let range = TextRange::new(range_start, range_end)?;

        let mut tx = self.store.begin().await?;

        let text = tx
            .lock_text(text_id)
            .await?
            .ok_or(EngineError::not_found("text"))?;

        if !range.fits_within(text.char_len()) {
            return Err(EngineError::validation(
                "rangeEnd",
                format!(
                    "Range end {} exceeds text length {}",
                    range.end(),
                    text.char_len()
                ),
            ));
        }

        let overlapping = tx.find_overlapping(text_id, range).await?;
        if overlapping.len() > 1 {
            tracing::warn!(
                "Range {} on text {} overlaps {} annotations; merging into the first",
                range,
                text_id,
                overlapping.len()
            );
        }

        let outcome = match overlapping.first() {
            Some(target) => {
                let merged_range = range.union(&target.range());
                let annotation = tx.update_annotation_range(target.id, merged_range).await?;
                let reply = tx
                    .insert_reply(NewReply {
                        annotation_id: target.id,
                        user_id,
                        content,
                    })
                    .await?;
                tracing::info!(
                    "Merged submission into annotation {}: {} -> {}",
                    target.id,
                    target.range(),
                    merged_range
                );
                CreateOutcome::Merged { annotation, reply }
            }
            None => {
                let annotation = tx
                    .insert_annotation(NewAnnotation {
                        text_id,
                        user_id,
                        content,
                        range,
                    })
                    .await?;
                tracing::info!("Created annotation {} on text {} at {}", annotation.id, text_id, range);
                CreateOutcome::Created(annotation)
            }
        };

        tx.commit().await?;
        Ok(outcome)
    }

    /// Annotations of a text ordered by range, and their replies oldest first
    pub async fn list_for_text(&self, text_id: Uuid) -> EngineResult<TextAnnotations> {
        self.store
            .find_text(text_id)
            .await?
            .ok_or(EngineError::not_found("text"))?;

        let annotations = self
            .store
            .list_annotations(text_id, AnnotationOrder::ByRange)
            .await?;
        let replies = self.store.list_replies(text_id).await?;

        Ok(TextAnnotations {
            annotations,
            replies,
        })
    }

    /// Vote on an annotation
    pub async fn vote(
        &self,
        annotation_id: Uuid,
        user_id: Uuid,
        vote_value: i32,
    ) -> EngineResult<VoteReceipt> {
        self.cast_vote(VoteTarget::Annotation(annotation_id), user_id, vote_value)
            .await
    }

    /// Vote on a reply
    pub async fn reply_vote(
        &self,
        reply_id: Uuid,
        user_id: Uuid,
        vote_value: i32,
    ) -> EngineResult<VoteReceipt> {
        self.cast_vote(VoteTarget::Reply(reply_id), user_id, vote_value)
            .await
    }

    async fn cast_vote(
        &self,
        target: VoteTarget,
        user_id: Uuid,
        vote_value: i32,
    ) -> EngineResult<VoteReceipt> {
        let value = VoteValue::try_from(vote_value)?;

        let mut tx = self.store.begin().await?;

        let exists = match target {
            VoteTarget::Annotation(id) => tx.find_annotation(id).await?.is_some(),
            VoteTarget::Reply(id) => tx.find_reply(id).await?.is_some(),
        };
        if !exists {
            return Err(EngineError::not_found(target.entity()));
        }

        if tx.find_vote(target, user_id).await?.is_some() {
            tracing::warn!(
                "User {} already voted on {} {}",
                user_id,
                target.entity(),
                target.id()
            );
            return Err(EngineError::AlreadyVoted);
        }

        tx.insert_vote(target, user_id, value)
            .await
            .map_err(|err| match err {
                StoreError::UniqueViolation { .. } => EngineError::AlreadyVoted,
                other => other.into(),
            })?;
        let votes = tx.increment_votes(target, value.delta()).await?;

        tx.commit().await?;

        Ok(VoteReceipt {
            target_id: target.id(),
            value,
            votes,
        })
    }

    /// Attach a reply to an annotation
    pub async fn reply(&self, user_id: Uuid, request: CreateReplyRequest) -> EngineResult<Reply> {
        let annotation_id = require_field(request.annotation_id, "annotationId")?;
        if user_id.is_nil() {
            return Err(EngineError::validation("userId", "Missing required field"));
        }
        let content = require_content(request.content.as_deref())?;

        let mut tx = self.store.begin().await?;

        let annotation = tx
            .find_annotation(annotation_id)
            .await?
            .ok_or(EngineError::not_found("annotation"))?;
        lock_parent_text(&mut *tx, &annotation).await?;

        let reply = tx
            .insert_reply(NewReply {
                annotation_id,
                user_id,
                content,
            })
            .await?;

        tx.commit().await?;
        Ok(reply)
    }

    /// Delete an annotation, its replies and all their votes
    ///
    /// Allowed for the annotation's author and the owner of its text.
    pub async fn delete_annotation(
        &self,
        annotation_id: Uuid,
        requesting_user_id: Uuid,
    ) -> EngineResult<()> {
        let mut tx = self.store.begin().await?;

        let annotation = tx
            .find_annotation(annotation_id)
            .await?
            .ok_or(EngineError::not_found("annotation"))?;
        let text = lock_parent_text(&mut *tx, &annotation).await?;

        if !may_delete(annotation.user_id, text.owner_id, requesting_user_id) {
            tracing::warn!(
                "User {} may not delete annotation {}",
                requesting_user_id,
                annotation_id
            );
            return Err(EngineError::forbidden("annotation"));
        }

        let removed_replies = tx.delete_replies_for_annotation(annotation_id).await?;
        if !tx.delete_annotation(annotation_id).await? {
            return Err(EngineError::not_found("annotation"));
        }
        tx.commit().await?;

        tracing::info!(
            "Deleted annotation {} with {} replies",
            annotation_id,
            removed_replies
        );
        Ok(())
    }

    /// Delete a reply and its votes
    ///
    /// Allowed for the reply's author and the owner of the annotated text.
    pub async fn delete_reply(&self, reply_id: Uuid, requesting_user_id: Uuid) -> EngineResult<()> {
        let mut tx = self.store.begin().await?;

        let reply = tx
            .find_reply(reply_id)
            .await?
            .ok_or(EngineError::not_found("reply"))?;
        let annotation = tx
            .find_annotation(reply.annotation_id)
            .await?
            .ok_or(EngineError::not_found("annotation"))?;
        let text = lock_parent_text(&mut *tx, &annotation).await?;

        if !may_delete(reply.user_id, text.owner_id, requesting_user_id) {
            tracing::warn!("User {} may not delete reply {}", requesting_user_id, reply_id);
            return Err(EngineError::forbidden("reply"));
        }

        if !tx.delete_reply(reply_id).await? {
            return Err(EngineError::not_found("reply"));
        }
        tx.commit().await?;

        tracing::info!("Deleted reply {}", reply_id);
        Ok(())
    }
}

/// Lock the text an annotation belongs to, then confirm the annotation
/// survived until the lock was granted
async fn lock_parent_text(tx: &mut dyn StoreTx, annotation: &Annotation) -> EngineResult<Text> {
    let text = tx
        .lock_text(annotation.text_id)
        .await?
        .ok_or(EngineError::not_found("text"))?;
    tx.find_annotation(annotation.id)
        .await?
        .ok_or(EngineError::not_found("annotation"))?;
    Ok(text)
}

fn may_delete(author_id: Uuid, text_owner_id: Uuid, requesting_user_id: Uuid) -> bool {
    requesting_user_id == author_id || requesting_user_id == text_owner_id
}

fn require_field<T>(value: Option<T>, field: &str) -> EngineResult<T> {
    value.ok_or_else(|| EngineError::validation(field, "Missing required field"))
}

fn require_content(content: Option<&str>) -> EngineResult<String> {
    match content {
        Some(content) if !content.trim().is_empty() => Ok(content.to_string()),
        _ => Err(EngineError::validation("content", "Missing required field")),
    }
}
