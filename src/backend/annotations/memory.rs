//! In-memory annotation store
//!
//! Used when no `DATABASE_URL` is configured and throughout the tests. A
//! single store-wide async mutex is held for the lifetime of each unit of
//! work; the transaction edits a private copy that is written back on
//! `commit`, so dropping it discards every change.
//!
//! Rows live in `Vec`s in insertion order, which keeps listing tie-breaks
//! stable when timestamps collide.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::backend::annotations::store::{
    AnnotationOrder, AnnotationStore, NewAnnotation, NewReply, StoreError, StoreResult, StoreTx,
};
use crate::shared::annotations::{
    Annotation, AnnotationView, Reply, ReplyView, TextRange, Vote, VoteTarget, VoteValue,
};
use crate::shared::texts::Text;

#[derive(Debug, Clone, Default)]
struct MemoryData {
    usernames: HashMap<Uuid, String>,
    texts: Vec<Text>,
    annotations: Vec<Annotation>,
    replies: Vec<Reply>,
    votes: Vec<(VoteTarget, Vote)>,
}

impl MemoryData {
    fn text(&self, text_id: Uuid) -> Option<Text> {
        self.texts.iter().find(|text| text.id == text_id).cloned()
    }

    fn annotation(&self, annotation_id: Uuid) -> Option<Annotation> {
        self.annotations
            .iter()
            .find(|annotation| annotation.id == annotation_id)
            .cloned()
    }

    fn reply(&self, reply_id: Uuid) -> Option<Reply> {
        self.replies.iter().find(|reply| reply.id == reply_id).cloned()
    }

    fn annotation_views(&self, text_id: Uuid, order: AnnotationOrder) -> Vec<AnnotationView> {
        let mut views: Vec<AnnotationView> = self
            .annotations
            .iter()
            .filter(|annotation| annotation.text_id == text_id)
            .filter_map(|annotation| {
                self.usernames
                    .get(&annotation.user_id)
                    .map(|username| AnnotationView {
                        annotation: annotation.clone(),
                        username: username.clone(),
                    })
            })
            .collect();

        match order {
            AnnotationOrder::ByRange => views.sort_by_key(|view| {
                (view.annotation.range_start, view.annotation.created_at)
            }),
            AnnotationOrder::ByVotes => views.sort_by_key(|view| {
                (Reverse(view.annotation.votes), view.annotation.created_at)
            }),
        }
        views
    }

    fn reply_views(&self, text_id: Uuid) -> Vec<ReplyView> {
        let mut views: Vec<ReplyView> = self
            .replies
            .iter()
            .filter(|reply| {
                self.annotations
                    .iter()
                    .any(|annotation| annotation.id == reply.annotation_id && annotation.text_id == text_id)
            })
            .filter_map(|reply| {
                self.usernames.get(&reply.user_id).map(|username| ReplyView {
                    reply: reply.clone(),
                    username: username.clone(),
                })
            })
            .collect();
        views.sort_by_key(|view| view.reply.created_at);
        views
    }

    fn remove_reply_rows(&mut self, predicate: impl Fn(&Reply) -> bool) -> u64 {
        let doomed: Vec<Uuid> = self
            .replies
            .iter()
            .filter(|reply| predicate(reply))
            .map(|reply| reply.id)
            .collect();
        self.votes.retain(|(target, _)| match target {
            VoteTarget::Reply(id) => !doomed.contains(id),
            VoteTarget::Annotation(_) => true,
        });
        self.replies.retain(|reply| !doomed.contains(&reply.id));
        doomed.len() as u64
    }
}

/// Annotation store backed by process memory
#[derive(Debug, Clone, Default)]
pub struct MemoryAnnotationStore {
    data: Arc<Mutex<MemoryData>>,
}

impl MemoryAnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user so that listings can resolve its username
    pub async fn insert_user(&self, username: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.data
            .lock()
            .await
            .usernames
            .insert(id, username.to_string());
        id
    }

    pub async fn insert_text(&self, owner_id: Uuid, title: &str, content: &str) -> Text {
        let text = Text {
            id: Uuid::new_v4(),
            owner_id,
            title: title.to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
        };
        self.data.lock().await.texts.push(text.clone());
        text
    }

    /// Number of vote rows recorded against a target
    pub async fn vote_count(&self, target: VoteTarget) -> usize {
        self.data
            .lock()
            .await
            .votes
            .iter()
            .filter(|(voted, _)| *voted == target)
            .count()
    }
}

#[async_trait]
impl AnnotationStore for MemoryAnnotationStore {
    async fn begin(&self) -> StoreResult<Box<dyn StoreTx>> {
        let guard = self.data.clone().lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(MemoryStoreTx { guard, working }))
    }

    async fn find_text(&self, text_id: Uuid) -> StoreResult<Option<Text>> {
        Ok(self.data.lock().await.text(text_id))
    }

    async fn find_annotation(&self, annotation_id: Uuid) -> StoreResult<Option<Annotation>> {
        Ok(self.data.lock().await.annotation(annotation_id))
    }

    async fn find_reply(&self, reply_id: Uuid) -> StoreResult<Option<Reply>> {
        Ok(self.data.lock().await.reply(reply_id))
    }

    async fn list_annotations(
        &self,
        text_id: Uuid,
        order: AnnotationOrder,
    ) -> StoreResult<Vec<AnnotationView>> {
        Ok(self.data.lock().await.annotation_views(text_id, order))
    }

    async fn list_replies(&self, text_id: Uuid) -> StoreResult<Vec<ReplyView>> {
        Ok(self.data.lock().await.reply_views(text_id))
    }
}

/// Unit of work over `MemoryAnnotationStore`
struct MemoryStoreTx {
    guard: OwnedMutexGuard<MemoryData>,
    working: MemoryData,
}

#[async_trait]
impl StoreTx for MemoryStoreTx {
    async fn lock_text(&mut self, text_id: Uuid) -> StoreResult<Option<Text>> {
        // The store-wide guard is already held
        Ok(self.working.text(text_id))
    }

    async fn find_text(&mut self, text_id: Uuid) -> StoreResult<Option<Text>> {
        Ok(self.working.text(text_id))
    }

    async fn find_overlapping(
        &mut self,
        text_id: Uuid,
        range: TextRange,
    ) -> StoreResult<Vec<Annotation>> {
        let mut overlapping: Vec<Annotation> = self
            .working
            .annotations
            .iter()
            .filter(|annotation| annotation.text_id == text_id && annotation.range().overlaps(&range))
            .cloned()
            .collect();
        overlapping.sort_by_key(|annotation| (annotation.range_start, annotation.created_at));
        Ok(overlapping)
    }

    async fn insert_annotation(&mut self, annotation: NewAnnotation) -> StoreResult<Annotation> {
        let now = Utc::now();
        let row = Annotation {
            id: Uuid::new_v4(),
            text_id: annotation.text_id,
            user_id: annotation.user_id,
            content: annotation.content,
            range_start: annotation.range.start(),
            range_end: annotation.range.end(),
            votes: 0,
            created_at: now,
            updated_at: now,
        };
        self.working.annotations.push(row.clone());
        Ok(row)
    }

    async fn update_annotation_range(
        &mut self,
        annotation_id: Uuid,
        range: TextRange,
    ) -> StoreResult<Annotation> {
        let row = self
            .working
            .annotations
            .iter_mut()
            .find(|annotation| annotation.id == annotation_id)
            .ok_or_else(|| StoreError::query(format!("annotation {} does not exist", annotation_id)))?;
        row.range_start = range.start();
        row.range_end = range.end();
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn find_annotation(&mut self, annotation_id: Uuid) -> StoreResult<Option<Annotation>> {
        Ok(self.working.annotation(annotation_id))
    }

    async fn find_reply(&mut self, reply_id: Uuid) -> StoreResult<Option<Reply>> {
        Ok(self.working.reply(reply_id))
    }

    async fn insert_reply(&mut self, reply: NewReply) -> StoreResult<Reply> {
        if self.working.annotation(reply.annotation_id).is_none() {
            return Err(StoreError::query(format!(
                "annotation {} does not exist",
                reply.annotation_id
            )));
        }
        let row = Reply {
            id: Uuid::new_v4(),
            annotation_id: reply.annotation_id,
            user_id: reply.user_id,
            content: reply.content,
            votes: 0,
            created_at: Utc::now(),
        };
        self.working.replies.push(row.clone());
        Ok(row)
    }

    async fn find_vote(&mut self, target: VoteTarget, user_id: Uuid) -> StoreResult<Option<Vote>> {
        Ok(self
            .working
            .votes
            .iter()
            .find(|(voted, vote)| *voted == target && vote.user_id == user_id)
            .map(|(_, vote)| vote.clone()))
    }

    async fn insert_vote(
        &mut self,
        target: VoteTarget,
        user_id: Uuid,
        value: VoteValue,
    ) -> StoreResult<Vote> {
        if self.find_vote(target, user_id).await?.is_some() {
            let constraint = match target {
                VoteTarget::Annotation(_) => "annotation_votes_annotation_id_user_id_key",
                VoteTarget::Reply(_) => "reply_votes_reply_id_user_id_key",
            };
            return Err(StoreError::UniqueViolation {
                constraint: constraint.to_string(),
            });
        }
        let vote = Vote {
            id: Uuid::new_v4(),
            target_id: target.id(),
            user_id,
            value,
        };
        self.working.votes.push((target, vote.clone()));
        Ok(vote)
    }

    async fn increment_votes(&mut self, target: VoteTarget, delta: i32) -> StoreResult<i32> {
        let counter = match target {
            VoteTarget::Annotation(id) => self
                .working
                .annotations
                .iter_mut()
                .find(|annotation| annotation.id == id)
                .map(|annotation| &mut annotation.votes),
            VoteTarget::Reply(id) => self
                .working
                .replies
                .iter_mut()
                .find(|reply| reply.id == id)
                .map(|reply| &mut reply.votes),
        };
        let counter = counter.ok_or_else(|| {
            StoreError::query(format!("{} {} does not exist", target.entity(), target.id()))
        })?;
        *counter += delta;
        Ok(*counter)
    }

    async fn delete_replies_for_annotation(&mut self, annotation_id: Uuid) -> StoreResult<u64> {
        Ok(self
            .working
            .remove_reply_rows(|reply| reply.annotation_id == annotation_id))
    }

    async fn delete_annotation(&mut self, annotation_id: Uuid) -> StoreResult<bool> {
        let before = self.working.annotations.len();
        self.working
            .remove_reply_rows(|reply| reply.annotation_id == annotation_id);
        self.working
            .votes
            .retain(|(target, _)| *target != VoteTarget::Annotation(annotation_id));
        self.working
            .annotations
            .retain(|annotation| annotation.id != annotation_id);
        Ok(self.working.annotations.len() < before)
    }

    async fn delete_reply(&mut self, reply_id: Uuid) -> StoreResult<bool> {
        Ok(self.working.remove_reply_rows(|reply| reply.id == reply_id) > 0)
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        let MemoryStoreTx { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }
}
