//! PostgreSQL annotation store
//!
//! Every unit of work is a `READ COMMITTED` transaction. `lock_text` takes a
//! row lock on the text with `SELECT ... FOR UPDATE`, which serializes
//! concurrent creates on the same text; statements issued after the lock is
//! granted see everything the previous holder committed. Concurrent
//! duplicate votes hit the unique index and surface as
//! `StoreError::UniqueViolation`.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

use crate::backend::annotations::store::{
    AnnotationOrder, AnnotationStore, NewAnnotation, NewReply, StoreError, StoreResult, StoreTx,
};
use crate::shared::annotations::{
    Annotation, AnnotationView, Reply, ReplyView, TextRange, Vote, VoteTarget, VoteValue,
};
use crate::shared::texts::Text;

/// Table and foreign-key column holding votes for a target kind
fn vote_table(target: VoteTarget) -> (&'static str, &'static str) {
    match target {
        VoteTarget::Annotation(_) => ("annotation_votes", "annotation_id"),
        VoteTarget::Reply(_) => ("reply_votes", "reply_id"),
    }
}

/// Table whose `votes` counter a target increments
fn counter_table(target: VoteTarget) -> &'static str {
    match target {
        VoteTarget::Annotation(_) => "annotations",
        VoteTarget::Reply(_) => "annotation_replies",
    }
}

/// Annotation store backed by a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgAnnotationStore {
    pool: PgPool,
}

impl PgAnnotationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnnotationStore for PgAnnotationStore {
    async fn begin(&self) -> StoreResult<Box<dyn StoreTx>> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL READ COMMITTED")
            .execute(&mut *tx)
            .await?;
        Ok(Box::new(PgStoreTx { tx }))
    }

    async fn find_text(&self, text_id: Uuid) -> StoreResult<Option<Text>> {
        let text = sqlx::query_as::<_, Text>(
            "SELECT id, owner_id, title, content, created_at FROM texts WHERE id = $1",
        )
        .bind(text_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(text)
    }

    async fn find_annotation(&self, annotation_id: Uuid) -> StoreResult<Option<Annotation>> {
        let annotation = sqlx::query_as::<_, Annotation>(
            r#"
            SELECT id, text_id, user_id, content, range_start, range_end, votes, created_at, updated_at
            FROM annotations
            WHERE id = $1
            "#,
        )
        .bind(annotation_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(annotation)
    }

    async fn find_reply(&self, reply_id: Uuid) -> StoreResult<Option<Reply>> {
        let reply = sqlx::query_as::<_, Reply>(
            r#"
            SELECT id, annotation_id, user_id, content, votes, created_at
            FROM annotation_replies
            WHERE id = $1
            "#,
        )
        .bind(reply_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(reply)
    }

    async fn list_annotations(
        &self,
        text_id: Uuid,
        order: AnnotationOrder,
    ) -> StoreResult<Vec<AnnotationView>> {
        let order_by = match order {
            AnnotationOrder::ByRange => "a.range_start ASC, a.created_at ASC, a.id ASC",
            AnnotationOrder::ByVotes => "a.votes DESC, a.created_at ASC, a.id ASC",
        };
        let sql = format!(
            r#"
            SELECT a.id, a.text_id, a.user_id, a.content, a.range_start, a.range_end,
                   a.votes, a.created_at, a.updated_at, u.username
            FROM annotations a
            JOIN users u ON u.id = a.user_id
            WHERE a.text_id = $1
            ORDER BY {}
            "#,
            order_by
        );

        let views = sqlx::query_as::<_, AnnotationView>(&sql)
            .bind(text_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(views)
    }

    async fn list_replies(&self, text_id: Uuid) -> StoreResult<Vec<ReplyView>> {
        let views = sqlx::query_as::<_, ReplyView>(
            r#"
            SELECT r.id, r.annotation_id, r.user_id, r.content, r.votes, r.created_at, u.username
            FROM annotation_replies r
            JOIN annotations a ON a.id = r.annotation_id
            JOIN users u ON u.id = r.user_id
            WHERE a.text_id = $1
            ORDER BY r.created_at ASC, r.id ASC
            "#,
        )
        .bind(text_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(views)
    }
}

/// Unit of work over `PgAnnotationStore`
pub struct PgStoreTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl StoreTx for PgStoreTx {
    async fn lock_text(&mut self, text_id: Uuid) -> StoreResult<Option<Text>> {
        let text = sqlx::query_as::<_, Text>(
            "SELECT id, owner_id, title, content, created_at FROM texts WHERE id = $1 FOR UPDATE",
        )
        .bind(text_id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(text)
    }

    async fn find_text(&mut self, text_id: Uuid) -> StoreResult<Option<Text>> {
        let text = sqlx::query_as::<_, Text>(
            "SELECT id, owner_id, title, content, created_at FROM texts WHERE id = $1",
        )
        .bind(text_id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(text)
    }

    async fn find_overlapping(
        &mut self,
        text_id: Uuid,
        range: TextRange,
    ) -> StoreResult<Vec<Annotation>> {
        // [a, b) and [c, d) overlap unless b <= c or a >= d
        let annotations = sqlx::query_as::<_, Annotation>(
            r#"
            SELECT id, text_id, user_id, content, range_start, range_end, votes, created_at, updated_at
            FROM annotations
            WHERE text_id = $1
              AND NOT (range_end <= $2 OR range_start >= $3)
            ORDER BY range_start ASC, created_at ASC, id ASC
            "#,
        )
        .bind(text_id)
        .bind(range.start())
        .bind(range.end())
        .fetch_all(&mut *self.tx)
        .await?;
        Ok(annotations)
    }

    async fn insert_annotation(&mut self, annotation: NewAnnotation) -> StoreResult<Annotation> {
        let now = Utc::now();
        let row = sqlx::query_as::<_, Annotation>(
            r#"
            INSERT INTO annotations (id, text_id, user_id, content, range_start, range_end, votes, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, 0, $7, $7)
            RETURNING id, text_id, user_id, content, range_start, range_end, votes, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(annotation.text_id)
        .bind(annotation.user_id)
        .bind(&annotation.content)
        .bind(annotation.range.start())
        .bind(annotation.range.end())
        .bind(now)
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(row)
    }

    async fn update_annotation_range(
        &mut self,
        annotation_id: Uuid,
        range: TextRange,
    ) -> StoreResult<Annotation> {
        let row = sqlx::query_as::<_, Annotation>(
            r#"
            UPDATE annotations
            SET range_start = $1, range_end = $2, updated_at = $3
            WHERE id = $4
            RETURNING id, text_id, user_id, content, range_start, range_end, votes, created_at, updated_at
            "#,
        )
        .bind(range.start())
        .bind(range.end())
        .bind(Utc::now())
        .bind(annotation_id)
        .fetch_optional(&mut *self.tx)
        .await?;

        row.ok_or_else(|| StoreError::query(format!("annotation {} does not exist", annotation_id)))
    }

    async fn find_annotation(&mut self, annotation_id: Uuid) -> StoreResult<Option<Annotation>> {
        let annotation = sqlx::query_as::<_, Annotation>(
            r#"
            SELECT id, text_id, user_id, content, range_start, range_end, votes, created_at, updated_at
            FROM annotations
            WHERE id = $1
            "#,
        )
        .bind(annotation_id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(annotation)
    }

    async fn find_reply(&mut self, reply_id: Uuid) -> StoreResult<Option<Reply>> {
        let reply = sqlx::query_as::<_, Reply>(
            r#"
            SELECT id, annotation_id, user_id, content, votes, created_at
            FROM annotation_replies
            WHERE id = $1
            "#,
        )
        .bind(reply_id)
        .fetch_optional(&mut *self.tx)
        .await?;
        Ok(reply)
    }

    async fn insert_reply(&mut self, reply: NewReply) -> StoreResult<Reply> {
        let row = sqlx::query_as::<_, Reply>(
            r#"
            INSERT INTO annotation_replies (id, annotation_id, user_id, content, votes, created_at)
            VALUES ($1, $2, $3, $4, 0, $5)
            RETURNING id, annotation_id, user_id, content, votes, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(reply.annotation_id)
        .bind(reply.user_id)
        .bind(&reply.content)
        .bind(Utc::now())
        .fetch_one(&mut *self.tx)
        .await?;
        Ok(row)
    }

    async fn find_vote(&mut self, target: VoteTarget, user_id: Uuid) -> StoreResult<Option<Vote>> {
        let (table, column) = vote_table(target);
        let sql = format!(
            "SELECT id, user_id, vote_value FROM {} WHERE {} = $1 AND user_id = $2",
            table, column
        );

        let row = sqlx::query(&sql)
            .bind(target.id())
            .bind(user_id)
            .fetch_optional(&mut *self.tx)
            .await?;

        row.map(|r| {
            let value = VoteValue::try_from(r.get::<i32, _>("vote_value"))
                .map_err(|err| StoreError::query(err.to_string()))?;
            Ok(Vote {
                id: r.get("id"),
                target_id: target.id(),
                user_id: r.get("user_id"),
                value,
            })
        })
        .transpose()
    }

    async fn insert_vote(
        &mut self,
        target: VoteTarget,
        user_id: Uuid,
        value: VoteValue,
    ) -> StoreResult<Vote> {
        let (table, column) = vote_table(target);
        let sql = format!(
            "INSERT INTO {} (id, {}, user_id, vote_value) VALUES ($1, $2, $3, $4)",
            table, column
        );
        let id = Uuid::new_v4();

        sqlx::query(&sql)
            .bind(id)
            .bind(target.id())
            .bind(user_id)
            .bind(value.delta())
            .execute(&mut *self.tx)
            .await?;

        Ok(Vote {
            id,
            target_id: target.id(),
            user_id,
            value,
        })
    }

    async fn increment_votes(&mut self, target: VoteTarget, delta: i32) -> StoreResult<i32> {
        let sql = format!(
            "UPDATE {} SET votes = votes + $1 WHERE id = $2 RETURNING votes",
            counter_table(target)
        );

        let row = sqlx::query(&sql)
            .bind(delta)
            .bind(target.id())
            .fetch_optional(&mut *self.tx)
            .await?;

        row.map(|r| r.get::<i32, _>("votes")).ok_or_else(|| {
            StoreError::query(format!("{} {} does not exist", target.entity(), target.id()))
        })
    }

    async fn delete_replies_for_annotation(&mut self, annotation_id: Uuid) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM annotation_replies WHERE annotation_id = $1")
            .bind(annotation_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_annotation(&mut self, annotation_id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM annotations WHERE id = $1")
            .bind(annotation_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_reply(&mut self, reply_id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM annotation_replies WHERE id = $1")
            .bind(reply_id)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}
