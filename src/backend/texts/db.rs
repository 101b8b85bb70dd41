//! Database operations for texts
//!
//! Texts and their sharing permissions. Annotation rows are read through the
//! annotation store; deleting a text cascades to them in the schema.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::shared::texts::{SharedUser, Text};

/// Create a text and share it with the users owning `shared_with` e-mails
///
/// Unknown addresses and the owner's own address are skipped. Returns the
/// text and the users it was actually shared with.
pub async fn create_text(
    pool: &PgPool,
    owner_id: Uuid,
    title: &str,
    content: &str,
    shared_with: &[String],
) -> Result<(Text, Vec<SharedUser>), sqlx::Error> {
    let mut tx = pool.begin().await?;

    let text = sqlx::query_as::<_, Text>(
        r#"
        INSERT INTO texts (id, owner_id, title, content, created_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, owner_id, title, content, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(owner_id)
    .bind(title)
    .bind(content)
    .bind(Utc::now())
    .fetch_one(&mut *tx)
    .await?;

    let mut shared = Vec::new();
    for email in shared_with {
        let user = sqlx::query_as::<_, (Uuid, String, String)>(
            "SELECT id, username, email FROM users WHERE email = $1",
        )
        .bind(email.trim())
        .fetch_optional(&mut *tx)
        .await?;

        let Some((user_id, username, email)) = user else {
            tracing::debug!("Skipping share with unknown e-mail {}", email);
            continue;
        };
        if user_id == owner_id {
            continue;
        }

        let inserted = sqlx::query(
            r#"
            INSERT INTO text_permissions (text_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(text.id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        if inserted.rows_affected() > 0 {
            shared.push(SharedUser { username, email });
        }
    }

    tx.commit().await?;
    Ok((text, shared))
}

/// Texts owned by a user, newest first
pub async fn list_owned_texts(pool: &PgPool, user_id: Uuid) -> Result<Vec<Text>, sqlx::Error> {
    sqlx::query_as::<_, Text>(
        r#"
        SELECT id, owner_id, title, content, created_at
        FROM texts
        WHERE owner_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Texts shared with a user, newest first
pub async fn list_shared_texts(pool: &PgPool, user_id: Uuid) -> Result<Vec<Text>, sqlx::Error> {
    sqlx::query_as::<_, Text>(
        r#"
        SELECT t.id, t.owner_id, t.title, t.content, t.created_at
        FROM text_permissions tp
        JOIN texts t ON tp.text_id = t.id
        WHERE tp.user_id = $1
        ORDER BY t.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn get_text(pool: &PgPool, text_id: Uuid) -> Result<Option<Text>, sqlx::Error> {
    sqlx::query_as::<_, Text>(
        "SELECT id, owner_id, title, content, created_at FROM texts WHERE id = $1",
    )
    .bind(text_id)
    .fetch_optional(pool)
    .await
}

/// Users a text is shared with
pub async fn get_shared_users(pool: &PgPool, text_id: Uuid) -> Result<Vec<SharedUser>, sqlx::Error> {
    sqlx::query_as::<_, SharedUser>(
        r#"
        SELECT u.username, u.email
        FROM text_permissions tp
        JOIN users u ON tp.user_id = u.id
        WHERE tp.text_id = $1
        ORDER BY u.username ASC
        "#,
    )
    .bind(text_id)
    .fetch_all(pool)
    .await
}

/// Delete a text; annotations, replies, votes and permissions cascade
pub async fn delete_text(pool: &PgPool, text_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM texts WHERE id = $1")
        .bind(text_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
