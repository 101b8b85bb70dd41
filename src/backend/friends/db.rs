//! Database operations for friends
//!
//! Friend requests move from `pending` to `approved` or `denied` exactly
//! once. Approval inserts the friendship in both directions.

use chrono::Utc;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::shared::friends::{Friend, FriendRequest, FriendRequestStatus, PendingFriendRequest};

pub async fn find_user_id_by_email(pool: &PgPool, email: &str) -> Result<Option<Uuid>, sqlx::Error> {
    let row = sqlx::query("SELECT id FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|r| r.get("id")))
}

/// Create a pending friend request
///
/// A second pending request for the same pair violates
/// `friend_requests_one_pending`.
pub async fn create_friend_request(
    pool: &PgPool,
    sender_id: Uuid,
    receiver_id: Uuid,
) -> Result<FriendRequest, sqlx::Error> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO friend_requests (id, sender_id, receiver_id, status, created_at, responded_at)
        VALUES ($1, $2, $3, 'pending', $4, NULL)
        "#,
    )
    .bind(id)
    .bind(sender_id)
    .bind(receiver_id)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(FriendRequest {
        id,
        sender_id,
        receiver_id,
        status: FriendRequestStatus::Pending,
        created_at: now,
        responded_at: None,
    })
}

pub async fn are_friends(pool: &PgPool, user_id: Uuid, other_id: Uuid) -> Result<bool, sqlx::Error> {
    let row = sqlx::query("SELECT 1 FROM friends WHERE user_id = $1 AND friend_id = $2")
        .bind(user_id)
        .bind(other_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.is_some())
}

/// Resolve a pending request addressed to `receiver_id`
///
/// Returns `None` when no such pending request exists.
pub async fn respond_to_friend_request(
    pool: &PgPool,
    request_id: Uuid,
    receiver_id: Uuid,
    status: FriendRequestStatus,
) -> Result<Option<FriendRequest>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let row = sqlx::query(
        r#"
        UPDATE friend_requests
        SET status = $1, responded_at = $2
        WHERE id = $3 AND receiver_id = $4 AND status = 'pending'
        RETURNING id, sender_id, receiver_id, created_at, responded_at
        "#,
    )
    .bind(status.as_str())
    .bind(Utc::now())
    .bind(request_id)
    .bind(receiver_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let request = FriendRequest {
        id: row.get("id"),
        sender_id: row.get("sender_id"),
        receiver_id: row.get("receiver_id"),
        status,
        created_at: row.get("created_at"),
        responded_at: row.get("responded_at"),
    };

    if status == FriendRequestStatus::Approved {
        sqlx::query(
            r#"
            INSERT INTO friends (user_id, friend_id, created_at)
            VALUES ($1, $2, $3), ($2, $1, $3)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(request.sender_id)
        .bind(request.receiver_id)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(Some(request))
}

/// Friends of a user, by username
pub async fn list_friends(pool: &PgPool, user_id: Uuid) -> Result<Vec<Friend>, sqlx::Error> {
    sqlx::query_as::<_, Friend>(
        r#"
        SELECT u.id AS user_id, u.username, u.email
        FROM friends f
        JOIN users u ON f.friend_id = u.id
        WHERE f.user_id = $1
        ORDER BY u.username ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Pending requests received by a user, newest first
pub async fn list_pending_requests(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<PendingFriendRequest>, sqlx::Error> {
    sqlx::query_as::<_, PendingFriendRequest>(
        r#"
        SELECT fr.id, u.username AS sender_username, u.email AS sender_email, fr.created_at
        FROM friend_requests fr
        JOIN users u ON fr.sender_id = u.id
        WHERE fr.receiver_id = $1 AND fr.status = 'pending'
        ORDER BY fr.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}
