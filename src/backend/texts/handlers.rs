//! HTTP handlers for text endpoints
//!
//! All of them need PostgreSQL and answer 503 without it.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::backend::annotations::AnnotationOrder;
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::backend::texts::db;
use crate::shared::texts::{
    CreateTextRequest, CreateTextResponse, TextDetailResponse, TextListResponse,
};

/// `POST /api/texts/create`
pub async fn create_text(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<CreateTextRequest>,
) -> Result<(StatusCode, Json<CreateTextResponse>), BackendError> {
    let pool = state.require_db()?;

    if request.title.trim().is_empty() {
        return Err(BackendError::bad_request("Title is required"));
    }
    if request.content.is_empty() {
        return Err(BackendError::bad_request("Content is required"));
    }

    let (text, shared_with) = db::create_text(
        pool,
        user.user_id,
        request.title.trim(),
        &request.content,
        &request.shared_with,
    )
    .await?;

    tracing::info!(
        "User {} created text {} shared with {} users",
        user.user_id,
        text.id,
        shared_with.len()
    );
    Ok((
        StatusCode::CREATED,
        Json(CreateTextResponse {
            id: text.id,
            shared_with,
        }),
    ))
}

/// `GET /api/texts`
pub async fn list_texts(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<TextListResponse>, BackendError> {
    let pool = state.require_db()?;

    let owned = db::list_owned_texts(pool, user.user_id).await?;
    let shared = db::list_shared_texts(pool, user.user_id).await?;

    Ok(Json(TextListResponse { owned, shared }))
}

/// `GET /api/texts/{id}`
///
/// Annotations are ordered by votes (highest first), then age.
pub async fn get_text(
    State(state): State<AppState>,
    AuthUser(_user): AuthUser,
    Path(text_id): Path<Uuid>,
) -> Result<Json<TextDetailResponse>, BackendError> {
    let pool = state.require_db()?;

    let text = db::get_text(pool, text_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Text not found"))?;

    let store = state.engine.store();
    let annotations = store
        .list_annotations(text_id, AnnotationOrder::ByVotes)
        .await
        .map_err(|e| BackendError::Engine(e.into()))?;
    let replies = store
        .list_replies(text_id)
        .await
        .map_err(|e| BackendError::Engine(e.into()))?;
    let shared_with = db::get_shared_users(pool, text_id).await?;

    Ok(Json(TextDetailResponse {
        text,
        annotations,
        replies,
        shared_with,
    }))
}

/// `DELETE /api/texts/{id}`
///
/// Only the owner may delete a text.
pub async fn delete_text(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(text_id): Path<Uuid>,
) -> Result<Json<Value>, BackendError> {
    let pool = state.require_db()?;

    let text = db::get_text(pool, text_id)
        .await?
        .ok_or_else(|| BackendError::not_found("Text not found"))?;
    if text.owner_id != user.user_id {
        tracing::warn!("User {} may not delete text {}", user.user_id, text_id);
        return Err(BackendError::forbidden("Only the owner may delete this text"));
    }

    if !db::delete_text(pool, text_id).await? {
        return Err(BackendError::not_found("Text not found"));
    }

    tracing::info!("Deleted text {}", text_id);
    Ok(Json(json!({ "message": "Text deleted successfully", "id": text_id })))
}
