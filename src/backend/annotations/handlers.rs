//! HTTP handlers for annotation endpoints
//!
//! Thin adapters: extract the caller from `AuthUser`, call the engine and
//! map its result to a response. Engine errors convert into `BackendError`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::backend::annotations::engine::{AnnotationEngine, CreateOutcome};
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::shared::annotations::{
    CreateAnnotationRequest, CreateReplyRequest, MergedAnnotationResponse, VoteRequest,
};

/// `POST /api/annotations/create`
///
/// 201 with the new annotation, or 201 with a merge summary when the range
/// overlapped an existing annotation.
pub async fn create_annotation(
    State(engine): State<AnnotationEngine>,
    AuthUser(user): AuthUser,
    Json(request): Json<CreateAnnotationRequest>,
) -> Result<Response, BackendError> {
    let outcome = engine.submit(user.user_id, request).await?;

    let response = match outcome {
        CreateOutcome::Created(annotation) => {
            (StatusCode::CREATED, Json(annotation)).into_response()
        }
        CreateOutcome::Merged { annotation, reply } => (
            StatusCode::CREATED,
            Json(MergedAnnotationResponse {
                message: "Annotation merged successfully".to_string(),
                annotation,
                reply,
            }),
        )
            .into_response(),
    };
    Ok(response)
}

/// `GET /api/annotations/{textId}`
pub async fn list_annotations(
    State(engine): State<AnnotationEngine>,
    AuthUser(_user): AuthUser,
    Path(text_id): Path<Uuid>,
) -> Result<Response, BackendError> {
    let listing = engine.list_for_text(text_id).await?;
    Ok(Json(listing).into_response())
}

/// `POST /api/annotations/{id}/vote`
pub async fn vote_annotation(
    State(engine): State<AnnotationEngine>,
    AuthUser(user): AuthUser,
    Path(annotation_id): Path<Uuid>,
    Json(request): Json<VoteRequest>,
) -> Result<Response, BackendError> {
    let receipt = engine
        .vote(annotation_id, user.user_id, request.vote_value)
        .await?;
    Ok(Json(json!({ "message": "Vote recorded", "votes": receipt.votes })).into_response())
}

/// `POST /api/annotations/{id}/reply-vote`
pub async fn vote_reply(
    State(engine): State<AnnotationEngine>,
    AuthUser(user): AuthUser,
    Path(reply_id): Path<Uuid>,
    Json(request): Json<VoteRequest>,
) -> Result<Response, BackendError> {
    let receipt = engine
        .reply_vote(reply_id, user.user_id, request.vote_value)
        .await?;
    Ok(Json(json!({ "message": "Vote recorded", "votes": receipt.votes })).into_response())
}

/// `POST /api/annotations/reply`
pub async fn create_reply(
    State(engine): State<AnnotationEngine>,
    AuthUser(user): AuthUser,
    Json(request): Json<CreateReplyRequest>,
) -> Result<Response, BackendError> {
    let reply = engine.reply(user.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(reply)).into_response())
}

/// `DELETE /api/annotations/{id}/delete`
pub async fn delete_annotation(
    State(engine): State<AnnotationEngine>,
    AuthUser(user): AuthUser,
    Path(annotation_id): Path<Uuid>,
) -> Result<Response, BackendError> {
    engine.delete_annotation(annotation_id, user.user_id).await?;
    Ok(Json(json!({ "message": "Annotation deleted successfully" })).into_response())
}

/// `DELETE /api/annotations/reply/{id}/delete`
pub async fn delete_reply(
    State(engine): State<AnnotationEngine>,
    AuthUser(user): AuthUser,
    Path(reply_id): Path<Uuid>,
) -> Result<Response, BackendError> {
    engine.delete_reply(reply_id, user.user_id).await?;
    Ok(Json(json!({ "message": "Reply deleted successfully" })).into_response())
}
