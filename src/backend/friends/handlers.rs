//! HTTP handlers for friend endpoints

use axum::{extract::State, http::StatusCode, response::Json};

use crate::backend::error::BackendError;
use crate::backend::friends::db;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::friends::{
    Friend, FriendActionResponse, FriendRequestStatus, PendingFriendRequest,
    RespondFriendRequestRequest, SendFriendRequestRequest,
};

/// Parse the status of a response; only `approved` and `denied` resolve a request
pub(crate) fn parse_response_status(status: &str) -> Result<FriendRequestStatus, BackendError> {
    match FriendRequestStatus::parse(status) {
        Some(FriendRequestStatus::Pending) | None => Err(BackendError::bad_request(
            "Status must be 'approved' or 'denied'",
        )),
        Some(status) => Ok(status),
    }
}

/// `POST /api/friends/request`
pub async fn send_friend_request(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<SendFriendRequestRequest>,
) -> Result<Json<FriendActionResponse>, BackendError> {
    let pool = state.require_db()?;

    let receiver_id = db::find_user_id_by_email(pool, request.receiver_email.trim())
        .await?
        .ok_or_else(|| BackendError::not_found("User not found"))?;

    if receiver_id == user.user_id {
        return Err(BackendError::bad_request(
            "Cannot send a friend request to yourself",
        ));
    }
    if db::are_friends(pool, user.user_id, receiver_id).await? {
        return Err(BackendError::handler(StatusCode::CONFLICT, "Already friends"));
    }

    let friend_request = db::create_friend_request(pool, user.user_id, receiver_id).await?;

    tracing::info!(
        "Friend request {} sent from {} to {}",
        friend_request.id,
        user.user_id,
        receiver_id
    );
    Ok(Json(FriendActionResponse {
        message: "Friend request sent".to_string(),
        request_id: Some(friend_request.id),
    }))
}

/// `POST /api/friends/request/respond`
///
/// Only the receiver of a pending request may resolve it.
pub async fn respond_to_friend_request(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<RespondFriendRequestRequest>,
) -> Result<Json<FriendActionResponse>, BackendError> {
    let pool = state.require_db()?;
    let status = parse_response_status(&request.status)?;

    let resolved = db::respond_to_friend_request(pool, request.request_id, user.user_id, status)
        .await?
        .ok_or_else(|| BackendError::not_found("Request not found"))?;

    tracing::info!("Friend request {} {}", resolved.id, status.as_str());
    Ok(Json(FriendActionResponse {
        message: "Friend request processed".to_string(),
        request_id: Some(resolved.id),
    }))
}

/// `GET /api/friends/list`
pub async fn list_friends(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<Friend>>, BackendError> {
    let pool = state.require_db()?;
    Ok(Json(db::list_friends(pool, user.user_id).await?))
}

/// `GET /api/friends/requests`
pub async fn list_friend_requests(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<PendingFriendRequest>>, BackendError> {
    let pool = state.require_db()?;
    Ok(Json(db::list_pending_requests(pool, user.user_id).await?))
}
