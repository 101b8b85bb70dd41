//! Friend Request Data Structures
//!
//! Represents friend requests and friendships between users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status of a friend request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FriendRequestStatus {
    /// Request is waiting for the receiver
    #[default]
    Pending,
    /// Receiver accepted; both users are now friends
    Approved,
    /// Receiver declined
    Denied,
}

impl FriendRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FriendRequestStatus::Pending => "pending",
            FriendRequestStatus::Approved => "approved",
            FriendRequestStatus::Denied => "denied",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(FriendRequestStatus::Pending),
            "approved" => Some(FriendRequestStatus::Approved),
            "denied" => Some(FriendRequestStatus::Denied),
            _ => None,
        }
    }
}

/// A friend request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FriendRequest {
    /// Unique request ID
    pub id: Uuid,
    /// User who sent the request
    pub sender_id: Uuid,
    /// User who received the request
    pub receiver_id: Uuid,
    /// Current status of the request
    #[serde(default)]
    pub status: FriendRequestStatus,
    pub created_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

impl FriendRequest {
    /// Check if the request is pending
    pub fn is_pending(&self) -> bool {
        self.status == FriendRequestStatus::Pending
    }
}

/// A pending request as shown to its receiver
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PendingFriendRequest {
    pub id: Uuid,
    pub sender_username: String,
    pub sender_email: String,
    pub created_at: DateTime<Utc>,
}

/// A friend in the caller's list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
pub struct Friend {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
}

/// Request to send a friend request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendFriendRequestRequest {
    /// Email of the user to send the request to
    pub receiver_email: String,
}

/// Request to respond to a friend request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RespondFriendRequestRequest {
    /// ID of the request to respond to
    pub request_id: Uuid,
    /// `approved` or `denied`
    pub status: String,
}

/// Generic acknowledgement for friend operations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendActionResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<Uuid>,
}
