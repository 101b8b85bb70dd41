//! Vote Data Structures
//!
//! A vote is a `(voter, target)` pair carrying +1 or -1. Each user may vote
//! on a given annotation or reply at most once.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::SharedError;

/// Direction of a vote
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "i32", into = "i32")]
pub enum VoteValue {
    Up,
    Down,
}

impl VoteValue {
    /// Signed delta applied to the target's counter
    pub fn delta(self) -> i32 {
        match self {
            VoteValue::Up => 1,
            VoteValue::Down => -1,
        }
    }
}

impl TryFrom<i32> for VoteValue {
    type Error = SharedError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(VoteValue::Up),
            -1 => Ok(VoteValue::Down),
            other => Err(SharedError::validation(
                "voteValue",
                format!("Vote value must be 1 or -1, got {}", other),
            )),
        }
    }
}

impl From<VoteValue> for i32 {
    fn from(value: VoteValue) -> Self {
        value.delta()
    }
}

/// What a vote is cast on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoteTarget {
    Annotation(Uuid),
    Reply(Uuid),
}

impl VoteTarget {
    pub fn id(&self) -> Uuid {
        match self {
            VoteTarget::Annotation(id) | VoteTarget::Reply(id) => *id,
        }
    }

    /// Entity name used in error messages and logs
    pub fn entity(&self) -> &'static str {
        match self {
            VoteTarget::Annotation(_) => "annotation",
            VoteTarget::Reply(_) => "reply",
        }
    }
}

/// A recorded vote
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Vote {
    pub id: Uuid,
    pub target_id: Uuid,
    pub user_id: Uuid,
    pub value: VoteValue,
}

/// Request body for the vote endpoints
///
/// The raw integer is kept so that out-of-range values are reported as
/// validation errors by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub vote_value: i32,
}
