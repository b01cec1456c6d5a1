use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::group::{Group, GroupSummary};
use crate::user::{User, UserSummary};

/// Lifecycle of a request to join a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GroupRequestStatus {
    Pending,
    Accepted,
}

impl GroupRequestStatus {
    /// Stable storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupRequestStatus::Pending => "PENDING",
            GroupRequestStatus::Accepted => "ACCEPTED",
        }
    }

    /// Parses the storage representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(GroupRequestStatus::Pending),
            "ACCEPTED" => Some(GroupRequestStatus::Accepted),
            _ => None,
        }
    }
}

impl std::fmt::Display for GroupRequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user's request to join a group, moderated by the group's master.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRequest {
    pub id: Uuid,
    #[serde(rename = "groupId")]
    pub group_id: Uuid,
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub status: GroupRequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GroupRequest {
    /// Creates a new pending request.
    pub fn new(group_id: Uuid, user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            group_id,
            user_id,
            status: GroupRequestStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Marks the request as accepted.
    pub fn accept(&mut self) {
        self.status = GroupRequestStatus::Accepted;
        self.updated_at = Utc::now();
    }

    /// Returns true while the master has not acted on the request.
    pub fn is_pending(&self) -> bool {
        self.status == GroupRequestStatus::Pending
    }
}

/// A pending request with the group and requesting user preloaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRequestDetails {
    pub id: Uuid,
    #[serde(rename = "groupId")]
    pub group_id: Uuid,
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub status: GroupRequestStatus,
    pub group: GroupSummary,
    pub user: UserSummary,
}

impl GroupRequestDetails {
    /// Assembles the listing view of a request.
    pub fn new(request: &GroupRequest, group: &Group, user: &User) -> Self {
        Self {
            id: request.id,
            group_id: request.group_id,
            user_id: request.user_id,
            status: request.status,
            group: GroupSummary::from(group),
            user: UserSummary::from(user),
        }
    }
}
