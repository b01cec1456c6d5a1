//! Authorization rules for group actions.
//!
//! Every check is a pure function of the acting user and the group. Handlers
//! turn a failed check into a 403 through [`authorize`].

use guildhall_core::group::Group;
use guildhall_core::user::User;

use super::error::ApiError;

/// Group authorization checks.
pub struct GroupPolicy;

impl GroupPolicy {
    /// Only the master may edit a group.
    pub fn can_update_group(user: &User, group: &Group) -> bool {
        group.is_master(user.id)
    }

    /// Only the master may delete a group.
    pub fn can_delete_group(user: &User, group: &Group) -> bool {
        group.is_master(user.id)
    }

    /// Only the master may accept or discard join requests.
    pub fn can_moderate_requests(user: &User, group: &Group) -> bool {
        group.is_master(user.id)
    }
}

/// Turns a policy decision into a result, logging denials.
pub fn authorize(allowed: bool, user: &User, group: &Group) -> Result<(), ApiError> {
    if allowed {
        Ok(())
    } else {
        tracing::warn!(user_id = %user.id, group_id = %group.id, "Authorization denied");
        Err(ApiError::Forbidden)
    }
}
