use async_trait::async_trait;
use uuid::Uuid;

use crate::group::{Group, GroupFilter};
use crate::group_request::{GroupRequest, GroupRequestDetails};
use crate::user::User;

use super::{Paginated, Pagination, Result};

/// Repository for user operations.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Gets a user by their ID.
    async fn get_user(&self, id: Uuid) -> Result<Option<User>>;

    /// Gets a user by their email address.
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Gets a user by their username.
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Creates a new user. Fails with `AlreadyExists` if the username or
    /// email is taken.
    async fn create_user(&self, user: &User) -> Result<()>;

    /// Updates an existing user.
    async fn update_user(&self, user: &User) -> Result<()>;
}

/// Repository for group operations.
#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// Gets a group by its ID.
    async fn get_group(&self, id: Uuid) -> Result<Option<Group>>;

    /// Lists the groups matching `filter`, one page at a time, oldest first.
    async fn list_groups(
        &self,
        filter: &GroupFilter,
        pagination: Pagination,
    ) -> Result<Paginated<Group>>;

    /// Creates a new group. Does not attach the master as a player.
    async fn create_group(&self, group: &Group) -> Result<()>;

    /// Updates an existing group.
    async fn update_group(&self, group: &Group) -> Result<()>;

    /// Deletes a group along with its players and join requests.
    async fn delete_group(&self, id: Uuid) -> Result<()>;
}

/// Repository for the players of a group.
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    /// Attaches a user to a group. Attaching an existing player is a no-op.
    async fn add_player(&self, group_id: Uuid, user_id: Uuid) -> Result<()>;

    /// Detaches a user from a group.
    async fn remove_player(&self, group_id: Uuid, user_id: Uuid) -> Result<()>;

    /// Returns true if the user plays in the group.
    async fn is_player(&self, group_id: Uuid, user_id: Uuid) -> Result<bool>;

    /// Gets every player of a group, in the order they joined.
    async fn get_players(&self, group_id: Uuid) -> Result<Vec<User>>;
}

/// Repository for group join requests.
#[async_trait]
pub trait GroupRequestRepository: Send + Sync {
    /// Gets a request by its ID.
    async fn get_group_request(&self, id: Uuid) -> Result<Option<GroupRequest>>;

    /// Gets the request a user made for a group, whatever its status.
    async fn find_group_request(
        &self,
        group_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<GroupRequest>>;

    /// Lists the pending requests of every group mastered by `master_id`.
    async fn list_pending_for_master(&self, master_id: Uuid) -> Result<Vec<GroupRequestDetails>>;

    /// Creates a new request. Fails with `AlreadyExists` if the user
    /// already has a request for the group.
    async fn create_group_request(&self, request: &GroupRequest) -> Result<()>;

    /// Updates an existing request.
    async fn update_group_request(&self, request: &GroupRequest) -> Result<()>;

    /// Deletes a request by its ID.
    async fn delete_group_request(&self, id: Uuid) -> Result<()>;
}
