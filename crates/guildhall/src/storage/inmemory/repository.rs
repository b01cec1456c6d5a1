//! In-memory repository implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use guildhall_core::group::{Group, GroupFilter};
use guildhall_core::group_request::{GroupRequest, GroupRequestDetails};
use guildhall_core::storage::{
    paginate, GroupRepository, GroupRequestRepository, MembershipRepository, Paginated,
    Pagination, RepositoryError, Result, UserRepository,
};
use guildhall_core::user::User;

/// In-memory storage backend.
///
/// Uses HashMaps wrapped in `Arc<RwLock<_>>` for thread-safe access.
/// Data is not persisted and will be lost when the repository is dropped.
///
/// Locks are always taken in field order to avoid deadlocks.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    groups: Arc<RwLock<HashMap<Uuid, Group>>>,
    /// Player IDs per group, in the order they joined.
    players: Arc<RwLock<HashMap<Uuid, Vec<Uuid>>>>,
    group_requests: Arc<RwLock<HashMap<Uuid, GroupRequest>>>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_found(entity_type: &'static str, id: Uuid) -> RepositoryError {
    RepositoryError::NotFound {
        entity_type,
        id: id.to_string(),
    }
}

fn taken(entity_type: &'static str, field: &'static str) -> RepositoryError {
    RepositoryError::AlreadyExists { entity_type, field }
}

/// Username is checked before email, matching the order the columns are
/// declared in the SQLite schema.
fn clashing_user_field<'a>(
    mut others: impl Iterator<Item = &'a User>,
    user: &User,
) -> Option<&'static str> {
    others.find_map(|u| {
        if u.username == user.username {
            Some("username")
        } else if u.email == user.email {
            Some("email")
        } else {
            None
        }
    })
}

// ============================================================================
// UserRepository implementation
// ============================================================================

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn create_user(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) {
            return Err(taken("User", "id"));
        }
        if let Some(field) = clashing_user_field(users.values(), user) {
            return Err(taken("User", field));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Err(not_found("User", user.id));
        }
        if let Some(field) = clashing_user_field(users.values().filter(|u| u.id != user.id), user)
        {
            return Err(taken("User", field));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }
}

// ============================================================================
// GroupRepository implementation
// ============================================================================

#[async_trait]
impl GroupRepository for InMemoryRepository {
    async fn get_group(&self, id: Uuid) -> Result<Option<Group>> {
        let groups = self.groups.read().await;
        Ok(groups.get(&id).cloned())
    }

    async fn list_groups(
        &self,
        filter: &GroupFilter,
        pagination: Pagination,
    ) -> Result<Paginated<Group>> {
        let groups = self.groups.read().await;
        let players = self.players.read().await;

        let mut matching: Vec<Group> = groups
            .values()
            .filter(|group| {
                let player_ids = players
                    .get(&group.id)
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                filter.matches(group, player_ids)
            })
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        Ok(paginate(matching, pagination))
    }

    async fn create_group(&self, group: &Group) -> Result<()> {
        let users = self.users.read().await;
        let mut groups = self.groups.write().await;
        if groups.contains_key(&group.id) {
            return Err(taken("Group", "id"));
        }
        if !users.contains_key(&group.master_id) {
            return Err(RepositoryError::InvalidData(format!(
                "master {} does not exist",
                group.master_id
            )));
        }
        groups.insert(group.id, group.clone());
        Ok(())
    }

    async fn update_group(&self, group: &Group) -> Result<()> {
        let mut groups = self.groups.write().await;
        match groups.get_mut(&group.id) {
            Some(existing) => {
                *existing = group.clone();
                Ok(())
            }
            None => Err(not_found("Group", group.id)),
        }
    }

    async fn delete_group(&self, id: Uuid) -> Result<()> {
        let mut groups = self.groups.write().await;
        let mut players = self.players.write().await;
        let mut group_requests = self.group_requests.write().await;

        if groups.remove(&id).is_none() {
            return Err(not_found("Group", id));
        }
        players.remove(&id);
        group_requests.retain(|_, r| r.group_id != id);
        Ok(())
    }
}

// ============================================================================
// MembershipRepository implementation
// ============================================================================

#[async_trait]
impl MembershipRepository for InMemoryRepository {
    async fn add_player(&self, group_id: Uuid, user_id: Uuid) -> Result<()> {
        let users = self.users.read().await;
        let groups = self.groups.read().await;
        let mut players = self.players.write().await;

        if !groups.contains_key(&group_id) || !users.contains_key(&user_id) {
            return Err(RepositoryError::InvalidData(format!(
                "cannot attach user {user_id} to group {group_id}"
            )));
        }

        let group_players = players.entry(group_id).or_default();
        if !group_players.contains(&user_id) {
            group_players.push(user_id);
        }
        Ok(())
    }

    async fn remove_player(&self, group_id: Uuid, user_id: Uuid) -> Result<()> {
        let mut players = self.players.write().await;
        if let Some(group_players) = players.get_mut(&group_id) {
            group_players.retain(|id| *id != user_id);
        }
        Ok(())
    }

    async fn is_player(&self, group_id: Uuid, user_id: Uuid) -> Result<bool> {
        let players = self.players.read().await;
        Ok(players
            .get(&group_id)
            .is_some_and(|group_players| group_players.contains(&user_id)))
    }

    async fn get_players(&self, group_id: Uuid) -> Result<Vec<User>> {
        let users = self.users.read().await;
        let players = self.players.read().await;

        Ok(players
            .get(&group_id)
            .map(|ids| ids.iter().filter_map(|id| users.get(id).cloned()).collect())
            .unwrap_or_default())
    }
}

// ============================================================================
// GroupRequestRepository implementation
// ============================================================================

#[async_trait]
impl GroupRequestRepository for InMemoryRepository {
    async fn get_group_request(&self, id: Uuid) -> Result<Option<GroupRequest>> {
        let group_requests = self.group_requests.read().await;
        Ok(group_requests.get(&id).cloned())
    }

    async fn find_group_request(
        &self,
        group_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<GroupRequest>> {
        let group_requests = self.group_requests.read().await;
        Ok(group_requests
            .values()
            .find(|r| r.group_id == group_id && r.user_id == user_id)
            .cloned())
    }

    async fn list_pending_for_master(&self, master_id: Uuid) -> Result<Vec<GroupRequestDetails>> {
        let users = self.users.read().await;
        let groups = self.groups.read().await;
        let group_requests = self.group_requests.read().await;

        let mut pending: Vec<&GroupRequest> = group_requests
            .values()
            .filter(|r| r.is_pending())
            .collect();
        pending.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        Ok(pending
            .into_iter()
            .filter_map(|request| {
                let group = groups.get(&request.group_id)?;
                if !group.is_master(master_id) {
                    return None;
                }
                let user = users.get(&request.user_id)?;
                Some(GroupRequestDetails::new(request, group, user))
            })
            .collect())
    }

    async fn create_group_request(&self, request: &GroupRequest) -> Result<()> {
        let users = self.users.read().await;
        let groups = self.groups.read().await;
        let mut group_requests = self.group_requests.write().await;

        if !groups.contains_key(&request.group_id) || !users.contains_key(&request.user_id) {
            return Err(RepositoryError::InvalidData(format!(
                "group request references unknown group {} or user {}",
                request.group_id, request.user_id
            )));
        }
        if group_requests.contains_key(&request.id) {
            return Err(taken("GroupRequest", "id"));
        }
        if group_requests
            .values()
            .any(|r| r.group_id == request.group_id && r.user_id == request.user_id)
        {
            return Err(taken("GroupRequest", "user_id"));
        }
        group_requests.insert(request.id, request.clone());
        Ok(())
    }

    async fn update_group_request(&self, request: &GroupRequest) -> Result<()> {
        let mut group_requests = self.group_requests.write().await;
        match group_requests.get_mut(&request.id) {
            Some(existing) => {
                *existing = request.clone();
                Ok(())
            }
            None => Err(not_found("GroupRequest", request.id)),
        }
    }

    async fn delete_group_request(&self, id: Uuid) -> Result<()> {
        let mut group_requests = self.group_requests.write().await;
        group_requests
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found("GroupRequest", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guildhall_core::group_request::GroupRequestStatus;

    async fn seed_user(repo: &InMemoryRepository, username: &str) -> User {
        let user = User::new(username, format!("{username}@example.com"), "hash");
        repo.create_user(&user).await.unwrap();
        user
    }

    async fn seed_group(repo: &InMemoryRepository, name: &str, master: &User) -> Group {
        let group = Group::new(name, master.id).with_description(format!("{name} description"));
        repo.create_group(&group).await.unwrap();
        repo.add_player(group.id, master.id).await.unwrap();
        group
    }

    // ==================== User Tests ====================

    #[tokio::test]
    async fn test_user_create_and_lookup() {
        let repo = InMemoryRepository::new();
        let user = seed_user(&repo, "alice").await;

        assert_eq!(repo.get_user(user.id).await.unwrap(), Some(user.clone()));
        assert_eq!(
            repo.get_user_by_email("alice@example.com").await.unwrap(),
            Some(user.clone())
        );
        assert_eq!(
            repo.get_user_by_username("alice").await.unwrap(),
            Some(user)
        );
        assert!(repo.get_user(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_user_unique_email_and_username() {
        let repo = InMemoryRepository::new();
        seed_user(&repo, "alice").await;

        let same_email = User::new("other", "alice@example.com", "hash");
        let result = repo.create_user(&same_email).await;
        assert!(matches!(
            result,
            Err(RepositoryError::AlreadyExists { field: "email", .. })
        ));

        let same_username = User::new("alice", "other@example.com", "hash");
        let result = repo.create_user(&same_username).await;
        assert!(matches!(
            result,
            Err(RepositoryError::AlreadyExists {
                field: "username",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_user_update() {
        let repo = InMemoryRepository::new();
        let mut user = seed_user(&repo, "alice").await;

        user.email = "new@example.com".to_string();
        repo.update_user(&user).await.unwrap();

        let retrieved = repo.get_user(user.id).await.unwrap().unwrap();
        assert_eq!(retrieved.email, "new@example.com");
    }

    #[tokio::test]
    async fn test_user_update_nonexistent() {
        let repo = InMemoryRepository::new();
        let user = User::new("ghost", "ghost@example.com", "hash");

        let result = repo.update_user(&user).await;
        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
    }

    // ==================== Group Tests ====================

    #[tokio::test]
    async fn test_group_requires_existing_master() {
        let repo = InMemoryRepository::new();
        let group = Group::new("Orphan", Uuid::new_v4());

        let result = repo.create_group(&group).await;
        assert!(matches!(result, Err(RepositoryError::InvalidData(_))));
    }

    #[tokio::test]
    async fn test_list_groups_filters_and_paginates() {
        let repo = InMemoryRepository::new();
        let master = seed_user(&repo, "master").await;
        let player = seed_user(&repo, "player").await;

        let dungeon = seed_group(&repo, "Dungeon", &master).await;
        seed_group(&repo, "Dragons", &master).await;
        seed_group(&repo, "Cyberpunk", &master).await;
        repo.add_player(dungeon.id, player.id).await.unwrap();

        let all = repo
            .list_groups(&GroupFilter::all(), Pagination::default())
            .await
            .unwrap();
        assert_eq!(all.meta.total, 3);

        let by_player = repo
            .list_groups(&GroupFilter::all().with_player(player.id), Pagination::default())
            .await
            .unwrap();
        assert_eq!(by_player.data, vec![dungeon.clone()]);

        let by_text = repo
            .list_groups(&GroupFilter::all().with_text("dr"), Pagination::default())
            .await
            .unwrap();
        assert_eq!(by_text.meta.total, 1);
        assert_eq!(by_text.data[0].name, "Dragons");

        let second_page = repo
            .list_groups(&GroupFilter::all(), Pagination::new(Some(2), Some(2)))
            .await
            .unwrap();
        assert_eq!(second_page.data.len(), 1);
        assert_eq!(second_page.meta.last_page, 2);
    }

    #[tokio::test]
    async fn test_list_groups_text_filter_folds_non_ascii_case() {
        let repo = InMemoryRepository::new();
        let master = seed_user(&repo, "master").await;
        let night = seed_group(&repo, "AÇÃO Noturna", &master).await;
        seed_group(&repo, "Acao Diurna", &master).await;

        let found = repo
            .list_groups(&GroupFilter::all().with_text("ação"), Pagination::default())
            .await
            .unwrap();

        assert_eq!(found.meta.total, 1);
        assert_eq!(found.data[0].id, night.id);
    }

    #[tokio::test]
    async fn test_delete_group_cascades() {
        let repo = InMemoryRepository::new();
        let master = seed_user(&repo, "master").await;
        let player = seed_user(&repo, "player").await;
        let group = seed_group(&repo, "Dungeon", &master).await;
        let request = GroupRequest::new(group.id, player.id);
        repo.create_group_request(&request).await.unwrap();

        repo.delete_group(group.id).await.unwrap();

        assert!(repo.get_group(group.id).await.unwrap().is_none());
        assert!(repo.get_players(group.id).await.unwrap().is_empty());
        assert!(repo.get_group_request(request.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_group_nonexistent() {
        let repo = InMemoryRepository::new();
        let result = repo.delete_group(Uuid::new_v4()).await;
        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
    }

    // ==================== Membership Tests ====================

    #[tokio::test]
    async fn test_players_attach_and_detach() {
        let repo = InMemoryRepository::new();
        let master = seed_user(&repo, "master").await;
        let player = seed_user(&repo, "player").await;
        let group = seed_group(&repo, "Dungeon", &master).await;

        repo.add_player(group.id, player.id).await.unwrap();
        // Attaching twice keeps a single row
        repo.add_player(group.id, player.id).await.unwrap();

        let players = repo.get_players(group.id).await.unwrap();
        assert_eq!(players.len(), 2);
        assert_eq!(players[0].id, master.id);
        assert!(repo.is_player(group.id, player.id).await.unwrap());

        repo.remove_player(group.id, player.id).await.unwrap();
        assert!(!repo.is_player(group.id, player.id).await.unwrap());
    }

    // ==================== Group Request Tests ====================

    #[tokio::test]
    async fn test_group_request_unique_per_user_and_group() {
        let repo = InMemoryRepository::new();
        let master = seed_user(&repo, "master").await;
        let player = seed_user(&repo, "player").await;
        let group = seed_group(&repo, "Dungeon", &master).await;

        repo.create_group_request(&GroupRequest::new(group.id, player.id))
            .await
            .unwrap();
        let result = repo
            .create_group_request(&GroupRequest::new(group.id, player.id))
            .await;

        assert!(matches!(
            result,
            Err(RepositoryError::AlreadyExists {
                entity_type: "GroupRequest",
                field: "user_id",
            })
        ));
        assert!(repo
            .find_group_request(group.id, player.id)
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_list_pending_for_master() {
        let repo = InMemoryRepository::new();
        let master = seed_user(&repo, "master").await;
        let other_master = seed_user(&repo, "other").await;
        let player = seed_user(&repo, "player").await;
        let group = seed_group(&repo, "Dungeon", &master).await;
        let other_group = seed_group(&repo, "Elsewhere", &other_master).await;

        let pending = GroupRequest::new(group.id, player.id);
        repo.create_group_request(&pending).await.unwrap();
        repo.create_group_request(&GroupRequest::new(other_group.id, player.id))
            .await
            .unwrap();
        let mut accepted = GroupRequest::new(group.id, other_master.id);
        repo.create_group_request(&accepted).await.unwrap();
        accepted.accept();
        repo.update_group_request(&accepted).await.unwrap();

        let listed = repo.list_pending_for_master(master.id).await.unwrap();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, pending.id);
        assert_eq!(listed[0].status, GroupRequestStatus::Pending);
        assert_eq!(listed[0].group.name, "Dungeon");
        assert_eq!(listed[0].group.master_id, master.id);
        assert_eq!(listed[0].user.username, "player");
    }

    #[tokio::test]
    async fn test_group_request_delete() {
        let repo = InMemoryRepository::new();
        let master = seed_user(&repo, "master").await;
        let player = seed_user(&repo, "player").await;
        let group = seed_group(&repo, "Dungeon", &master).await;
        let request = GroupRequest::new(group.id, player.id);
        repo.create_group_request(&request).await.unwrap();

        repo.delete_group_request(request.id).await.unwrap();

        assert!(repo.get_group_request(request.id).await.unwrap().is_none());
        let result = repo.delete_group_request(request.id).await;
        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
    }

    // ==================== Clone Tests ====================

    #[tokio::test]
    async fn test_clone_shares_state() {
        let repo = InMemoryRepository::new();
        let clone = repo.clone();

        let user = seed_user(&repo, "alice").await;

        assert!(clone.get_user(user.id).await.unwrap().is_some());
    }
}
