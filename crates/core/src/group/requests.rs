//! API request types for group operations.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::serde::{deserialize_optional_string, deserialize_optional_u32, deserialize_optional_uuid};
use crate::storage::Pagination;

use super::filter::GroupFilter;
use super::types::Group;

/// Request payload for creating a new group (POST /groups).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupRequest {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub schedule: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub chronic: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub master_id: Option<Uuid>,
}

/// Request payload for updating a group (PATCH /groups/{id}).
///
/// Only the fields present in the body are merged; the master cannot be
/// changed through this request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateGroupRequest {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub schedule: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub chronic: Option<String>,
}

impl UpdateGroupRequest {
    /// Create an empty update request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the group name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the group description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Apply updates to an existing group.
    pub fn apply_to(self, group: &mut Group) {
        if let Some(name) = self.name {
            group.name = name;
        }
        if let Some(description) = self.description {
            group.description = description;
        }
        if let Some(schedule) = self.schedule {
            group.schedule = schedule;
        }
        if let Some(location) = self.location {
            group.location = location;
        }
        if let Some(chronic) = self.chronic {
            group.chronic = chronic;
        }
        group.updated_at = Utc::now();
    }
}

/// Query parameters for listing groups (GET /groups).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListGroupsQuery {
    /// Free text matched against name and description.
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub text: Option<String>,
    /// Only groups this user plays in.
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub user: Option<Uuid>,
    #[serde(default, deserialize_with = "deserialize_optional_u32")]
    pub page: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_optional_u32")]
    pub limit: Option<u32>,
}

impl ListGroupsQuery {
    /// Splits the query into its filter and pagination parts.
    pub fn into_parts(self) -> (GroupFilter, Pagination) {
        let filter = GroupFilter {
            user: self.user,
            text: self.text,
        };
        (filter, Pagination::new(self.page, self.limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_group_request_reads_master_id() {
        let json = r#"{
            "name": "Group",
            "description": "desc",
            "schedule": "Mondays",
            "location": "Discord",
            "chronic": "Eberron",
            "masterId": "550e8400-e29b-41d4-a716-446655440000"
        }"#;
        let request: CreateGroupRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.name.as_deref(), Some("Group"));
        assert_eq!(
            request.master_id,
            Some(Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap())
        );
    }

    #[test]
    fn test_update_group_merges_only_present_fields() {
        let mut group = Group::new("Old", Uuid::new_v4())
            .with_description("old description")
            .with_location("Tavern");
        let master_id = group.master_id;

        UpdateGroupRequest::new()
            .with_name("New")
            .with_description("new description")
            .apply_to(&mut group);

        assert_eq!(group.name, "New");
        assert_eq!(group.description, "new description");
        assert_eq!(group.location, "Tavern");
        assert_eq!(group.master_id, master_id);
    }

    #[test]
    fn test_update_group_ignores_master_id_in_body() {
        let json = r#"{"name": "Renamed", "masterId": "550e8400-e29b-41d4-a716-446655440000"}"#;
        let request: UpdateGroupRequest = serde_json::from_str(json).unwrap();
        let mut group = Group::new("Old", Uuid::new_v4());
        let master_id = group.master_id;

        request.apply_to(&mut group);

        assert_eq!(group.name, "Renamed");
        assert_eq!(group.master_id, master_id);
    }

    #[test]
    fn test_list_groups_query_defaults() {
        let (filter, pagination) = ListGroupsQuery::default().into_parts();

        assert!(filter.user.is_none());
        assert!(filter.text.is_none());
        assert_eq!(pagination.page(), 1);
        assert_eq!(pagination.limit(), 5);
    }
}
