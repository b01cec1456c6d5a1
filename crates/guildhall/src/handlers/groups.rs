//! Group listing, creation, editing and player removal.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use guildhall_auth::CurrentUser;
use guildhall_core::group::{
    CreateGroupRequest, Group, GroupDetails, GroupError, ListGroupsQuery, UpdateGroupRequest,
};
use guildhall_core::storage::Paginated;
use guildhall_core::validation::validate_create_group;

use crate::handlers::policy::{authorize, GroupPolicy};
use crate::handlers::ApiError;
use crate::state::AppState;

/// Finds a group or fails with 404.
pub(crate) async fn find_group(state: &AppState, id: Uuid) -> Result<Group, ApiError> {
    state.groups.get_group(id).await?.ok_or(ApiError::NotFound)
}

/// Loads the players of a group and assembles its details.
async fn with_players(state: &AppState, group: Group) -> Result<GroupDetails, ApiError> {
    let players = state.memberships.get_players(group.id).await?;
    Ok(GroupDetails::new(group, players))
}

/// List groups, filtered by player and free text (GET /groups).
pub async fn list_groups(
    State(state): State<AppState>,
    _current: CurrentUser,
    query: Result<Query<ListGroupsQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(query) = query?;
    let (filter, pagination) = query.into_parts();

    let Paginated { meta, data } = state.groups.list_groups(&filter, pagination).await?;

    let mut groups = Vec::with_capacity(data.len());
    for group in data {
        groups.push(with_players(&state, group).await?);
    }

    Ok(Json(json!({ "groups": Paginated { meta, data: groups } })))
}

/// Create a group and make its master the first player (POST /groups).
pub async fn create_group(
    State(state): State<AppState>,
    _current: CurrentUser,
    payload: Result<Json<CreateGroupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(request) = payload?;
    let group = validate_create_group(&request)?;

    state
        .users
        .get_user(group.master_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    state.groups.create_group(&group).await?;
    state
        .memberships
        .add_player(group.id, group.master_id)
        .await?;

    tracing::info!(group_id = %group.id, master_id = %group.master_id, "Created new group");

    let group = with_players(&state, group).await?;
    Ok((StatusCode::CREATED, Json(json!({ "group": group }))))
}

/// Edit a group (PATCH /groups/{id}). Master only.
pub async fn update_group(
    State(state): State<AppState>,
    current: CurrentUser,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateGroupRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(id) = path?;
    let Json(request) = payload?;

    let mut group = find_group(&state, id).await?;
    authorize(
        GroupPolicy::can_update_group(&current.user, &group),
        &current.user,
        &group,
    )?;

    request.apply_to(&mut group);
    state.groups.update_group(&group).await?;

    tracing::info!(group_id = %id, "Updated group");

    Ok(Json(json!({ "group": group })))
}

/// Remove a player from a group (DELETE /groups/{groupId}/players/{playerId}).
///
/// The master can never be removed.
pub async fn remove_player(
    State(state): State<AppState>,
    current: CurrentUser,
    path: Result<Path<(Uuid, Uuid)>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path((group_id, player_id)) = path?;
    let group = find_group(&state, group_id).await?;

    if group.is_master(player_id) {
        return Err(GroupError::CannotRemoveMaster.into());
    }

    state.memberships.remove_player(group.id, player_id).await?;

    tracing::info!(
        group_id = %group.id,
        player_id = %player_id,
        removed_by = %current.user.id,
        "Removed player from group"
    );

    Ok(Json(json!({})))
}

/// Delete a group with its players and requests (DELETE /groups/{id}). Master only.
pub async fn delete_group(
    State(state): State<AppState>,
    current: CurrentUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(id) = path?;
    let group = find_group(&state, id).await?;
    authorize(
        GroupPolicy::can_delete_group(&current.user, &group),
        &current.user,
        &group,
    )?;

    state.groups.delete_group(group.id).await?;

    tracing::info!(group_id = %id, "Deleted group");

    Ok(Json(json!({})))
}
