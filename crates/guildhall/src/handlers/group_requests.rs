//! Requests to join a group, moderated by the group's master.

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use guildhall_auth::CurrentUser;
use guildhall_core::group::GroupError;
use guildhall_core::group_request::{GroupRequest, ListGroupRequestsQuery};
use guildhall_core::validation::{FieldError, Rule, ValidationErrors};

use crate::handlers::groups::find_group;
use crate::handlers::policy::{authorize, GroupPolicy};
use crate::handlers::ApiError;
use crate::state::AppState;

/// Finds a request of the given group or fails with 404.
async fn find_request(
    state: &AppState,
    group_id: Uuid,
    request_id: Uuid,
) -> Result<GroupRequest, ApiError> {
    state
        .group_requests
        .get_group_request(request_id)
        .await?
        .filter(|request| request.group_id == group_id)
        .ok_or(ApiError::NotFound)
}

/// List pending requests for every group of a master (GET /group-requests?master=).
pub async fn list_group_requests(
    State(state): State<AppState>,
    _current: CurrentUser,
    query: Result<Query<ListGroupRequestsQuery>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(query) = query?;
    let master = query.master.ok_or_else(|| {
        ValidationErrors::from(FieldError::new(
            Rule::Required,
            "master",
            "required validation failed",
        ))
    })?;

    let requests = state.group_requests.list_pending_for_master(master).await?;

    Ok(Json(json!({ "groupRequests": requests })))
}

/// Ask to join a group (POST /groups/{groupId}/requests).
pub async fn create_group_request(
    State(state): State<AppState>,
    current: CurrentUser,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Path(group_id) = path?;
    let group = find_group(&state, group_id).await?;
    let user_id = current.user.id;

    if state
        .group_requests
        .find_group_request(group.id, user_id)
        .await?
        .is_some()
    {
        return Err(GroupError::RequestAlreadyExists.into());
    }
    if state.memberships.is_player(group.id, user_id).await? {
        return Err(GroupError::AlreadyInGroup.into());
    }

    let request = GroupRequest::new(group.id, user_id);
    state.group_requests.create_group_request(&request).await?;

    tracing::info!(request_id = %request.id, group_id = %group.id, user_id = %user_id, "Created group request");

    Ok((StatusCode::CREATED, Json(json!({ "groupRequest": request }))))
}

/// Accept a request and add its user to the group
/// (POST /groups/{groupId}/requests/{requestId}/accept). Master only.
pub async fn accept_group_request(
    State(state): State<AppState>,
    current: CurrentUser,
    path: Result<Path<(Uuid, Uuid)>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path((group_id, request_id)) = path?;
    let mut request = find_request(&state, group_id, request_id).await?;
    let group = find_group(&state, group_id).await?;
    authorize(
        GroupPolicy::can_moderate_requests(&current.user, &group),
        &current.user,
        &group,
    )?;

    request.accept();
    state.group_requests.update_group_request(&request).await?;
    state
        .memberships
        .add_player(group.id, request.user_id)
        .await?;

    tracing::info!(request_id = %request.id, group_id = %group.id, "Accepted group request");

    Ok(Json(json!({ "groupRequest": request })))
}

/// Discard a request (DELETE /groups/{groupId}/requests/{requestId}). Master only.
pub async fn delete_group_request(
    State(state): State<AppState>,
    current: CurrentUser,
    path: Result<Path<(Uuid, Uuid)>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path((group_id, request_id)) = path?;
    let request = find_request(&state, group_id, request_id).await?;
    let group = find_group(&state, group_id).await?;
    authorize(
        GroupPolicy::can_moderate_requests(&current.user, &group),
        &current.user,
        &group,
    )?;

    state.group_requests.delete_group_request(request.id).await?;

    tracing::info!(request_id = %request.id, group_id = %group.id, "Deleted group request");

    Ok(Json(json!({})))
}
