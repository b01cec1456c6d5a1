//! User registration and profile updates.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use guildhall_auth::{hash_password, CurrentUser};
use guildhall_core::user::{CreateUserRequest, UpdateUserRequest, User};
use guildhall_core::validation::{
    validate_create_user, validate_update_user, FieldError, ValidationErrors,
};

use crate::handlers::ApiError;
use crate::state::AppState;

/// Register a new user (POST /users).
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(request) = payload?;
    let new_user = validate_create_user(&request)?;

    let mut errors = ValidationErrors::new();
    if state
        .users
        .get_user_by_username(&new_user.username)
        .await?
        .is_some()
    {
        errors.push(FieldError::unique("username"));
    }
    if state.users.get_user_by_email(&new_user.email).await?.is_some() {
        errors.push(FieldError::unique("email"));
    }
    errors.into_result()?;

    let password_hash = hash_password(&new_user.password)?;
    let user = User::new(new_user.username, new_user.email, password_hash);
    state.users.create_user(&user).await?;

    tracing::info!(user_id = %user.id, username = %user.username, "Created new user");

    Ok((StatusCode::CREATED, Json(json!({ "user": user }))))
}

/// Update a user's email, password and avatar (PUT /users/{id}).
pub async fn update_user(
    State(state): State<AppState>,
    current: CurrentUser,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(id) = path?;
    let Json(request) = payload?;
    let changes = validate_update_user(&request)?;

    let mut user = state.users.get_user(id).await?.ok_or(ApiError::NotFound)?;

    if let Some(owner) = state.users.get_user_by_email(&changes.email).await? {
        if owner.id != user.id {
            return Err(ValidationErrors::from(FieldError::unique("email")).into());
        }
    }

    let password_hash = hash_password(&changes.password)?;
    changes.apply_to(&mut user, password_hash);
    state.users.update_user(&user).await?;

    tracing::info!(user_id = %user.id, updated_by = %current.user.id, "Updated user");

    Ok(Json(json!({ "user": user })))
}
