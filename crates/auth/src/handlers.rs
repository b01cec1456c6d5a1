//! HTTP handlers for auth routes.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use chrono::Utc;
use guildhall_core::auth::{
    calculate_expiry, generate_token, ApiToken, AuthError as CoreError, TokenResponse,
};
use guildhall_core::serde::deserialize_optional_string;
use guildhall_core::user::User;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::AuthError;
use crate::extractors::CurrentUser;
use crate::password::verify_password;
use crate::AuthState;

/// Name given to every token issued by login.
pub const TOKEN_NAME: &str = "Opaque Access Token";

/// Login credentials.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LoginRequest {
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
struct LoginResponse {
    user: User,
    token: TokenResponse,
}

/// Creates the auth router.
///
/// Routes:
/// - `POST /sessions` - Log in with email and password, returns a bearer token
/// - `DELETE /sessions` - Revoke the presented bearer token
pub fn auth_routes() -> Router<AuthState> {
    Router::new().route("/sessions", post(login).delete(logout))
}

async fn login(
    State(state): State<AuthState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<LoginResponse>), AuthError> {
    // An unreadable body is reported the same way as missing credentials.
    let Json(credentials) = body.map_err(|_| CoreError::InvalidCredentials)?;
    let (Some(email), Some(password)) = (credentials.email, credentials.password) else {
        return Err(CoreError::InvalidCredentials.into());
    };

    let user = state
        .users
        .get_user_by_email(&email)
        .await?
        .filter(|user| verify_password(&user.password_hash, &password))
        .ok_or_else(|| {
            tracing::warn!(email = %email, "Rejected login attempt");
            CoreError::InvalidCredentials
        })?;

    let now = Utc::now();
    let token = ApiToken {
        token: generate_token(),
        user_id: user.id,
        name: TOKEN_NAME.to_string(),
        created_at: now,
        expires_at: calculate_expiry(now, state.config.token_ttl()),
    };
    state.tokens.create_token(&token).await?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok((
        StatusCode::CREATED,
        Json(LoginResponse {
            token: TokenResponse::from(&token),
            user,
        }),
    ))
}

async fn logout(
    State(state): State<AuthState>,
    current: CurrentUser,
) -> Result<Json<Value>, AuthError> {
    state.tokens.delete_token(&current.token).await?;

    tracing::info!(user_id = %current.user.id, "User logged out");

    Ok(Json(json!({})))
}
