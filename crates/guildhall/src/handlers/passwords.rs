//! Password reset through emailed link tokens.
//!
//! `POST /forgot-password` mails a link carrying a fresh link token;
//! `POST /reset-password` trades that token for a new password. Tokens are
//! single use and expire after `LINK_TOKEN_TTL_HOURS`.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use guildhall_auth::hash_password;
use guildhall_core::auth::{generate_token, is_link_token_expired, reset_link, LinkToken};
use guildhall_core::user::{ForgotPasswordRequest, ResetPasswordRequest};
use guildhall_core::validation::{validate_forgot_password, validate_reset_password};

use crate::handlers::ApiError;
use crate::mailer::Mail;
use crate::state::AppState;

/// Mail a password reset link (POST /forgot-password).
pub async fn forgot_password(
    State(state): State<AppState>,
    payload: Result<Json<ForgotPasswordRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(request) = payload?;
    let link = validate_forgot_password(&request)?;

    let user = state
        .users
        .get_user_by_email(&link.email)
        .await?
        .ok_or(ApiError::NotFound)?;

    let token = LinkToken {
        token: generate_token(),
        user_id: user.id,
        created_at: Utc::now(),
    };
    state.link_tokens.create_link_token(&token).await?;

    let mail = Mail::password_reset(&user, reset_link(&link.reset_password_url, &token.token));
    state.mailer.send(&mail).await;

    tracing::info!(user_id = %user.id, "Sent password reset link");

    Ok(StatusCode::NO_CONTENT)
}

/// Set a new password from a link token (POST /reset-password).
pub async fn reset_password(
    State(state): State<AppState>,
    payload: Result<Json<ResetPasswordRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(request) = payload?;
    let reset = validate_reset_password(&request)?;

    let token = state
        .link_tokens
        .get_link_token(&reset.token)
        .await?
        .ok_or(ApiError::NotFound)?;

    let now = Utc::now();
    if is_link_token_expired(&token, now, state.config.link_token_ttl()) {
        state.link_tokens.delete_link_token(&token.token).await?;
        return Err(ApiError::bad_request(StatusCode::GONE, "token has expired"));
    }

    let mut user = state
        .users
        .get_user(token.user_id)
        .await?
        .ok_or(ApiError::NotFound)?;
    user.password_hash = hash_password(&reset.password)?;
    user.updated_at = now;
    state.users.update_user(&user).await?;

    state.link_tokens.delete_link_token(&token.token).await?;
    // Sessions opened with the old password do not survive the reset
    state.auth.tokens.delete_user_tokens(user.id).await?;

    tracing::info!(user_id = %user.id, "Password reset");

    Ok(StatusCode::NO_CONTENT)
}
