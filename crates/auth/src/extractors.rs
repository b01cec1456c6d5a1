//! Axum extractors for authentication.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::Utc;
use guildhall_core::auth::{is_token_expired, AuthError as CoreError};
use guildhall_core::user::User;

use crate::error::AuthError;
use crate::AuthState;

/// Extractor for an authenticated user. Returns 401 if not authenticated.
///
/// Keeps the presented token so logout can revoke exactly that token.
pub struct CurrentUser {
    pub user: User,
    pub token: String,
}

/// Reads the token out of an `Authorization: Bearer <token>` header.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

impl<S> FromRequestParts<S> for CurrentUser
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);

        let token = bearer_token(parts).ok_or(CoreError::TokenNotFound)?;

        let api_token = auth_state
            .tokens
            .get_token(token)
            .await?
            .ok_or(CoreError::TokenNotFound)?;

        if is_token_expired(&api_token, Utc::now()) {
            return Err(CoreError::TokenExpired.into());
        }

        // A token can outlive its user only if storage is inconsistent.
        let user = auth_state
            .users
            .get_user(api_token.user_id)
            .await?
            .ok_or(CoreError::TokenNotFound)?;

        Ok(CurrentUser {
            user,
            token: api_token.token,
        })
    }
}
