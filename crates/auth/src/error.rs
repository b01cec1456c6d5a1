use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use guildhall_core::storage::{repository_error_to_status_code, RepositoryError};
use serde_json::{json, Value};
use thiserror::Error;

/// Auth errors for the guildhall_auth crate.
///
/// This wraps the core `AuthError` and adds the user lookup failures that
/// can't come from the functional core.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Error from the core auth module (credentials, token lookup, etc.)
    #[error(transparent)]
    Core(#[from] guildhall_core::auth::AuthError),

    /// User lookup failed
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Builds the `{code, message, status}` body shared by every error response.
pub fn error_body(code: &str, message: &str, status: StatusCode) -> Json<Value> {
    Json(json!({
        "code": code,
        "message": message,
        "status": status.as_u16(),
    }))
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        use guildhall_core::auth::AuthError as CoreError;

        let (status, code, message) = match &self {
            AuthError::Core(core_err) => match core_err {
                CoreError::InvalidCredentials => (
                    StatusCode::BAD_REQUEST,
                    "BAD_REQUEST",
                    "invalid credentials".to_string(),
                ),
                CoreError::TokenNotFound | CoreError::TokenExpired => (
                    StatusCode::UNAUTHORIZED,
                    "E_UNAUTHORIZED_ACCESS",
                    "unauthorized".to_string(),
                ),
                CoreError::Storage(_) | CoreError::Hash(_) => {
                    tracing::error!("Auth error: {}", self);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "Internal server error".to_string(),
                    )
                }
            },
            AuthError::Repository(err) => {
                tracing::error!("User lookup failed during auth: {}", err);
                let status = StatusCode::from_u16(repository_error_to_status_code(err))
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                (status, "INTERNAL_ERROR", err.to_string())
            }
        };

        (status, error_body(code, &message, status)).into_response()
    }
}
