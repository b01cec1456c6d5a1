//! The JSON error envelope returned by every handler.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use guildhall_auth::error_body;
use guildhall_core::group::GroupError;
use guildhall_core::storage::{repository_error_to_status_code, RepositoryError};
use guildhall_core::validation::{FieldError, ValidationErrors};

/// Handler error, rendered as `{code, message, status, errors?}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failure")]
    Validation(ValidationErrors),

    /// The body could not be read as JSON.
    #[error("{0}")]
    UnprocessableBody(String),

    #[error("resource not found")]
    NotFound,

    #[error("{message}")]
    BadRequest { status: StatusCode, message: String },

    #[error("not authorized to perform this action")]
    Forbidden,

    #[error(transparent)]
    Repository(RepositoryError),

    #[error(transparent)]
    Group(#[from] GroupError),

    #[error(transparent)]
    Auth(#[from] guildhall_auth::AuthError),
}

impl ApiError {
    pub fn bad_request(status: StatusCode, message: impl Into<String>) -> Self {
        Self::BadRequest {
            status,
            message: message.into(),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::UnprocessableBody(rejection.body_text())
    }
}

/// An ID that does not parse cannot name an existing row.
impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!(rejection = %rejection.body_text(), "Unparseable path parameter");
        Self::NotFound
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

/// Unique clashes from storage render like the handlers' own pre-checks.
impl From<RepositoryError> for ApiError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound { .. } => Self::NotFound,
            RepositoryError::AlreadyExists {
                entity_type: "User",
                field,
            } => Self::Validation(FieldError::unique(field).into()),
            RepositoryError::AlreadyExists {
                entity_type: "GroupRequest",
                field: "user_id",
            } => Self::Group(GroupError::RequestAlreadyExists),
            other => Self::Repository(other),
        }
    }
}

impl From<guildhall_core::auth::AuthError> for ApiError {
    fn from(error: guildhall_core::auth::AuthError) -> Self {
        Self::Auth(error.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();

        let (status, code) = match self {
            ApiError::Auth(error) => return error.into_response(),
            ApiError::Validation(errors) => {
                let status = StatusCode::UNPROCESSABLE_ENTITY;
                tracing::warn!(errors = errors.len(), "Validation failure");
                return (
                    status,
                    Json(json!({
                        "code": "BAD_REQUEST",
                        "message": message,
                        "status": status.as_u16(),
                        "errors": errors,
                    })),
                )
                    .into_response();
            }
            ApiError::UnprocessableBody(_) => (StatusCode::UNPROCESSABLE_ENTITY, "BAD_REQUEST"),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "BAD_REQUEST"),
            ApiError::BadRequest { status, .. } => (status, "BAD_REQUEST"),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, "E_AUTHORIZATION_FAILURE"),
            ApiError::Group(error) => (
                StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::BAD_REQUEST),
                "BAD_REQUEST",
            ),
            ApiError::Repository(error) => {
                tracing::error!(error = %error, "Repository error");
                (
                    StatusCode::from_u16(repository_error_to_status_code(&error))
                        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                    "INTERNAL_ERROR",
                )
            }
        };

        if status.is_client_error() {
            tracing::warn!(status = status.as_u16(), message = %message, "Request rejected");
        }

        (status, error_body(code, &message, status)).into_response()
    }
}
