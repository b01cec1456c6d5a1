use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("token not found")]
    TokenNotFound,

    #[error("token expired")]
    TokenExpired,

    #[error("storage error: {0}")]
    Storage(String),

    #[error("password hashing failed: {0}")]
    Hash(String),
}
