use thiserror::Error;

/// Errors raised by group membership rules.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GroupError {
    #[error("cannot remove master from group")]
    CannotRemoveMaster,
    #[error("group request already exists")]
    RequestAlreadyExists,
    #[error("user is already in the group")]
    AlreadyInGroup,
}

impl GroupError {
    /// HTTP status reported for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            GroupError::CannotRemoveMaster => 400,
            GroupError::RequestAlreadyExists => 409,
            GroupError::AlreadyInGroup => 422,
        }
    }
}
