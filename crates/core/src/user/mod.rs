mod requests;
mod types;

pub use requests::{
    CreateUserRequest, ForgotPasswordRequest, ResetPasswordRequest, UpdateUserRequest,
};
pub use types::{User, UserSummary};
