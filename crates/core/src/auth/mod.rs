mod error;
mod functions;
mod traits;
mod types;

pub use error::AuthError;
pub use functions::{
    calculate_expiry, generate_token, is_link_token_expired, is_token_expired, reset_link,
    TOKEN_LENGTH,
};
pub use traits::{LinkTokenRepository, Result, TokenRepository};
pub use types::{ApiToken, LinkToken, TokenResponse};
