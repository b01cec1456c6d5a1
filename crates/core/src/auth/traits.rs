use async_trait::async_trait;
use uuid::Uuid;

use super::{ApiToken, AuthError, LinkToken};

/// Result type for auth operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// API token storage abstraction.
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Store a new token.
    async fn create_token(&self, token: &ApiToken) -> Result<()>;

    /// Retrieve a token by its value.
    async fn get_token(&self, token: &str) -> Result<Option<ApiToken>>;

    /// Delete a specific token (logout).
    async fn delete_token(&self, token: &str) -> Result<()>;

    /// Delete all tokens for a user.
    async fn delete_user_tokens(&self, user_id: Uuid) -> Result<()>;
}

/// Password reset token storage abstraction.
#[async_trait]
pub trait LinkTokenRepository: Send + Sync {
    /// Store a new link token.
    async fn create_link_token(&self, token: &LinkToken) -> Result<()>;

    /// Retrieve a link token by its value.
    async fn get_link_token(&self, token: &str) -> Result<Option<LinkToken>>;

    /// Delete a link token once used.
    async fn delete_link_token(&self, token: &str) -> Result<()>;
}
