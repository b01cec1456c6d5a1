//! In-memory token storage.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use guildhall_core::auth::{ApiToken, LinkToken, LinkTokenRepository, Result, TokenRepository};

/// In-memory token store for development and testing.
///
/// Stores API tokens and link tokens in HashMaps wrapped in `Arc<RwLock<_>>`.
/// Data is not persisted and will be lost when the store is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTokenStore {
    tokens: Arc<RwLock<HashMap<String, ApiToken>>>,
    link_tokens: Arc<RwLock<HashMap<String, LinkToken>>>,
}

impl InMemoryTokenStore {
    /// Creates a new empty in-memory token store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenRepository for InMemoryTokenStore {
    async fn create_token(&self, token: &ApiToken) -> Result<()> {
        let mut tokens = self.tokens.write().await;
        tokens.insert(token.token.clone(), token.clone());
        Ok(())
    }

    async fn get_token(&self, token: &str) -> Result<Option<ApiToken>> {
        let tokens = self.tokens.read().await;
        Ok(tokens.get(token).cloned())
    }

    async fn delete_token(&self, token: &str) -> Result<()> {
        let mut tokens = self.tokens.write().await;
        tokens.remove(token);
        Ok(())
    }

    async fn delete_user_tokens(&self, user_id: Uuid) -> Result<()> {
        let mut tokens = self.tokens.write().await;
        tokens.retain(|_, t| t.user_id != user_id);
        Ok(())
    }
}

#[async_trait]
impl LinkTokenRepository for InMemoryTokenStore {
    async fn create_link_token(&self, token: &LinkToken) -> Result<()> {
        let mut link_tokens = self.link_tokens.write().await;
        link_tokens.insert(token.token.clone(), token.clone());
        Ok(())
    }

    async fn get_link_token(&self, token: &str) -> Result<Option<LinkToken>> {
        let link_tokens = self.link_tokens.read().await;
        Ok(link_tokens.get(token).cloned())
    }

    async fn delete_link_token(&self, token: &str) -> Result<()> {
        let mut link_tokens = self.link_tokens.write().await;
        link_tokens.remove(token);
        Ok(())
    }
}
