//! SQLite token storage implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use guildhall_core::auth::{
    ApiToken, AuthError, LinkToken, LinkTokenRepository, Result, TokenRepository,
};
use sqlx::SqlitePool;
use uuid::Uuid;

/// SQLite-backed token storage.
pub struct SqliteTokenStore {
    pool: SqlitePool,
}

fn storage_err(e: impl std::fmt::Display) -> AuthError {
    AuthError::Storage(e.to_string())
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(s)
        .map_err(storage_err)?
        .with_timezone(&Utc))
}

fn parse_uuid(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s).map_err(storage_err)
}

impl SqliteTokenStore {
    /// Creates a new SQLite token store.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Runs database migrations to create required tables.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS api_tokens (
                token TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                name TEXT NOT NULL,
                created_at TEXT NOT NULL,
                expires_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_api_tokens_user_id ON api_tokens(user_id);
            CREATE INDEX IF NOT EXISTS idx_api_tokens_expires_at ON api_tokens(expires_at);

            CREATE TABLE IF NOT EXISTS link_tokens (
                token TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(())
    }
}

#[async_trait]
impl TokenRepository for SqliteTokenStore {
    async fn create_token(&self, token: &ApiToken) -> Result<()> {
        sqlx::query(
            "INSERT INTO api_tokens (token, user_id, name, created_at, expires_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&token.token)
        .bind(token.user_id.to_string())
        .bind(&token.name)
        .bind(token.created_at.to_rfc3339())
        .bind(token.expires_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(storage_err)?;

        Ok(())
    }

    async fn get_token(&self, token: &str) -> Result<Option<ApiToken>> {
        let row = sqlx::query_as::<_, (String, String, String, String, String)>(
            "SELECT token, user_id, name, created_at, expires_at FROM api_tokens WHERE token = ?",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?;

        match row {
            Some((token, user_id, name, created_at, expires_at)) => Ok(Some(ApiToken {
                token,
                user_id: parse_uuid(&user_id)?,
                name,
                created_at: parse_datetime(&created_at)?,
                expires_at: parse_datetime(&expires_at)?,
            })),
            None => Ok(None),
        }
    }

    async fn delete_token(&self, token: &str) -> Result<()> {
        sqlx::query("DELETE FROM api_tokens WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;

        Ok(())
    }

    async fn delete_user_tokens(&self, user_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM api_tokens WHERE user_id = ?")
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;

        Ok(())
    }
}

#[async_trait]
impl LinkTokenRepository for SqliteTokenStore {
    async fn create_link_token(&self, token: &LinkToken) -> Result<()> {
        sqlx::query("INSERT INTO link_tokens (token, user_id, created_at) VALUES (?, ?, ?)")
            .bind(&token.token)
            .bind(token.user_id.to_string())
            .bind(token.created_at.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;

        Ok(())
    }

    async fn get_link_token(&self, token: &str) -> Result<Option<LinkToken>> {
        let row = sqlx::query_as::<_, (String, String, String)>(
            "SELECT token, user_id, created_at FROM link_tokens WHERE token = ?",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_err)?;

        match row {
            Some((token, user_id, created_at)) => Ok(Some(LinkToken {
                token,
                user_id: parse_uuid(&user_id)?,
                created_at: parse_datetime(&created_at)?,
            })),
            None => Ok(None),
        }
    }

    async fn delete_link_token(&self, token: &str) -> Result<()> {
        sqlx::query("DELETE FROM link_tokens WHERE token = ?")
            .bind(token)
            .execute(&self.pool)
            .await
            .map_err(storage_err)?;

        Ok(())
    }
}
