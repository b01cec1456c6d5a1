//! Application state with repository-based storage.
//!
//! This module defines the shared application state that is passed to all
//! request handlers. It uses repository trait objects for storage abstraction
//! and picks the backend via feature flags.

use std::sync::Arc;

use guildhall_auth::{AuthConfig, AuthState};
use guildhall_core::auth::{LinkTokenRepository, TokenRepository};
use guildhall_core::storage::{
    GroupRepository, GroupRequestRepository, MembershipRepository, UserRepository,
};

use crate::config::Config;
use crate::mailer::{LogMailer, Mailer};

// ============================================================================
// Compile-time feature validation
// ============================================================================

// Storage features: exactly one must be enabled, they are mutually exclusive
#[cfg(all(feature = "sqlite", feature = "inmemory"))]
compile_error!("Cannot enable both 'sqlite' and 'inmemory' storage features");

#[cfg(not(any(feature = "inmemory", feature = "sqlite")))]
compile_error!("Must enable exactly one storage feature: 'inmemory' or 'sqlite'");

/// Shared application state.
///
/// This is cloned for each request handler and contains shared resources
/// including repository trait objects for database access.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub groups: Arc<dyn GroupRepository>,
    /// Players of each group (the `groups_users` pivot).
    pub memberships: Arc<dyn MembershipRepository>,
    pub group_requests: Arc<dyn GroupRequestRepository>,
    /// Password reset tokens.
    pub link_tokens: Arc<dyn LinkTokenRepository>,
    pub mailer: Arc<dyn Mailer>,
    /// Bearer token auth, shared with the `/sessions` routes.
    pub auth: AuthState,
    pub config: Config,
}

/// Every storage concern implemented by one backend.
trait Storage:
    UserRepository + GroupRepository + MembershipRepository + GroupRequestRepository + 'static
{
}

impl<T> Storage for T where
    T: UserRepository + GroupRepository + MembershipRepository + GroupRequestRepository + 'static
{
}

impl AppState {
    /// Creates a new AppState from a storage backend and a token store.
    fn build<S, T>(storage: Arc<S>, tokens: Arc<T>, auth_config: AuthConfig, config: Config) -> Self
    where
        S: Storage,
        T: TokenRepository + LinkTokenRepository + 'static,
    {
        let users: Arc<dyn UserRepository> = storage.clone();
        let auth = AuthState::new(tokens.clone(), users.clone(), auth_config);

        Self {
            users,
            groups: storage.clone(),
            memberships: storage.clone(),
            group_requests: storage,
            link_tokens: tokens,
            mailer: Arc::new(LogMailer),
            auth,
            config,
        }
    }

    /// Replaces the mailer.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn with_mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = mailer;
        self
    }

    /// Creates AppState backed entirely by memory.
    ///
    /// Used by tests regardless of the selected backend.
    #[cfg(any(feature = "inmemory", test))]
    pub fn in_memory(auth_config: AuthConfig, config: Config) -> Self {
        use crate::storage::InMemoryRepository;
        use guildhall_auth::InMemoryTokenStore;

        Self::build(
            Arc::new(InMemoryRepository::new()),
            Arc::new(InMemoryTokenStore::new()),
            auth_config,
            config,
        )
    }
}

impl AsRef<AuthState> for AppState {
    fn as_ref(&self) -> &AuthState {
        &self.auth
    }
}

#[cfg(any(feature = "inmemory", test))]
impl Default for AppState {
    fn default() -> Self {
        Self::in_memory(AuthConfig::default(), Config::default())
    }
}

// ============================================================================
// Factory functions for each storage backend
// ============================================================================

#[cfg(feature = "inmemory")]
mod inmemory {
    use super::*;

    impl AppState {
        /// Creates AppState with in-memory storage.
        /// Useful for development without any external dependencies.
        pub async fn new(auth_config: AuthConfig, config: Config) -> Result<Self, anyhow::Error> {
            Ok(Self::in_memory(auth_config, config))
        }
    }
}

#[cfg(feature = "sqlite")]
mod sqlite {
    use super::*;
    use crate::storage::SqliteRepository;
    use guildhall_auth::SqliteTokenStore;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

    impl AppState {
        /// Creates AppState with SQLite storage for data and tokens.
        ///
        /// Both live in the same database file.
        pub async fn new(auth_config: AuthConfig, config: Config) -> Result<Self, anyhow::Error> {
            let repository = Arc::new(SqliteRepository::new(&config.sqlite_path).await?);

            let options = SqliteConnectOptions::new()
                .filename(&config.sqlite_path)
                .create_if_missing(true);
            let pool = SqlitePoolOptions::new().connect_with(options).await?;
            let tokens = Arc::new(SqliteTokenStore::new(pool));
            tokens.migrate().await?;

            Ok(Self::build(repository, tokens, auth_config, config))
        }
    }
}
