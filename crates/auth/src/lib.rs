//! Token authentication for guildhall.
//!
//! This crate provides:
//! - Password hashing with argon2
//! - Opaque bearer token storage (in-memory, or SQLite via the `sqlite` feature)
//! - Axum extractors for authentication
//! - The `/sessions` login and logout routes

mod config;
mod error;
mod extractors;
mod handlers;
mod password;
mod state;
mod tokens;

pub use config::AuthConfig;
pub use error::{error_body, AuthError};
pub use extractors::CurrentUser;
pub use handlers::{auth_routes, LoginRequest, TOKEN_NAME};
pub use password::{hash_password, verify_password};
pub use state::AuthState;
pub use tokens::InMemoryTokenStore;
#[cfg(feature = "sqlite")]
pub use tokens::SqliteTokenStore;
