//! Token storage implementations.
//!
//! Provides `TokenRepository` and `LinkTokenRepository` implementations for:
//! - In-memory (always available)
//! - SQLite (with `sqlite` feature)

mod inmemory;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use inmemory::InMemoryTokenStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteTokenStore;
