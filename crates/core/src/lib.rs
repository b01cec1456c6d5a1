//! Functional core for guildhall.
//!
//! Pure domain types, request payloads, validators and the repository
//! traits implemented by the server's storage backends. Nothing in this
//! crate performs I/O.

#[cfg(feature = "auth")]
pub mod auth;
pub mod group;
pub mod group_request;
pub mod serde;
pub mod storage;
pub mod user;
pub mod validation;
