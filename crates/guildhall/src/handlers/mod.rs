pub mod error;
pub mod group_requests;
pub mod groups;
pub mod health;
pub mod passwords;
pub mod policy;
pub mod users;

pub use error::ApiError;
