mod error;
mod filter;
mod requests;
mod types;

pub use error::GroupError;
pub use filter::{matches_text, GroupFilter};
pub use requests::{CreateGroupRequest, ListGroupsQuery, UpdateGroupRequest};
pub use types::{Group, GroupDetails, GroupSummary};
