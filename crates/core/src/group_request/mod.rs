mod requests;
mod types;

pub use requests::ListGroupRequestsQuery;
pub use types::{GroupRequest, GroupRequestDetails, GroupRequestStatus};
