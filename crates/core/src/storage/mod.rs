mod error;
mod http_mapping;
mod traits;
mod types;

pub use error::{RepositoryError, Result};
pub use http_mapping::repository_error_to_status_code;
pub use traits::{GroupRepository, GroupRequestRepository, MembershipRepository, UserRepository};
pub use types::{paginate, PageMeta, Paginated, Pagination, DEFAULT_LIMIT, DEFAULT_PAGE};
