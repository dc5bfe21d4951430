pub mod pagination;
pub mod requests;
pub mod response;

pub use pagination::{PaginatedResponse, PaginationInfo, PaginationQuery};
pub use requests::SetActiveRequest;
pub use response::{ApiResponse, ErrorBody};
