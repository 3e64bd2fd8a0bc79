//! List screens built on the data grid.

pub mod backend;
pub mod list;
pub mod pagination;
pub mod site_requests;

pub use backend::RecordBackend;
pub use list::ConfirmState;
pub use list::DialogState;
pub use list::ListPage;
pub use list::PageError;
pub use pagination::Pagination;
pub use site_requests::SiteRequestBackend;
pub use site_requests::SiteRequestsPage;
pub use site_requests::Transition;
