//! Desktop-side logic of the freight CRM: session, local storage and the
//! headless controllers behind each screen.

pub mod calendar;
pub mod email;
pub mod forms;
pub mod grid;
pub mod pages;
pub mod paths;
pub mod session;
pub mod storage;

pub use session::Session;
pub use session::SessionError;
pub use storage::LocalStore;
