//! REST API operations

mod calendar;
mod crud;
mod email;
mod files;
mod filters;
mod highlights;
mod pages;
mod settings;
mod site_requests;

pub use calendar::*;
pub use crud::*;
pub use email::*;
pub use files::*;
pub use filters::*;
pub use pages::*;
pub use site_requests::*;
