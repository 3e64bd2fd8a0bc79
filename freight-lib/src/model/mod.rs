//! Typed models

mod calendar;
mod email;
mod highlight;
mod record;
mod resource;
mod site_request;
mod theme;
mod user;

pub use calendar::*;
pub use email::*;
pub use highlight::*;
pub use record::*;
pub use resource::*;
pub use site_request::*;
pub use theme::*;
pub use user::*;
