//! Task calendar: month summaries, day dialog and the task form.

pub mod aggregate;
pub mod description;
pub mod form;
pub mod view;

pub use aggregate::DaySummary;
pub use aggregate::aggregate_by_day;
pub use aggregate::aggregate_by_day_in;
pub use aggregate::priority_color;
pub use aggregate::priority_severity;
pub use aggregate::tasks_on;
pub use description::ContactEntity;
pub use description::ContactKind;
pub use description::ContactRef;
pub use description::DescriptionPart;
pub use description::contact_reference;
pub use description::entity_name;
pub use description::render_description;
pub use form::TaskForm;
pub use form::TaskFormError;
pub use view::CalendarView;
pub use view::TaskBackend;
