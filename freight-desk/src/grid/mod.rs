//! Headless data grid: selection, highlighting and cell rendering rules
//! shared by every list screen.

pub mod cell;
pub mod column;
pub mod controller;
pub mod palette;
pub mod status;
pub mod store;

pub use cell::CellKey;
pub use cell::CellKeyError;
pub use column::Column;
pub use column::ColumnAccess;
pub use column::ColumnSet;
pub use controller::*;
pub use palette::ColorChoice;
pub use palette::Palette;
pub use status::StatusSeverity;
pub use store::AlertSink;
pub use store::HighlightStore;
pub use store::LogAlertSink;
