//! Backend resources

use std::fmt;
use std::str::FromStr;

/// A REST collection exposed by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Clients,
    Carriers,
    Documents,
    Cargos,
    Orders,
    Tasks,
    Users,
    Notifications,
    SiteRequests,
    CalendarTasks,
}

impl Resource {
    /// Every resource, in menu order.
    pub const ALL: [Resource; 10] = [
        Resource::Clients,
        Resource::Carriers,
        Resource::Documents,
        Resource::Cargos,
        Resource::Orders,
        Resource::Tasks,
        Resource::Users,
        Resource::Notifications,
        Resource::SiteRequests,
        Resource::CalendarTasks,
    ];

    /// Collection path relative to the API root, with the trailing slash the
    /// backend requires.
    pub fn path(self) -> &'static str {
        match self {
            Self::Clients => "/clients/",
            Self::Carriers => "/carriers/",
            Self::Documents => "/documents/",
            Self::Cargos => "/cargos/",
            Self::Orders => "/orders/",
            Self::Tasks => "/tasks/",
            Self::Users => "/users/",
            Self::Notifications => "/notifications/",
            Self::SiteRequests => "/site-requests/requests/",
            Self::CalendarTasks => "/calendar/tasks/",
        }
    }

    /// Path of a single item.
    pub fn item_path(self, id: i64) -> String {
        format!("{}{}/", self.path(), id)
    }

    /// Path of a collection-level action such as `export_excel`.
    pub fn action_path(self, action: &str) -> String {
        format!("{}{}/", self.path(), action)
    }

    /// Path of an item-level action such as `process`.
    pub fn item_action_path(self, id: i64, action: &str) -> String {
        format!("{}{}/{}/", self.path(), id, action)
    }

    /// Namespace under which grid highlights of this resource are stored.
    pub fn table_name(self) -> &'static str {
        match self {
            Self::Clients => "clients",
            Self::Carriers => "carriers",
            Self::Documents => "documents",
            Self::Cargos => "cargos",
            Self::Orders => "orders",
            Self::Tasks => "tasks",
            Self::Users => "users",
            Self::Notifications => "notifications",
            Self::SiteRequests => "site_requests",
            Self::CalendarTasks => "calendar_tasks",
        }
    }

    /// Whether the backend offers `export_excel/` and `import_excel/`.
    pub fn supports_excel(self) -> bool {
        matches!(
            self,
            Self::Clients | Self::Carriers | Self::Documents | Self::Cargos
        )
    }

    /// Whether records carry a `created_by` owner an admin may reassign.
    pub fn has_owner(self) -> bool {
        matches!(self, Self::Clients | Self::Carriers)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

impl FromStr for Resource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Resource::ALL
            .into_iter()
            .find(|r| r.table_name() == normalized)
            .ok_or_else(|| format!("unknown resource '{s}'"))
    }
}
