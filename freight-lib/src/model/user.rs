//! Users and roles

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// Role of a CRM user. Decides which screens and columns are available.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    Manager,
    Client,
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Client => "client",
            Self::Other(s) => s,
        }
    }

    /// Admins and managers see every record; clients see their own.
    pub fn is_staff(&self) -> bool {
        matches!(self, Self::Admin | Self::Manager)
    }

    /// Russian label shown in user lists.
    pub fn label(&self) -> &str {
        match self {
            Self::Admin => "Администратор",
            Self::Manager => "Менеджер",
            Self::Client => "Клиент",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.to_lowercase().as_str() {
            "admin" => Self::Admin,
            "manager" => Self::Manager,
            "client" => Self::Client,
            _ => Self::Other(value),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Profile of a user as returned by login and the users endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    pub role: Role,
}

impl User {
    /// "First Last", falling back to the username and then the email.
    pub fn display_name(&self) -> String {
        let full = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if !full.is_empty() {
            return full;
        }
        match self.username.as_deref() {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => self.email.clone(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
