//! Status chip colors

/// Visual severity of a status chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusSeverity {
    Success,
    Warning,
    Info,
    Error,
    Primary,
    Default,
}

/// Label of the chip shown when a row has no status.
pub const UNSPECIFIED_STATUS: &str = "Не указан";

impl StatusSeverity {
    /// Severity for a status string, case-insensitively.
    ///
    /// Covers the Russian labels used by clients and orders and the backend
    /// codes used by site requests. Anything else is neutral.
    pub fn for_status(status: &str) -> Self {
        match status.trim().to_lowercase().as_str() {
            "активный" | "завершен" | "active" | "completed" => Self::Success,
            "перспективный" | "в работе" | "in_progress" => Self::Warning,
            "есть интерес" | "новый" | "new" => Self::Info,
            "отменен" | "rejected" | "cancelled" => Self::Error,
            _ => Self::Default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_is_case_insensitive() {
        assert_eq!(StatusSeverity::for_status("Активный"), StatusSeverity::Success);
        assert_eq!(StatusSeverity::for_status("В РАБОТЕ"), StatusSeverity::Warning);
        assert_eq!(StatusSeverity::for_status("Есть интерес"), StatusSeverity::Info);
        assert_eq!(StatusSeverity::for_status("отменен"), StatusSeverity::Error);
        assert_eq!(StatusSeverity::for_status("archived"), StatusSeverity::Default);
    }
}
