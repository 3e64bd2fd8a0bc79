//! Cell identity

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Field of the synthetic column holding row buttons.
pub const ACTIONS_FIELD: &str = "actions";
/// Field rendered as a status chip.
pub const STATUS_FIELD: &str = "status";

/// Columns whose cells can be neither selected nor highlighted.
pub fn is_excluded_field(field: &str) -> bool {
    field == ACTIONS_FIELD || field == STATUS_FIELD
}

/// A cell, identified by its row id and column field.
///
/// Serialized as `"{row_id}-{field}"`, the format highlight records and
/// selection sets are keyed by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    pub row_id: i64,
    pub field: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CellKeyError {
    #[error("cell key '{0}' has no '-' separator")]
    MissingSeparator(String),
    #[error("cell key '{0}' has an invalid row id")]
    InvalidRowId(String),
    #[error("cell key '{0}' has an empty field")]
    EmptyField(String),
}

impl CellKey {
    pub fn new(row_id: i64, field: impl Into<String>) -> Self {
        Self {
            row_id,
            field: field.into(),
        }
    }

    /// Parses `"{row_id}-{field}"`, splitting at the first `-`.
    ///
    /// Everything after the first `-` is the field, so field names may
    /// themselves contain dashes.
    pub fn parse(raw: &str) -> Result<Self, CellKeyError> {
        let (row, field) = raw
            .split_once('-')
            .ok_or_else(|| CellKeyError::MissingSeparator(raw.to_string()))?;
        let row_id = row
            .trim()
            .parse::<i64>()
            .map_err(|_| CellKeyError::InvalidRowId(raw.to_string()))?;
        if field.is_empty() {
            return Err(CellKeyError::EmptyField(raw.to_string()));
        }
        Ok(Self::new(row_id, field))
    }

    pub fn is_excluded(&self) -> bool {
        is_excluded_field(&self.field)
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.row_id, self.field)
    }
}

impl FromStr for CellKey {
    type Err = CellKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_and_parse() {
        let key = CellKey::new(12, "company_name");
        assert_eq!(key.to_string(), "12-company_name");
        assert_eq!(CellKey::parse("12-company_name"), Ok(key));
        assert_eq!(
            CellKey::parse("7-known-rates"),
            Ok(CellKey::new(7, "known-rates"))
        );
    }

    #[test]
    fn test_invalid_keys() {
        assert!(matches!(CellKey::parse("abc-phone"), Err(CellKeyError::InvalidRowId(_))));
        assert!(matches!(CellKey::parse("12"), Err(CellKeyError::MissingSeparator(_))));
        assert!(matches!(CellKey::parse("12-"), Err(CellKeyError::EmptyField(_))));
    }

    #[test]
    fn test_excluded_fields() {
        assert!(CellKey::new(1, "actions").is_excluded());
        assert!(CellKey::new(1, "status").is_excluded());
        assert!(!CellKey::new(1, "phone").is_excluded());
    }
}
