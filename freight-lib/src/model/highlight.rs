//! Persisted cell highlights

use serde::Deserialize;
use serde::Serialize;

/// One highlighted cell, as stored by `/highlights/`.
///
/// `color: None` serializes as `null`, which asks the backend to delete the
/// highlight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    pub table_name: String,
    pub row_id: i64,
    pub column_id: String,
    pub color: Option<String>,
}

impl Highlight {
    /// Upsert of `color` for a cell.
    pub fn colored(
        table_name: impl Into<String>,
        row_id: i64,
        column_id: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            row_id,
            column_id: column_id.into(),
            color: Some(color.into()),
        }
    }

    /// Deletion of a cell's highlight.
    pub fn cleared(table_name: impl Into<String>, row_id: i64, column_id: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            row_id,
            column_id: column_id.into(),
            color: None,
        }
    }
}

/// Counters returned by `POST /highlights/save/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SaveHighlightsResult {
    #[serde(default)]
    pub created: u64,
    #[serde(default)]
    pub updated: u64,
    #[serde(default)]
    pub deleted: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cleared_serializes_null_color() {
        let h = Highlight::cleared("clients", 4, "phone");
        assert_eq!(
            serde_json::to_value(&h).unwrap(),
            json!({"table_name": "clients", "row_id": 4, "column_id": "phone", "color": null})
        );
    }
}
