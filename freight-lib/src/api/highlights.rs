//! Grid highlight persistence

use serde_json::Value;

use crate::CrmClient;
use crate::error::Error;
use crate::model::Highlight;
use crate::model::SaveHighlightsResult;
use crate::response::ListEnvelope;

const HIGHLIGHTS_PATH: &str = "/highlights/";
const SAVE_HIGHLIGHTS_PATH: &str = "/highlights/save/";

impl CrmClient {
    /// Loads the current user's highlights for one table.
    ///
    /// Accepts a bare array or a `{results}` page. Any other shape, and any
    /// entry lacking `row_id` or `column_id`, is skipped rather than failing
    /// the load.
    pub async fn load_highlights(&self, table: &str) -> Result<Vec<Highlight>, Error> {
        let query = [("table".to_string(), table.to_string())];
        let list: ListEnvelope<Value> = self.get_json(HIGHLIGHTS_PATH, &query).await?;
        if list.unexpected_shape {
            log::info!("[api] no highlight list in answer for table {}", table);
        }

        let highlights: Vec<Highlight> = list
            .results
            .into_iter()
            .filter_map(|entry| parse_highlight(table, entry))
            .collect();
        log::debug!("[api] loaded {} highlights for {}", highlights.len(), table);
        Ok(highlights)
    }

    /// Upserts or deletes highlights in one batch.
    ///
    /// Entries with `color: None` are deleted server-side. An empty batch is
    /// not sent.
    pub async fn save_highlights(&self, batch: &[Highlight]) -> Result<SaveHighlightsResult, Error> {
        if batch.is_empty() {
            return Ok(SaveHighlightsResult::default());
        }
        log::debug!("[api] saving {} highlights", batch.len());
        self.post_json(SAVE_HIGHLIGHTS_PATH, batch).await
    }
}

fn parse_highlight(table: &str, entry: Value) -> Option<Highlight> {
    let object = entry.as_object()?;
    let row_id = match object.get("row_id")? {
        Value::Number(n) => n.as_i64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    let column_id = match object.get("column_id")? {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    let color = object
        .get("color")
        .and_then(Value::as_str)
        .filter(|c| !c.is_empty())
        .map(String::from);
    let table_name = object
        .get("table_name")
        .and_then(Value::as_str)
        .unwrap_or(table)
        .to_string();

    Some(Highlight {
        table_name,
        row_id,
        column_id,
        color,
    })
}
