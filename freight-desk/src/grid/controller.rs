//! The data grid controller.
//!
//! [`DataGrid`] owns everything a grid decides on its own: which cells and
//! rows are selected, the current palette color and the highlight map of
//! its table. Rows, columns, loading and error state are pushed in by the
//! page that owns the data.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use freight_lib::model::Highlight;
use freight_lib::model::Record;

use super::cell::CellKey;
use super::column::Column;
use super::column::ColumnSet;
use super::palette::ColorChoice;
use super::palette::Palette;
use super::status::StatusSeverity;
use super::status::UNSPECIFIED_STATUS;
use super::store::AlertSink;
use super::store::HighlightStore;

/// Cell key to hex color.
pub type HighlightMap = HashMap<CellKey, String>;

pub const PLACEHOLDER: &str = "-";
pub const EMPTY_MESSAGE: &str = "Нет данных для отображения";
pub const APPLY_FAILED_MESSAGE: &str =
    "Не удалось сохранить выделение. Пожалуйста, попробуйте еще раз.";
pub const CLEAR_FAILED_MESSAGE: &str =
    "Не удалось очистить выделение. Пожалуйста, попробуйте еще раз.";

/// What a cell shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellView {
    Custom(String),
    StatusChip {
        label: String,
        severity: StatusSeverity,
    },
    Text(String),
    Placeholder,
}

impl CellView {
    pub fn text(&self) -> &str {
        match self {
            Self::Custom(s) | Self::Text(s) => s,
            Self::StatusChip { label, .. } => label,
            Self::Placeholder => PLACEHOLDER,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellStyle {
    pub background: Option<String>,
    pub selected: bool,
    pub min_width: u16,
}

/// What the grid body shows. The error banner is independent of this.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridBody<'a> {
    Loading,
    Empty,
    Rows(&'a [Record]),
}

/// Result of applying or clearing a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorOutcome {
    /// The batch of this many cells was saved.
    Saved(usize),
    NothingSelected,
    NoTableContext,
    /// Saving failed; highlights and selection are back to where they were.
    RolledBack,
}

pub struct DataGrid {
    store: Arc<dyn HighlightStore>,
    alerts: Arc<dyn AlertSink>,
    table_context: Option<String>,
    columns: ColumnSet,
    rows: Vec<Record>,
    loading: bool,
    error: Option<String>,
    palette: Palette,
    current_color: usize,
    highlights: HighlightMap,
    selected_cells: Vec<CellKey>,
    selected_rows: Vec<i64>,
}

impl DataGrid {
    pub fn new(
        store: Arc<dyn HighlightStore>,
        alerts: Arc<dyn AlertSink>,
        table_context: Option<&str>,
        columns: ColumnSet,
    ) -> Self {
        Self {
            store,
            alerts,
            table_context: table_context.map(String::from),
            columns,
            rows: Vec::new(),
            loading: false,
            error: None,
            palette: Palette::default(),
            current_color: 0,
            highlights: HighlightMap::new(),
            selected_cells: Vec::new(),
            selected_rows: Vec::new(),
        }
    }

    pub fn table_context(&self) -> Option<&str> {
        self.table_context.as_deref()
    }

    /// Fetches the highlights of the current table, replacing the map.
    ///
    /// Failures are logged and leave the map empty.
    pub async fn load_highlights(&mut self) {
        self.highlights.clear();
        let Some(table) = self.table_context.clone() else {
            log::warn!("[grid] no table context, highlights will not be loaded or saved");
            return;
        };

        match self.store.load(&table).await {
            Ok(records) => {
                for h in records {
                    if let Some(color) = h.color {
                        self.highlights.insert(CellKey::new(h.row_id, h.column_id), color);
                    }
                }
                log::debug!("[grid:{}] {} highlighted cells", table, self.highlights.len());
            }
            Err(e) => log::error!("[grid:{}] failed to load highlights: {}", table, e),
        }
    }

    /// Switches to another table and reloads its highlights.
    pub async fn set_table_context(&mut self, table_context: Option<&str>) {
        if self.table_context.as_deref() == table_context {
            return;
        }
        self.table_context = table_context.map(String::from);
        self.selected_cells.clear();
        self.load_highlights().await;
    }

    /// Replaces the rendered rows. Selections on rows that went away are dropped.
    pub fn set_data(&mut self, rows: Vec<Record>) {
        self.rows = rows;
        let ids: Vec<i64> = self.rows.iter().filter_map(Record::id).collect();
        self.selected_cells.retain(|k| ids.contains(&k.row_id));
        self.selected_rows.retain(|id| ids.contains(id));
    }

    pub fn set_columns(&mut self, columns: ColumnSet) {
        self.columns = columns;
        let columns = &self.columns;
        self.selected_cells.retain(|k| columns.get(&k.field).is_some());
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn highlights(&self) -> &HighlightMap {
        &self.highlights
    }

    pub fn highlight(&self, key: &CellKey) -> Option<&str> {
        self.highlights.get(key).map(String::as_str)
    }

    fn is_rendered(&self, key: &CellKey) -> bool {
        self.columns.get(&key.field).is_some() && self.rows.iter().any(|r| r.id() == Some(key.row_id))
    }

    /// Toggles a cell in the selection. Returns whether it is now selected.
    pub fn click_cell(&mut self, row_id: i64, field: &str) -> bool {
        let key = CellKey::new(row_id, field);
        if key.is_excluded() {
            return false;
        }
        if !self.is_rendered(&key) {
            log::debug!("[grid] ignoring click on unrendered cell {}", key);
            return false;
        }

        if let Some(pos) = self.selected_cells.iter().position(|k| *k == key) {
            self.selected_cells.remove(pos);
            false
        } else {
            self.selected_cells.push(key);
            true
        }
    }

    pub fn is_cell_selected(&self, key: &CellKey) -> bool {
        self.selected_cells.contains(key)
    }

    pub fn selected_cells(&self) -> &[CellKey] {
        &self.selected_cells
    }

    pub fn selected_cells_count(&self) -> usize {
        self.selected_cells.len()
    }

    pub fn current_color_index(&self) -> usize {
        self.current_color
    }

    pub fn current_color(&self) -> Option<&ColorChoice> {
        self.palette.get(self.current_color)
    }

    /// Picks the palette entry used by [`DataGrid::apply_color`].
    /// Indexes outside the palette are ignored.
    pub fn set_current_color_index(&mut self, index: usize) {
        if index < self.palette.len() {
            self.current_color = index;
        } else {
            log::debug!("[grid] color index {} out of range", index);
        }
    }

    /// Paints every selected cell with the current color and saves the
    /// batch. The "no color" entry clears instead.
    pub async fn apply_color(&mut self) -> ColorOutcome {
        let color = self.current_color().and_then(|c| c.value).map(String::from);
        self.change_selected(color, APPLY_FAILED_MESSAGE).await
    }

    /// Removes the highlight of every selected cell.
    pub async fn clear_color(&mut self) -> ColorOutcome {
        self.change_selected(None, CLEAR_FAILED_MESSAGE).await
    }

    async fn change_selected(&mut self, color: Option<String>, failure: &str) -> ColorOutcome {
        let Some(table) = self.table_context.clone() else {
            log::error!("[grid] cannot change highlights without a table context");
            return ColorOutcome::NoTableContext;
        };
        if self.selected_cells.is_empty() {
            return ColorOutcome::NothingSelected;
        }

        let previous_highlights = self.highlights.clone();
        let previous_selection = std::mem::take(&mut self.selected_cells);

        let batch: Vec<Highlight> = previous_selection
            .iter()
            .map(|key| Highlight {
                table_name: table.clone(),
                row_id: key.row_id,
                column_id: key.field.clone(),
                color: color.clone(),
            })
            .collect();
        for key in &previous_selection {
            match &color {
                Some(c) => self.highlights.insert(key.clone(), c.clone()),
                None => self.highlights.remove(key),
            };
        }

        log::debug!("[grid:{}] saving {} cells, color {:?}", table, batch.len(), color);
        match self.store.save(&batch).await {
            Ok(()) => ColorOutcome::Saved(batch.len()),
            Err(e) => {
                log::error!("[grid:{}] failed to save highlights: {}", table, e);
                self.highlights = previous_highlights;
                self.selected_cells = previous_selection;
                self.alerts.alert(failure);
                ColorOutcome::RolledBack
            }
        }
    }

    /// Toggles a row's checkbox. Returns whether it is now checked.
    pub fn toggle_row(&mut self, id: i64) -> bool {
        if let Some(pos) = self.selected_rows.iter().position(|r| *r == id) {
            self.selected_rows.remove(pos);
            return false;
        }
        if !self.rows.iter().any(|r| r.id() == Some(id)) {
            return false;
        }
        self.selected_rows.push(id);
        true
    }

    /// Checks every rendered row, or unchecks all when they already are.
    pub fn toggle_all_rows(&mut self) {
        let ids: Vec<i64> = self.rows.iter().filter_map(Record::id).collect();
        if !ids.is_empty() && ids.iter().all(|id| self.selected_rows.contains(id)) {
            self.selected_rows.clear();
        } else {
            self.selected_rows = ids;
        }
    }

    pub fn selected_rows(&self) -> &[i64] {
        &self.selected_rows
    }

    pub fn can_bulk_delete(&self) -> bool {
        !self.selected_rows.is_empty()
    }

    pub fn clear_selected_rows(&mut self) {
        self.selected_rows.clear();
    }

    /// Hands the checked row ids to `delete`.
    ///
    /// Returns `Ok(false)` without calling it when nothing is checked. The
    /// checked rows are cleared before `delete` runs, whatever it returns.
    pub async fn bulk_delete<F, Fut, E>(&mut self, delete: F) -> Result<bool, E>
    where
        F: FnOnce(Vec<i64>) -> Fut,
        Fut: Future<Output = Result<(), E>>,
    {
        let ids = std::mem::take(&mut self.selected_rows);
        if ids.is_empty() {
            return Ok(false);
        }
        delete(ids).await?;
        Ok(true)
    }

    pub fn render_cell(&self, row: &Record, column: &Column) -> CellView {
        if let Some(render) = &column.render {
            return match render(row) {
                Some(text) => CellView::Custom(text),
                None => CellView::Placeholder,
            };
        }
        if column.is_status() {
            return match row.display(&column.field) {
                Some(status) => CellView::StatusChip {
                    severity: StatusSeverity::for_status(&status),
                    label: status,
                },
                None => CellView::StatusChip {
                    label: UNSPECIFIED_STATUS.to_string(),
                    severity: StatusSeverity::Default,
                },
            };
        }
        match row.display(&column.field) {
            Some(text) => CellView::Text(text),
            None => CellView::Placeholder,
        }
    }

    pub fn cell_style(&self, row_id: i64, column: &Column) -> CellStyle {
        let key = CellKey::new(row_id, column.field.clone());
        CellStyle {
            background: self.highlights.get(&key).cloned(),
            selected: self.is_cell_selected(&key),
            min_width: column.min_width,
        }
    }

    pub fn body(&self) -> GridBody<'_> {
        if self.loading {
            GridBody::Loading
        } else if self.rows.is_empty() {
            GridBody::Empty
        } else {
            GridBody::Rows(&self.rows)
        }
    }
}
