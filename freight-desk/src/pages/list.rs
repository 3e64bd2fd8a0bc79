//! Generic list screen.
//!
//! Wires a [`DataGrid`] to one backend resource: paging and search,
//! the create/edit/view dialog, confirmed deletes, Excel import and
//! export, and per-table column visibility.

use std::collections::HashMap;
use std::sync::Arc;

use freight_lib::api::Filters;
use freight_lib::error::Error;
use freight_lib::error::ValidationErrors;
use freight_lib::model::Record;
use freight_lib::model::Resource;
use freight_lib::model::Role;
use thiserror::Error;

use super::backend::RecordBackend;
use super::pagination::Pagination;
use crate::forms;
use crate::grid::AlertSink;
use crate::grid::ColumnSet;
use crate::grid::DataGrid;
use crate::grid::HighlightStore;
use crate::storage::LocalStore;
use crate::storage::keys;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogState {
    #[default]
    Closed,
    Create,
    Edit(i64),
    View(i64),
}

/// Destructive action waiting for the user's confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConfirmState {
    #[default]
    Idle,
    Delete(i64),
    BulkDelete(Vec<i64>),
}

impl ConfirmState {
    pub fn prompt(&self) -> Option<String> {
        match self {
            Self::Idle => None,
            Self::Delete(_) => Some("Вы уверены, что хотите удалить эту запись?".to_string()),
            Self::BulkDelete(ids) => Some(format!("Удалить выбранные записи ({})?", ids.len())),
        }
    }
}

#[derive(Debug, Error)]
pub enum PageError {
    #[error("{0} не поддерживает импорт и экспорт Excel")]
    ExcelUnsupported(Resource),
    #[error("{0} не имеет ответственного")]
    NoOwner(Resource),
    #[error(transparent)]
    Api(#[from] Error),
}

impl PageError {
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

pub struct ListPage {
    backend: Arc<dyn RecordBackend>,
    store: LocalStore,
    resource: Resource,
    grid: DataGrid,
    base_columns: ColumnSet,
    visibility: HashMap<String, bool>,
    filters: Filters,
    pagination: Pagination,
    dialog: DialogState,
    confirm: ConfirmState,
    form: Record,
    form_errors: ValidationErrors,
    form_error: Option<String>,
}

impl ListPage {
    pub fn new(
        backend: Arc<dyn RecordBackend>,
        highlights: Arc<dyn HighlightStore>,
        alerts: Arc<dyn AlertSink>,
        store: LocalStore,
        resource: Resource,
        role: &Role,
    ) -> Self {
        let base_columns = ColumnSet::for_role(resource, role);
        let grid = DataGrid::new(highlights, alerts, Some(resource.table_name()), base_columns.clone());
        Self {
            backend,
            store,
            resource,
            grid,
            base_columns,
            visibility: HashMap::new(),
            filters: Filters::new(),
            pagination: Pagination::default(),
            dialog: DialogState::Closed,
            confirm: ConfirmState::Idle,
            form: Record::new(),
            form_errors: ValidationErrors::new(),
            form_error: None,
        }
    }

    /// First load: stored column visibility, highlights, then rows.
    pub async fn open(&mut self) {
        match self.store.get::<HashMap<String, bool>>(&keys::columns(self.resource.table_name())).await {
            Ok(Some(visibility)) => self.visibility = visibility,
            Ok(None) => {}
            Err(e) => log::warn!("[pages] ignoring stored columns of {}: {}", self.resource, e),
        }
        self.grid.set_columns(self.columns());
        self.grid.load_highlights().await;
        self.load().await;
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    pub fn grid(&self) -> &DataGrid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut DataGrid {
        &mut self.grid
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    /// Fetches the current page. A failure keeps the old rows and shows
    /// the message above the grid.
    pub async fn load(&mut self) {
        let filters = self.pagination.apply(&self.filters);
        self.grid.set_loading(true);
        match self.backend.list(self.resource, &filters).await {
            Ok(list) => {
                self.pagination.set_total(list.total());
                log::debug!("[pages] {} {} of {}", list.len(), self.resource, list.total());
                self.grid.set_data(list.into_items());
                self.grid.set_error(None);
            }
            Err(e) => {
                log::error!("[pages] failed to load {}: {}", self.resource, e);
                self.grid.set_error(Some(e.user_message()));
            }
        }
        self.grid.set_loading(false);
    }

    /// Replaces the search text and reloads from the first page.
    pub async fn search(&mut self, text: &str) {
        self.filters.set("search", text);
        self.pagination.reset();
        self.load().await;
    }

    /// Sets a filter parameter; an empty value removes it.
    pub async fn set_filter(&mut self, key: &str, value: &str) {
        if value.trim().is_empty() {
            self.filters.remove(key);
        } else {
            self.filters.set(key, value);
        }
        self.pagination.reset();
        self.load().await;
    }

    pub async fn go_to_page(&mut self, page: u32) {
        self.pagination.set_page(page);
        self.load().await;
    }

    pub async fn set_page_size(&mut self, size: u32) {
        self.pagination.set_page_size(size);
        self.load().await;
    }

    /// Columns after the user's visibility choices.
    pub fn columns(&self) -> ColumnSet {
        self.base_columns.visible(&self.visibility)
    }

    pub fn all_columns(&self) -> &ColumnSet {
        &self.base_columns
    }

    pub fn is_column_visible(&self, field: &str) -> bool {
        self.visibility.get(field).copied().unwrap_or(true)
    }

    /// Shows or hides a column and remembers the choice for this table.
    pub async fn set_column_visible(&mut self, field: &str, visible: bool) {
        self.visibility.insert(field.to_string(), visible);
        self.grid.set_columns(self.columns());
        let key = keys::columns(self.resource.table_name());
        if let Err(e) = self.store.set(&key, &self.visibility).await {
            log::warn!("[pages] failed to store columns of {}: {}", self.resource, e);
        }
    }

    pub fn dialog(&self) -> DialogState {
        self.dialog
    }

    pub fn form(&self) -> &Record {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut Record {
        &mut self.form
    }

    pub fn form_errors(&self) -> &ValidationErrors {
        &self.form_errors
    }

    pub fn form_error(&self) -> Option<&str> {
        self.form_error.as_deref()
    }

    pub fn open_create(&mut self) {
        self.open_create_with(Record::new());
    }

    /// Create dialog prefilled with `draft`.
    pub fn open_create_with(&mut self, draft: Record) {
        self.form = draft;
        self.reset_form_errors();
        self.dialog = DialogState::Create;
    }

    pub async fn open_edit(&mut self, id: i64) -> Result<(), Error> {
        self.form = self.fetch(id).await?;
        self.reset_form_errors();
        self.dialog = DialogState::Edit(id);
        Ok(())
    }

    pub async fn open_view(&mut self, id: i64) -> Result<(), Error> {
        self.form = self.fetch(id).await?;
        self.reset_form_errors();
        self.dialog = DialogState::View(id);
        Ok(())
    }

    async fn fetch(&self, id: i64) -> Result<Record, Error> {
        self.backend.get(self.resource, id).await.inspect_err(|e| {
            log::error!("[pages] failed to fetch {} {}: {}", self.resource, id, e);
        })
    }

    pub fn close_dialog(&mut self) {
        self.dialog = DialogState::Closed;
        self.form = Record::new();
        self.reset_form_errors();
    }

    fn reset_form_errors(&mut self) {
        self.form_errors = ValidationErrors::new();
        self.form_error = None;
    }

    fn validate_form(&self) -> Result<(), ValidationErrors> {
        match self.resource {
            Resource::Clients => forms::validate_client(&self.form),
            Resource::Carriers => forms::validate_carrier(&self.form),
            Resource::Users => forms::validate_user(&self.form, self.dialog == DialogState::Create),
            _ => Ok(()),
        }
    }

    /// Saves the dialog form. Returns whether the dialog closed.
    ///
    /// Validation runs first and blocks the request. Validation and server
    /// errors keep the dialog open.
    pub async fn submit(&mut self) -> bool {
        self.reset_form_errors();
        if let Err(errors) = self.validate_form() {
            log::debug!("[pages] {} form invalid: {}", self.resource, errors);
            self.form_errors = errors;
            return false;
        }

        let result = match self.dialog {
            DialogState::Create => self.backend.create(self.resource, &self.form).await,
            DialogState::Edit(id) => self.backend.update(self.resource, id, &self.form).await,
            DialogState::View(_) | DialogState::Closed => return false,
        };
        if let Err(e) = result {
            log::error!("[pages] failed to save {}: {}", self.resource, e);
            self.form_error = Some(e.user_message());
            return false;
        }

        self.close_dialog();
        self.load().await;
        true
    }

    pub fn confirm_state(&self) -> &ConfirmState {
        &self.confirm
    }

    pub fn request_delete(&mut self, id: i64) {
        self.confirm = ConfirmState::Delete(id);
    }

    /// Asks to delete the checked rows. Nothing happens with none checked.
    pub fn request_bulk_delete(&mut self) {
        if self.grid.can_bulk_delete() {
            self.confirm = ConfirmState::BulkDelete(self.grid.selected_rows().to_vec());
        }
    }

    pub fn cancel_confirm(&mut self) {
        self.confirm = ConfirmState::Idle;
    }

    /// Runs the confirmed delete and reloads.
    pub async fn confirm(&mut self) -> Result<(), Error> {
        let backend = self.backend.clone();
        let resource = self.resource;
        let result = match std::mem::take(&mut self.confirm) {
            ConfirmState::Idle => return Ok(()),
            ConfirmState::Delete(id) => {
                log::info!("[pages] deleting {} {}", resource, id);
                backend.delete(resource, id).await
            }
            ConfirmState::BulkDelete(ids) => {
                self.grid.clear_selected_rows();
                log::info!("[pages] deleting {} {:?}", resource, ids);
                delete_all(backend.as_ref(), resource, ids).await
            }
        };

        self.load().await;
        if let Err(e) = &result {
            log::error!("[pages] delete failed: {}", e);
            self.grid.set_error(Some(e.user_message()));
        }
        result
    }

    /// Hands a row to another user. Admin-only on the server side.
    pub async fn reassign_owner(&mut self, id: i64, user_id: i64) -> Result<(), PageError> {
        if !self.resource.has_owner() {
            return Err(PageError::NoOwner(self.resource));
        }
        self.backend.reassign_owner(self.resource, id, user_id).await?;
        self.load().await;
        Ok(())
    }

    pub async fn export_excel(&self) -> Result<Vec<u8>, PageError> {
        if !self.resource.supports_excel() {
            return Err(PageError::ExcelUnsupported(self.resource));
        }
        Ok(self.backend.export_excel(self.resource).await?)
    }

    /// Uploads a workbook and reloads the list.
    pub async fn import_excel(&mut self, file_name: &str, bytes: Vec<u8>) -> Result<(), PageError> {
        if !self.resource.supports_excel() {
            return Err(PageError::ExcelUnsupported(self.resource));
        }
        let summary = self.backend.import_excel(self.resource, file_name, bytes).await?;
        log::info!("[pages] imported into {}: {}", self.resource, summary);
        self.load().await;
        Ok(())
    }
}

async fn delete_all(backend: &dyn RecordBackend, resource: Resource, ids: Vec<i64>) -> Result<(), Error> {
    for id in ids {
        backend.delete(resource, id).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use freight_lib::ListEnvelope;
    use freight_lib::error::ApiError;
    use freight_lib::model::Highlight;
    use serde_json::Value;
    use serde_json::json;

    use crate::grid::LogAlertSink;

    #[derive(Default)]
    struct FakeRecords {
        rows: Mutex<Vec<Record>>,
        requests: Mutex<Vec<String>>,
        fail_list: bool,
        fail_delete: Option<i64>,
    }

    impl FakeRecords {
        fn with_rows(ids: &[i64]) -> Self {
            let rows = ids
                .iter()
                .map(|id| Record::new().set("id", *id).set("company_name", format!("Компания {id}")))
                .collect();
            Self {
                rows: Mutex::new(rows),
                ..Self::default()
            }
        }

        fn log(&self, entry: String) {
            self.requests.lock().unwrap().push(entry);
        }
    }

    #[async_trait]
    impl RecordBackend for FakeRecords {
        async fn list(&self, resource: Resource, filters: &Filters) -> Result<ListEnvelope<Record>, Error> {
            self.log(format!("list {} {:?}", resource, filters.to_query()));
            if self.fail_list {
                return Err(ApiError::http(500, "Внутренняя ошибка").into());
            }
            Ok(ListEnvelope::from_items(self.rows.lock().unwrap().clone()))
        }

        async fn get(&self, _: Resource, id: i64) -> Result<Record, Error> {
            self.rows
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.id() == Some(id))
                .cloned()
                .ok_or_else(|| ApiError::http(404, "Не найдено").into())
        }

        async fn create(&self, _: Resource, data: &Record) -> Result<Record, Error> {
            self.log("create".into());
            let created = data.clone().set("id", 100);
            self.rows.lock().unwrap().push(created.clone());
            Ok(created)
        }

        async fn update(&self, _: Resource, id: i64, data: &Record) -> Result<Record, Error> {
            self.log(format!("update {id}"));
            if id == 1 {
                return Err(ApiError::from_response_body(400, r#"{"detail": "Клиент заблокирован"}"#.into()).into());
            }
            Ok(data.clone())
        }

        async fn delete(&self, _: Resource, id: i64) -> Result<(), Error> {
            self.log(format!("delete {id}"));
            if self.fail_delete == Some(id) {
                return Err(ApiError::http(409, "Запись используется в заказах").into());
            }
            self.rows.lock().unwrap().retain(|r| r.id() != Some(id));
            Ok(())
        }

        async fn reassign_owner(&self, _: Resource, id: i64, user_id: i64) -> Result<Record, Error> {
            self.log(format!("reassign {id} {user_id}"));
            Ok(Record::new())
        }

        async fn export_excel(&self, _: Resource) -> Result<Vec<u8>, Error> {
            Ok(b"PK".to_vec())
        }

        async fn import_excel(&self, _: Resource, file_name: &str, _: Vec<u8>) -> Result<Value, Error> {
            self.log(format!("import {file_name}"));
            Ok(json!({"created": 1}))
        }
    }

    struct NoHighlights;

    #[async_trait]
    impl HighlightStore for NoHighlights {
        async fn load(&self, _: &str) -> Result<Vec<Highlight>, Error> {
            Ok(Vec::new())
        }

        async fn save(&self, _: &[Highlight]) -> Result<(), Error> {
            Ok(())
        }
    }

    fn page(backend: Arc<FakeRecords>, resource: Resource, store: LocalStore) -> ListPage {
        ListPage::new(
            backend,
            Arc::new(NoHighlights),
            Arc::new(LogAlertSink),
            store,
            resource,
            &Role::Manager,
        )
    }

    #[tokio::test]
    async fn test_search_resets_to_first_page() {
        let backend = Arc::new(FakeRecords::with_rows(&[1, 2]));
        let mut page = page(backend.clone(), Resource::Clients, LocalStore::in_memory());
        page.open().await;
        page.search("ромашка").await;

        let requests = backend.requests.lock().unwrap();
        assert_eq!(
            requests.last().map(String::as_str),
            Some(r#"list clients [("search", "ромашка"), ("page", "1"), ("page_size", "10")]"#)
        );
        assert_eq!(page.grid().rows().len(), 2);
    }

    #[tokio::test]
    async fn test_load_failure_is_shown() {
        let backend = Arc::new(FakeRecords {
            fail_list: true,
            ..FakeRecords::default()
        });
        let mut page = page(backend, Resource::Clients, LocalStore::in_memory());
        page.load().await;
        assert_eq!(page.grid().error(), Some("Внутренняя ошибка"));
    }

    #[tokio::test]
    async fn test_invalid_form_blocks_request() {
        let backend = Arc::new(FakeRecords::default());
        let mut page = page(backend.clone(), Resource::Clients, LocalStore::in_memory());

        page.open_create();
        page.form_mut().insert("company_name", "Вектор");
        page.form_mut().insert("unp", "123");
        assert!(!page.submit().await);
        assert_eq!(page.dialog(), DialogState::Create);
        assert_eq!(page.form_errors().for_field("unp"), Some(forms::UNP_MESSAGE));
        assert!(backend.requests.lock().unwrap().is_empty());

        page.form_mut().insert("unp", "190000001");
        assert!(page.submit().await);
        assert_eq!(page.dialog(), DialogState::Closed);
        assert_eq!(backend.requests.lock().unwrap()[0], "create");
    }

    #[tokio::test]
    async fn test_server_error_keeps_dialog_open() {
        let backend = Arc::new(FakeRecords::with_rows(&[1]));
        let mut page = page(backend, Resource::Cargos, LocalStore::in_memory());

        page.open_edit(1).await.unwrap();
        assert_eq!(page.dialog(), DialogState::Edit(1));
        assert!(!page.submit().await);
        assert_eq!(page.dialog(), DialogState::Edit(1));
        assert_eq!(page.form_error(), Some("Клиент заблокирован"));
    }

    #[tokio::test]
    async fn test_delete_needs_confirmation() {
        let backend = Arc::new(FakeRecords::with_rows(&[1, 2]));
        let mut page = page(backend.clone(), Resource::Clients, LocalStore::in_memory());
        page.load().await;

        page.request_delete(2);
        assert!(page.confirm_state().prompt().is_some());
        page.cancel_confirm();
        page.confirm().await.unwrap();
        assert_eq!(page.grid().rows().len(), 2);

        page.request_delete(2);
        page.confirm().await.unwrap();
        assert_eq!(page.grid().rows().len(), 1);
        assert_eq!(*page.confirm_state(), ConfirmState::Idle);
    }

    #[tokio::test]
    async fn test_bulk_delete_of_three_rows() {
        let backend = Arc::new(FakeRecords::with_rows(&[1, 2, 3, 4]));
        let mut page = page(backend.clone(), Resource::Carriers, LocalStore::in_memory());
        page.load().await;
        for id in [1, 2, 3] {
            page.grid_mut().toggle_row(id);
        }

        page.request_bulk_delete();
        assert_eq!(*page.confirm_state(), ConfirmState::BulkDelete(vec![1, 2, 3]));
        page.confirm().await.unwrap();

        assert!(page.grid().selected_rows().is_empty());
        assert_eq!(page.grid().rows().len(), 1);
        let deletes: Vec<String> = backend
            .requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.starts_with("delete"))
            .cloned()
            .collect();
        assert_eq!(deletes, vec!["delete 1", "delete 2", "delete 3"]);
    }

    #[tokio::test]
    async fn test_bulk_delete_uses_confirmed_rows() {
        let backend = Arc::new(FakeRecords::with_rows(&[1, 2, 3, 4]));
        let mut page = page(backend.clone(), Resource::Clients, LocalStore::in_memory());
        page.load().await;
        page.grid_mut().toggle_row(1);
        page.grid_mut().toggle_row(2);
        page.request_bulk_delete();
        assert_eq!(page.confirm_state().prompt().as_deref(), Some("Удалить выбранные записи (2)?"));

        page.grid_mut().toggle_row(4);
        page.confirm().await.unwrap();

        let rows: Vec<i64> = page.grid().rows().iter().filter_map(Record::id).collect();
        assert_eq!(rows, vec![3, 4]);
        assert!(page.grid().selected_rows().is_empty());
    }

    #[tokio::test]
    async fn test_failed_bulk_delete_clears_selection_and_shows_error() {
        let backend = Arc::new(FakeRecords {
            fail_delete: Some(2),
            ..FakeRecords::with_rows(&[1, 2, 3])
        });
        let mut page = page(backend.clone(), Resource::Carriers, LocalStore::in_memory());
        page.load().await;
        page.grid_mut().toggle_all_rows();
        page.request_bulk_delete();

        assert!(page.confirm().await.is_err());

        assert!(page.grid().selected_rows().is_empty());
        assert_eq!(*page.confirm_state(), ConfirmState::Idle);
        assert_eq!(page.grid().error(), Some("Запись используется в заказах"));
        let rows: Vec<i64> = page.grid().rows().iter().filter_map(Record::id).collect();
        assert_eq!(rows, vec![2, 3]);
    }

    #[tokio::test]
    async fn test_column_visibility_is_remembered() {
        let store = LocalStore::in_memory();
        let backend = Arc::new(FakeRecords::default());

        let mut first = page(backend.clone(), Resource::Clients, store.clone());
        first.open().await;
        first.set_column_visible("address", false).await;
        assert!(first.columns().get("address").is_none());

        let mut second = page(backend, Resource::Clients, store);
        second.open().await;
        assert!(!second.is_column_visible("address"));
        assert!(second.grid().columns().get("address").is_none());
    }

    #[tokio::test]
    async fn test_excel_only_where_supported() {
        let backend = Arc::new(FakeRecords::default());
        let mut orders = page(backend.clone(), Resource::Orders, LocalStore::in_memory());
        assert!(matches!(orders.export_excel().await, Err(PageError::ExcelUnsupported(_))));
        assert!(matches!(orders.reassign_owner(1, 2).await, Err(PageError::NoOwner(_))));

        let mut clients = page(backend.clone(), Resource::Clients, LocalStore::in_memory());
        assert_eq!(clients.export_excel().await.unwrap(), b"PK".to_vec());
        clients.import_excel("clients.xlsx", Vec::new()).await.unwrap();
        assert!(backend.requests.lock().unwrap().contains(&"import clients.xlsx".to_string()));
    }
}
