//! Calendar screen controller

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::FixedOffset;
use chrono::Local;
use chrono::NaiveDate;
use chrono::Offset;
use freight_lib::CrmClient;
use freight_lib::api::CalendarQuery;
use freight_lib::error::Error;
use freight_lib::model::CalendarTask;
use freight_lib::model::CalendarTaskPayload;
use freight_lib::model::User;

use super::aggregate::DaySummary;
use super::aggregate::aggregate_by_day_in;
use super::aggregate::tasks_on;
use super::form::TaskForm;

const CREATE_FAILED_MESSAGE: &str = "Произошла ошибка при создании задачи";
const UPDATE_FAILED_MESSAGE: &str = "Произошла ошибка при обновлении задачи";

/// Task endpoints the calendar needs.
#[async_trait]
pub trait TaskBackend: Send + Sync {
    async fn list(&self, query: &CalendarQuery) -> Result<Vec<CalendarTask>, Error>;
    async fn create(&self, payload: &CalendarTaskPayload) -> Result<CalendarTask, Error>;
    async fn update(&self, id: i64, payload: &CalendarTaskPayload) -> Result<CalendarTask, Error>;
    async fn delete(&self, id: i64) -> Result<(), Error>;
}

#[async_trait]
impl TaskBackend for CrmClient {
    async fn list(&self, query: &CalendarQuery) -> Result<Vec<CalendarTask>, Error> {
        self.list_tasks(query).await
    }

    async fn create(&self, payload: &CalendarTaskPayload) -> Result<CalendarTask, Error> {
        self.create_task(payload).await
    }

    async fn update(&self, id: i64, payload: &CalendarTaskPayload) -> Result<CalendarTask, Error> {
        self.update_task(id, payload).await
    }

    async fn delete(&self, id: i64) -> Result<(), Error> {
        self.delete_task(id).await
    }
}

/// The month calendar of one user, with its day dialog and task form.
pub struct CalendarView {
    backend: Arc<dyn TaskBackend>,
    user: User,
    offset: FixedOffset,
    range: Option<(NaiveDate, NaiveDate)>,
    tasks: Vec<CalendarTask>,
    summaries: BTreeMap<NaiveDate, DaySummary>,
    loading: bool,
    error: Option<String>,
    open_day: Option<NaiveDate>,
    form: Option<TaskForm>,
}

impl CalendarView {
    pub fn new(backend: Arc<dyn TaskBackend>, user: User) -> Self {
        Self {
            backend,
            user,
            offset: Local::now().offset().fix(),
            range: None,
            tasks: Vec::new(),
            summaries: BTreeMap::new(),
            loading: false,
            error: None,
            open_day: None,
            form: None,
        }
    }

    /// Days are cut at midnight in this offset instead of the local one.
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    /// Restricts loading to `start..=end`; `None` loads everything.
    pub fn set_range(&mut self, range: Option<(NaiveDate, NaiveDate)>) {
        self.range = range;
    }

    /// Fetches the user's tasks. Failures are logged and kept as the error
    /// message; the previous tasks stay visible.
    pub async fn load(&mut self) {
        let mut query = CalendarQuery::for_user(self.user.id);
        if let Some((start, end)) = self.range {
            query = query.between(start, end);
        }

        self.loading = true;
        match self.backend.list(&query).await {
            Ok(tasks) => {
                log::debug!("[calendar] {} tasks for user {}", tasks.len(), self.user.id);
                self.summaries = aggregate_by_day_in(&tasks, &self.offset);
                self.tasks = tasks;
                self.error = None;
            }
            Err(e) => {
                log::error!("[calendar] failed to load tasks: {}", e);
                self.error = Some(e.user_message());
            }
        }
        self.loading = false;
    }

    pub fn tasks(&self) -> &[CalendarTask] {
        &self.tasks
    }

    pub fn summaries(&self) -> &BTreeMap<NaiveDate, DaySummary> {
        &self.summaries
    }

    pub fn summary(&self, date: NaiveDate) -> Option<&DaySummary> {
        self.summaries.get(&date)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Opens the dialog listing a day's tasks.
    pub fn open_day(&mut self, date: NaiveDate) -> Vec<&CalendarTask> {
        self.open_day = Some(date);
        tasks_on(&self.tasks, date, &self.offset)
    }

    pub fn close_day(&mut self) {
        self.open_day = None;
    }

    pub fn opened_day(&self) -> Option<NaiveDate> {
        self.open_day
    }

    /// Tasks of the open day dialog.
    pub fn day_tasks(&self) -> Vec<&CalendarTask> {
        match self.open_day {
            Some(date) => tasks_on(&self.tasks, date, &self.offset),
            None => Vec::new(),
        }
    }

    /// Opens an empty form due on `date`, closing the day dialog.
    pub fn start_create(&mut self, date: NaiveDate) -> &mut TaskForm {
        self.open_day = None;
        self.form.insert(TaskForm::for_date(date))
    }

    /// Opens the form on an existing task. `None` if the task is not loaded.
    pub fn start_edit(&mut self, id: i64) -> Option<&mut TaskForm> {
        let task = self.tasks.iter().find(|t| t.id == id)?;
        let form = TaskForm::from_task_in(task, &self.offset);
        self.open_day = None;
        Some(self.form.insert(form))
    }

    pub fn form(&self) -> Option<&TaskForm> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut TaskForm> {
        self.form.as_mut()
    }

    pub fn cancel_form(&mut self) {
        self.form = None;
    }

    /// Saves the open form and reloads. Returns whether it was saved.
    ///
    /// Validation and server errors keep the form open with its error set.
    pub async fn submit_form(&mut self) -> bool {
        let Some(form) = self.form.as_mut() else {
            return false;
        };
        let payload = match form.payload_in(Some(&self.user), &self.offset) {
            Ok(p) => p,
            Err(e) => {
                form.error = Some(e.to_string());
                return false;
            }
        };
        form.error = None;

        let result = match form.editing() {
            Some(id) => self.backend.update(id, &payload).await,
            None => self.backend.create(&payload).await,
        };
        if let Err(e) = result {
            log::error!("[calendar] failed to save task: {}", e);
            let fallback = if form.editing().is_some() {
                UPDATE_FAILED_MESSAGE
            } else {
                CREATE_FAILED_MESSAGE
            };
            form.error = Some(save_error_message(&e, fallback));
            return false;
        }

        self.form = None;
        self.load().await;
        true
    }

    /// Deletes a task, closes the day dialog and reloads.
    pub async fn delete_task(&mut self, id: i64) -> Result<(), Error> {
        if let Err(e) = self.backend.delete(id).await {
            log::error!("[calendar] failed to delete task {}: {}", id, e);
            return Err(e);
        }
        self.open_day = None;
        self.load().await;
        Ok(())
    }
}

fn save_error_message(error: &Error, fallback: &str) -> String {
    match error {
        Error::Api(api) if api.is_network() => error.user_message(),
        Error::Api(api) => api.server_message().unwrap_or_else(|| fallback.to_string()),
        _ => fallback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use freight_lib::error::ApiError;

    #[derive(Default)]
    struct FakeTasks {
        tasks: Mutex<Vec<CalendarTask>>,
        queries: Mutex<Vec<CalendarQuery>>,
        reject_saves: bool,
    }

    fn task(id: i64, priority: &str, deadline: &str) -> CalendarTask {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "title": format!("task {id}"),
            "deadline": deadline,
            "priority": priority,
        }))
        .unwrap()
    }

    #[async_trait]
    impl TaskBackend for FakeTasks {
        async fn list(&self, query: &CalendarQuery) -> Result<Vec<CalendarTask>, Error> {
            self.queries.lock().unwrap().push(query.clone());
            Ok(self.tasks.lock().unwrap().clone())
        }

        async fn create(&self, payload: &CalendarTaskPayload) -> Result<CalendarTask, Error> {
            if self.reject_saves {
                return Err(ApiError::http(400, "Срок уже прошел").into());
            }
            let mut tasks = self.tasks.lock().unwrap();
            let created = CalendarTask {
                id: tasks.len() as i64 + 100,
                title: payload.title.clone(),
                description: payload.description.clone(),
                deadline: payload.deadline,
                priority: payload.priority.clone(),
                task_type: None,
                order: None,
                assignee: None,
            };
            tasks.push(created.clone());
            Ok(created)
        }

        async fn update(&self, id: i64, payload: &CalendarTaskPayload) -> Result<CalendarTask, Error> {
            let mut tasks = self.tasks.lock().unwrap();
            let task = tasks
                .iter_mut()
                .find(|t| t.id == id)
                .ok_or_else(|| Error::from(ApiError::http(404, "Не найдено")))?;
            task.title = payload.title.clone();
            task.priority = payload.priority.clone();
            Ok(task.clone())
        }

        async fn delete(&self, id: i64) -> Result<(), Error> {
            self.tasks.lock().unwrap().retain(|t| t.id != id);
            Ok(())
        }
    }

    fn user() -> User {
        serde_json::from_value(serde_json::json!({"id": 4, "email": "m@example.com", "role": "manager"})).unwrap()
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[tokio::test]
    async fn test_load_builds_summaries_for_user() {
        let backend = Arc::new(FakeTasks::default());
        backend.tasks.lock().unwrap().extend([
            task(1, "low", "2026-03-02T08:00:00Z"),
            task(2, "high", "2026-03-02T10:00:00Z"),
        ]);
        let mut view = CalendarView::new(backend.clone(), user()).with_offset(utc());
        view.set_range(Some((day(1), day(31))));
        view.load().await;

        let summary = view.summary(day(2)).unwrap();
        assert_eq!(summary.main_task_id, 2);
        assert_eq!(summary.other_events_count, 1);

        let query = backend.queries.lock().unwrap()[0].clone();
        assert_eq!(query, CalendarQuery::for_user(4).between(day(1), day(31)));

        let on_day: Vec<i64> = view.open_day(day(2)).iter().map(|t| t.id).collect();
        assert_eq!(on_day, vec![2, 1]);
    }

    #[tokio::test]
    async fn test_create_from_day_then_reload() {
        let backend = Arc::new(FakeTasks::default());
        let mut view = CalendarView::new(backend.clone(), user()).with_offset(utc());
        view.open_day(day(5));

        let form = view.start_create(day(5));
        form.title = "Выгрузка".into();
        assert!(view.opened_day().is_none());
        assert!(view.submit_form().await);

        assert!(view.form().is_none());
        assert_eq!(view.summary(day(5)).map(|s| s.main_task_title.as_str()), Some("Выгрузка"));
    }

    #[tokio::test]
    async fn test_invalid_or_rejected_form_stays_open() {
        let backend = Arc::new(FakeTasks {
            reject_saves: true,
            ..FakeTasks::default()
        });
        let mut view = CalendarView::new(backend, user()).with_offset(utc());

        view.start_create(day(5));
        assert!(!view.submit_form().await);
        assert_eq!(
            view.form().and_then(|f| f.error.as_deref()),
            Some("Пожалуйста, заполните все обязательные поля: Название, Срок.")
        );

        if let Some(form) = view.form_mut() {
            form.title = "Выгрузка".into();
        }
        assert!(!view.submit_form().await);
        assert_eq!(view.form().and_then(|f| f.error.as_deref()), Some("Срок уже прошел"));
    }

    #[tokio::test]
    async fn test_edit_and_delete() {
        let backend = Arc::new(FakeTasks::default());
        backend.tasks.lock().unwrap().push(task(1, "low", "2026-03-02T08:00:00Z"));
        let mut view = CalendarView::new(backend, user()).with_offset(utc());
        view.load().await;

        let form = view.start_edit(1).unwrap();
        form.title = "Новая".into();
        assert!(view.submit_form().await);
        assert_eq!(view.tasks()[0].title, "Новая");

        view.open_day(day(2));
        view.delete_task(1).await.unwrap();
        assert!(view.opened_day().is_none());
        assert!(view.summaries().is_empty());
    }
}
