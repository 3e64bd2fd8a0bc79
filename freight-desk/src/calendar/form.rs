//! Create/edit form of a calendar task

use chrono::Local;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use chrono::NaiveTime;
use chrono::TimeZone;
use chrono::Utc;
use freight_lib::model::CalendarTask;
use freight_lib::model::CalendarTaskPayload;
use freight_lib::model::Priority;
use freight_lib::model::User;
use thiserror::Error;

/// Format of the deadline input, minute precision in local time.
pub const DEADLINE_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskFormError {
    #[error("Не удалось определить текущего пользователя. Попробуйте перезайти.")]
    NoUser,
    #[error("Пожалуйста, заполните все обязательные поля: Название, Срок.")]
    MissingRequired,
    #[error("Указанное время не существует в текущем часовом поясе")]
    AmbiguousDeadline,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    /// Local wall-clock deadline.
    pub deadline: Option<NaiveDateTime>,
    editing: Option<i64>,
    pub error: Option<String>,
}

impl TaskForm {
    /// Blank form due at the start of `date`.
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            deadline: Some(date.and_time(NaiveTime::MIN)),
            ..Self::default()
        }
    }

    /// Form editing `task`, deadline shown in `tz`.
    ///
    /// A task without a priority is edited as the default one.
    pub fn from_task_in<Tz: TimeZone>(task: &CalendarTask, tz: &Tz) -> Self {
        let priority = match &task.priority {
            Priority::Other(p) if p.is_empty() => Priority::default(),
            p => p.clone(),
        };
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            priority,
            deadline: Some(task.deadline.with_timezone(tz).naive_local()),
            editing: Some(task.id),
            error: None,
        }
    }

    pub fn from_task(task: &CalendarTask) -> Self {
        Self::from_task_in(task, &Local)
    }

    /// Id of the task being edited, `None` when creating.
    pub fn editing(&self) -> Option<i64> {
        self.editing
    }

    pub fn deadline_input(&self) -> String {
        self.deadline
            .map(|d| d.format(DEADLINE_INPUT_FORMAT).to_string())
            .unwrap_or_default()
    }

    /// Takes the raw input value; anything unparsable empties the deadline.
    pub fn set_deadline_input(&mut self, input: &str) {
        self.deadline = NaiveDateTime::parse_from_str(input.trim(), DEADLINE_INPUT_FORMAT).ok();
    }

    /// Appends a contact reference to the description.
    pub fn insert_contact(&mut self, reference: &str) {
        if !self.description.is_empty() && !self.description.ends_with(char::is_whitespace) {
            self.description.push(' ');
        }
        self.description.push_str(reference);
    }

    pub fn validate(&self, user: Option<&User>) -> Result<(), TaskFormError> {
        if user.is_none() {
            return Err(TaskFormError::NoUser);
        }
        if self.title.trim().is_empty() || self.deadline.is_none() {
            return Err(TaskFormError::MissingRequired);
        }
        Ok(())
    }

    /// Body for the API, assigned to `user`, deadline read in `tz`.
    pub fn payload_in<Tz: TimeZone>(
        &self,
        user: Option<&User>,
        tz: &Tz,
    ) -> Result<CalendarTaskPayload, TaskFormError> {
        self.validate(user)?;
        let (Some(user), Some(deadline)) = (user, self.deadline) else {
            return Err(TaskFormError::MissingRequired);
        };
        let deadline = tz
            .from_local_datetime(&deadline)
            .earliest()
            .ok_or(TaskFormError::AmbiguousDeadline)?
            .with_timezone(&Utc);

        Ok(CalendarTaskPayload {
            title: self.title.trim().to_string(),
            description: self.description.clone(),
            priority: self.priority.clone(),
            deadline,
            assignee: user.id,
        })
    }

    pub fn payload(&self, user: Option<&User>) -> Result<CalendarTaskPayload, TaskFormError> {
        self.payload_in(user, &Local)
    }
}
