//! Calendar tasks

use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;

use super::User;

/// Priority of a calendar task.
///
/// Unknown strings are kept in [`Priority::Other`] so a new backend value
/// never fails a whole month load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
    Other(String),
}

impl Priority {
    /// Sort rank, higher first: `high=3, medium=2, low=1`, anything else 0.
    pub fn rank(&self) -> u8 {
        match self {
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
            Self::Other(_) => 0,
        }
    }

    /// A task that came without any priority. Ranks with the unknown ones.
    pub fn unspecified() -> Self {
        Self::Other(String::new())
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Other(s) => s,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::High => "Высокий",
            Self::Medium => "Средний",
            Self::Low => "Низкий",
            Self::Other(_) => "Не указан",
        }
    }
}

impl From<String> for Priority {
    fn from(value: String) -> Self {
        match value.as_str() {
            "high" => Self::High,
            "medium" => Self::Medium,
            "low" => Self::Low,
            _ => Self::Other(value),
        }
    }
}

impl From<Priority> for String {
    fn from(priority: Priority) -> Self {
        priority.as_str().to_string()
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A task shown on the calendar.
///
/// `order` is kept as the raw nested object since the calendar only links to
/// it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CalendarTask {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub deadline: DateTime<Utc>,
    #[serde(default = "Priority::unspecified", deserialize_with = "priority_or_unspecified")]
    pub priority: Priority,
    #[serde(rename = "type", default)]
    pub task_type: Option<String>,
    #[serde(default)]
    pub order: Option<serde_json::Value>,
    #[serde(default)]
    pub assignee: Option<User>,
}

fn priority_or_unspecified<'de, D>(deserializer: D) -> Result<Priority, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.map(Priority::from).unwrap_or_else(Priority::unspecified))
}

/// Body for creating or replacing a calendar task.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarTaskPayload {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub deadline: DateTime<Utc>,
    /// Written as `assignee_id`, the backend's writable alias of `assignee`.
    #[serde(rename = "assignee_id")]
    pub assignee: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_task() {
        let task: CalendarTask = serde_json::from_value(json!({
            "id": 5,
            "title": "Загрузка",
            "description": "",
            "deadline": "2026-03-02T09:00:00Z",
            "priority": "urgent",
            "type": "loading",
            "order": null,
            "assignee": {"id": 1, "email": "a@example.com", "role": "manager"}
        }))
        .unwrap();

        assert_eq!(task.priority, Priority::Other("urgent".into()));
        assert_eq!(task.priority.rank(), 0);
        assert_eq!(task.task_type.as_deref(), Some("loading"));
        assert_eq!(task.assignee.map(|u| u.id), Some(1));
    }

    #[test]
    fn test_missing_priority_ranks_last() {
        let base = json!({"id": 6, "title": "Звонок", "deadline": "2026-03-02T09:00:00Z"});
        let task: CalendarTask = serde_json::from_value(base.clone()).unwrap();
        assert_eq!(task.priority, Priority::unspecified());
        assert_eq!(task.priority.rank(), 0);

        let mut with_null = base;
        with_null["priority"] = serde_json::Value::Null;
        let task: CalendarTask = serde_json::from_value(with_null).unwrap();
        assert_eq!(task.priority.rank(), 0);
        assert!(task.priority.rank() < Priority::Low.rank());
    }

    #[test]
    fn test_payload_shape() {
        let payload = CalendarTaskPayload {
            title: "Отправка".into(),
            description: String::new(),
            priority: Priority::High,
            deadline: "2026-03-02T09:00:00Z".parse().unwrap(),
            assignee: 7,
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["priority"], "high");
        assert_eq!(value["assignee_id"], 7);
        assert_eq!(value["deadline"], "2026-03-02T09:00:00Z");
    }
}
