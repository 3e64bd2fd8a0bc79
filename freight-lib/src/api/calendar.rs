//! Calendar task endpoints

use chrono::NaiveDate;

use crate::CrmClient;
use crate::error::Error;
use crate::model::CalendarTask;
use crate::model::CalendarTaskPayload;
use crate::model::Resource;
use crate::response::ListEnvelope;

/// Filter of `GET /calendar/tasks/`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarQuery {
    pub user: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl CalendarQuery {
    /// Tasks of one user.
    pub fn for_user(user: i64) -> Self {
        Self {
            user: Some(user),
            ..Self::default()
        }
    }

    /// Restricts to `start..=end`.
    pub fn between(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub(crate) fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(user) = self.user {
            query.push(("user".to_string(), user.to_string()));
        }
        if let Some(start) = self.start_date {
            query.push(("start_date".to_string(), start.format("%Y-%m-%d").to_string()));
        }
        if let Some(end) = self.end_date {
            query.push(("end_date".to_string(), end.format("%Y-%m-%d").to_string()));
        }
        query
    }
}

impl CrmClient {
    pub async fn list_tasks(&self, query: &CalendarQuery) -> Result<Vec<CalendarTask>, Error> {
        let list: ListEnvelope<CalendarTask> = self
            .get_json(Resource::CalendarTasks.path(), &query.to_query())
            .await?;
        Ok(list.into_items())
    }

    pub async fn create_task(&self, payload: &CalendarTaskPayload) -> Result<CalendarTask, Error> {
        log::info!("[api] creating calendar task '{}'", payload.title);
        self.post_json(Resource::CalendarTasks.path(), payload).await
    }

    pub async fn update_task(
        &self,
        id: i64,
        payload: &CalendarTaskPayload,
    ) -> Result<CalendarTask, Error> {
        log::info!("[api] updating calendar task {}", id);
        self.put_json(&Resource::CalendarTasks.item_path(id), payload)
            .await
    }

    pub async fn delete_task(&self, id: i64) -> Result<(), Error> {
        log::info!("[api] deleting calendar task {}", id);
        self.delete(&Resource::CalendarTasks.item_path(id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_params() {
        let query = CalendarQuery::for_user(4).between(
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
        );
        assert_eq!(
            query.to_query(),
            vec![
                ("user".to_string(), "4".to_string()),
                ("start_date".to_string(), "2026-03-01".to_string()),
                ("end_date".to_string(), "2026-03-31".to_string()),
            ]
        );
        assert!(CalendarQuery::default().to_query().is_empty());
    }
}
