//! Month cell summaries

use std::collections::BTreeMap;

use chrono::Local;
use chrono::NaiveDate;
use chrono::TimeZone;
use freight_lib::model::CalendarTask;
use freight_lib::model::Priority;

use crate::grid::StatusSeverity;

/// What a month cell shows for one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySummary {
    pub main_task_id: i64,
    pub main_task_title: String,
    pub cell_color: &'static str,
    pub other_events_count: usize,
}

/// Background of a month cell led by a task of this priority.
pub fn priority_color(priority: &Priority) -> &'static str {
    match priority {
        Priority::High => "#ef5350",
        Priority::Medium => "#9575cd",
        Priority::Low => "#66bb6a",
        Priority::Other(_) => "#607d8b",
    }
}

/// Chip color of a priority in the day dialog.
pub fn priority_severity(priority: &Priority) -> StatusSeverity {
    match priority {
        Priority::High => StatusSeverity::Error,
        Priority::Medium => StatusSeverity::Warning,
        Priority::Low => StatusSeverity::Success,
        Priority::Other(_) => StatusSeverity::Default,
    }
}

/// Day of a task's deadline in `tz`.
pub fn day_of<Tz: TimeZone>(task: &CalendarTask, tz: &Tz) -> NaiveDate {
    task.deadline.with_timezone(tz).date_naive()
}

/// Orders tasks the way a day lists them: priority descending, then id.
pub fn sort_for_day(tasks: &mut [&CalendarTask]) {
    tasks.sort_by(|a, b| {
        b.priority
            .rank()
            .cmp(&a.priority.rank())
            .then(a.id.cmp(&b.id))
    });
}

/// Groups tasks by local deadline day.
pub fn aggregate_by_day(tasks: &[CalendarTask]) -> BTreeMap<NaiveDate, DaySummary> {
    aggregate_by_day_in(tasks, &Local)
}

/// Groups tasks by deadline day in `tz`.
///
/// The highest-priority task (lowest id on ties) represents the day, the
/// rest are only counted.
pub fn aggregate_by_day_in<Tz: TimeZone>(
    tasks: &[CalendarTask],
    tz: &Tz,
) -> BTreeMap<NaiveDate, DaySummary> {
    let mut days: BTreeMap<NaiveDate, Vec<&CalendarTask>> = BTreeMap::new();
    for task in tasks {
        days.entry(day_of(task, tz)).or_default().push(task);
    }

    days.into_iter()
        .filter_map(|(day, mut bucket)| {
            sort_for_day(&mut bucket);
            let main = bucket.first()?;
            Some((
                day,
                DaySummary {
                    main_task_id: main.id,
                    main_task_title: main.title.clone(),
                    cell_color: priority_color(&main.priority),
                    other_events_count: bucket.len() - 1,
                },
            ))
        })
        .collect()
}

/// Tasks due on `date` in `tz`, in day order.
pub fn tasks_on<'a, Tz: TimeZone>(
    tasks: &'a [CalendarTask],
    date: NaiveDate,
    tz: &Tz,
) -> Vec<&'a CalendarTask> {
    let mut on_day: Vec<&CalendarTask> = tasks.iter().filter(|t| day_of(t, tz) == date).collect();
    sort_for_day(&mut on_day);
    on_day
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use chrono::Utc;

    fn task(id: i64, priority: &str, deadline: &str) -> CalendarTask {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "title": format!("task {id}"),
            "deadline": deadline,
            "priority": priority,
        }))
        .unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_highest_priority_leads_the_day() {
        let tasks = vec![
            task(4, "low", "2026-03-02T08:00:00Z"),
            task(2, "high", "2026-03-02T12:00:00Z"),
            task(1, "high", "2026-03-02T15:00:00Z"),
            task(3, "medium", "2026-03-03T09:00:00Z"),
        ];
        let days = aggregate_by_day_in(&tasks, &Utc);

        let first = &days[&day(2026, 3, 2)];
        assert_eq!(first.main_task_id, 1);
        assert_eq!(first.main_task_title, "task 1");
        assert_eq!(first.cell_color, "#ef5350");
        assert_eq!(first.other_events_count, 2);

        let second = &days[&day(2026, 3, 3)];
        assert_eq!(second.cell_color, "#9575cd");
        assert_eq!(second.other_events_count, 0);
    }

    #[test]
    fn test_aggregation_ignores_input_order() {
        let mut tasks = vec![
            task(7, "medium", "2026-03-10T10:00:00Z"),
            task(5, "urgent", "2026-03-10T11:00:00Z"),
            task(6, "medium", "2026-03-10T12:00:00Z"),
        ];
        let forward = aggregate_by_day_in(&tasks, &Utc);
        tasks.reverse();
        assert_eq!(aggregate_by_day_in(&tasks, &Utc), forward);
        assert_eq!(forward[&day(2026, 3, 10)].main_task_id, 6);
    }

    #[test]
    fn test_day_follows_timezone() {
        let tasks = vec![task(1, "low", "2026-03-02T22:30:00Z")];
        let minsk = FixedOffset::east_opt(3 * 3600).unwrap();

        assert!(aggregate_by_day_in(&tasks, &Utc).contains_key(&day(2026, 3, 2)));
        assert!(aggregate_by_day_in(&tasks, &minsk).contains_key(&day(2026, 3, 3)));
        assert_eq!(tasks_on(&tasks, day(2026, 3, 3), &minsk).len(), 1);
    }

    #[test]
    fn test_task_without_priority_yields_to_low() {
        let unprioritized: CalendarTask = serde_json::from_value(serde_json::json!({
            "id": 1,
            "title": "без приоритета",
            "deadline": "2026-03-04T09:00:00Z",
        }))
        .unwrap();
        let tasks = vec![unprioritized, task(2, "low", "2026-03-04T10:00:00Z")];

        let summary = &aggregate_by_day_in(&tasks, &Utc)[&day(2026, 3, 4)];
        assert_eq!(summary.main_task_id, 2);
        assert_eq!(summary.cell_color, "#66bb6a");
    }

    #[test]
    fn test_unknown_priority_is_neutral() {
        assert_eq!(priority_color(&Priority::Other("urgent".into())), "#607d8b");
        assert_eq!(priority_severity(&Priority::Low), StatusSeverity::Success);
    }
}
