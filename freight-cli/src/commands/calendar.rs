use anyhow::Context;
use anyhow::bail;
use chrono::Datelike;
use chrono::Local;
use chrono::NaiveDate;
use freight_desk::calendar::CalendarView;
use freight_desk::calendar::DescriptionPart;
use freight_desk::calendar::render_description;
use freight_desk::email::ComposeDraft;

use crate::app::App;

/// First and last day of a `YYYY-MM` month.
fn month_range(month: &str) -> anyhow::Result<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::parse_from_str(&format!("{}-01", month.trim()), "%Y-%m-%d")
        .with_context(|| format!("expected YYYY-MM, got '{}'", month))?;
    let Some(next) = first.checked_add_months(chrono::Months::new(1)) else {
        bail!("month out of range: {}", month);
    };
    let Some(last) = next.pred_opt() else {
        bail!("month out of range: {}", month);
    };
    Ok((first, last))
}

fn describe(text: &str) -> String {
    render_description(text)
        .into_iter()
        .map(|part| match part {
            DescriptionPart::Text(t) => t,
            DescriptionPart::Contact(c) => match (ComposeDraft::from_contact(&c), c.link()) {
                (Some(draft), _) => format!("{}{} <freight email send --to {}>]", c.prefix(), c.value, draft.to),
                (None, Some(link)) => format!("{}{} <{}>]", c.prefix(), c.value, link),
                (None, None) => c.to_string(),
            },
        })
        .collect()
}

pub async fn show(app: &App, month: Option<&str>, day: Option<&str>) -> anyhow::Result<()> {
    let user = app.require_user()?.clone();
    let today = Local::now().date_naive();
    let (first, last) = match month {
        Some(m) => month_range(m)?,
        None => month_range(&format!("{:04}-{:02}", today.year(), today.month()))?,
    };

    let mut view = CalendarView::new(app.client.clone(), user);
    view.set_range(Some((first, last)));
    view.load().await;
    if let Some(error) = view.error() {
        bail!("{}", error);
    }

    println!("{} - {}", first.format("%d.%m.%Y"), last.format("%d.%m.%Y"));
    if view.summaries().is_empty() {
        println!("Задач нет");
    }
    for (date, summary) in view.summaries() {
        let more = if summary.other_events_count > 0 {
            format!(" (+{})", summary.other_events_count)
        } else {
            String::new()
        };
        println!("{}  {}{}", date.format("%d.%m"), summary.main_task_title, more);
    }

    if let Some(day) = day {
        let date = NaiveDate::parse_from_str(day.trim(), "%Y-%m-%d")
            .with_context(|| format!("expected YYYY-MM-DD, got '{}'", day))?;
        println!();
        println!("Задачи на {}:", date.format("%d.%m.%Y"));
        for task in view.open_day(date) {
            println!(
                "#{} {} [{}] {}",
                task.id,
                task.deadline.with_timezone(&Local).format("%H:%M"),
                task.priority.label(),
                task.title
            );
            if !task.description.is_empty() {
                println!("    {}", describe(&task.description));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_range() {
        let (first, last) = month_range("2024-02").unwrap();
        assert_eq!(first, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert!(month_range("2024-13").is_err());
    }

    #[test]
    fn test_describe_links_contacts() {
        let text = "Позвонить [Контакт: Клиент \"Вектор\" - телефон +375291112233]";
        assert_eq!(
            describe(text),
            "Позвонить [Контакт: Клиент \"Вектор\" - телефон +375291112233 <tel:+375291112233>]"
        );
        assert_eq!(
            describe("[Контакт: Перевозчик \"ТрансЛайн\" - email info@tl.by]"),
            "[Контакт: Перевозчик \"ТрансЛайн\" - email info@tl.by <freight email send --to info@tl.by>]"
        );
    }
}
