use std::sync::Arc;

use anyhow::anyhow;
use anyhow::bail;
use freight_desk::email::ComposeDraft;
use freight_desk::email::Composer;
use freight_desk::email::EmailBackend;
use freight_desk::email::MailboxView;
use freight_desk::email::plain_to_html;
use freight_lib::model::EmailAction;
use freight_lib::model::EmailMessage;
use freight_lib::model::Mailbox;

use crate::app::App;
use crate::cli::EmailCommand;
use crate::cli::MailAction;

const PREVIEW_WIDTH: usize = 50;

pub async fn run(app: &App, command: EmailCommand) -> anyhow::Result<()> {
    app.require_user()?;
    let backend: Arc<dyn EmailBackend> = app.client.clone();

    match command {
        EmailCommand::List {
            mailbox,
            limit,
            offset,
        } => list(backend, mailbox, limit, offset).await,
        EmailCommand::Show { id, mailbox } => {
            let email = find(backend, mailbox, &id).await?;
            print_message(&email);
            Ok(())
        }
        EmailCommand::Send {
            to,
            subject,
            body,
            documents,
        } => {
            let draft = ComposeDraft {
                subject,
                content: plain_to_html(&body_or_stdin(body)?),
                documents,
                ..ComposeDraft::to(to)
            };
            send(backend, draft).await
        }
        EmailCommand::Reply {
            id,
            all,
            body,
            mailbox,
        } => {
            let email = find(backend.clone(), mailbox, &id).await?;
            let mut draft = if all {
                ComposeDraft::reply_all(&email)
            } else {
                ComposeDraft::reply(&email)
            };
            draft.content = format!("{}{}", plain_to_html(&body_or_stdin(body)?), draft.content);
            send(backend, draft).await
        }
        EmailCommand::Forward {
            id,
            to,
            body,
            mailbox,
        } => {
            let email = find(backend.clone(), mailbox, &id).await?;
            let mut draft = ComposeDraft::forward(&email);
            draft.to = to;
            let note = body.map(|b| plain_to_html(&b)).unwrap_or_default();
            draft.content = format!("{}{}", note, draft.content);
            send(backend, draft).await
        }
        EmailCommand::Mark {
            action,
            ids,
            mailbox,
        } => {
            let action = match action {
                MailAction::Read => EmailAction::MarkRead,
                MailAction::Unread => EmailAction::MarkUnread,
                MailAction::Delete => EmailAction::Delete,
            };
            let mut view = MailboxView::new(backend);
            view.select_mailbox(mailbox).await;
            if view.apply_to(action, &ids).await.is_err() {
                bail!("{}", view.error().unwrap_or_default());
            }
            println!("Готово: {} писем", ids.len());
            Ok(())
        }
    }
}

async fn list(backend: Arc<dyn EmailBackend>, mailbox: Mailbox, limit: u32, offset: u32) -> anyhow::Result<()> {
    let page = backend
        .list(mailbox, limit, offset)
        .await
        .map_err(|e| anyhow!(e.user_message()))?;
    println!("{} ({})", mailbox.label(), page.total_count);
    if page.emails.is_empty() {
        println!("Писем нет");
    }
    for email in &page.emails {
        let mark = if email.is_read { ' ' } else { '*' };
        println!(
            "{}{:>6}  {:<30}  {}",
            mark,
            email.id,
            shorten(&email.from, 30),
            shorten(&email.subject, PREVIEW_WIDTH)
        );
    }
    Ok(())
}

/// Looks a message up page by page.
async fn find(backend: Arc<dyn EmailBackend>, mailbox: Mailbox, id: &str) -> anyhow::Result<EmailMessage> {
    let mut view = MailboxView::new(backend).with_limit(50);
    view.select_mailbox(mailbox).await;
    loop {
        if let Some(error) = view.error() {
            bail!("{}", error);
        }
        if let Some(email) = view.open(id) {
            return Ok(email.clone());
        }
        if !view.has_more() {
            bail!("Письмо {} не найдено в папке «{}»", id, mailbox.label());
        }
        view.load_more().await;
    }
}

async fn send(backend: Arc<dyn EmailBackend>, draft: ComposeDraft) -> anyhow::Result<()> {
    let to = draft.to.clone();
    let mut composer = Composer::new(backend);
    composer.open(draft);
    if !composer.send().await {
        bail!("{}", composer.error().unwrap_or_default());
    }
    println!("Письмо отправлено: {}", to);
    Ok(())
}

fn body_or_stdin(body: Option<String>) -> anyhow::Result<String> {
    match body {
        Some(body) => Ok(body),
        None => Ok(std::io::read_to_string(std::io::stdin())?),
    }
}

fn print_message(email: &EmailMessage) {
    println!("От: {}", email.from);
    println!("Кому: {}", email.to.join(", "));
    if !email.cc.is_empty() {
        println!("Копия: {}", email.cc.join(", "));
    }
    println!("Дата: {}", email.date);
    println!("Тема: {}", email.subject);
    println!();
    if email.body_plain.is_empty() {
        println!("{}", email.body_html);
    } else {
        println!("{}", email.body_plain);
    }
}

fn shorten(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut short: String = text.chars().take(width.saturating_sub(1)).collect();
    short.push('…');
    short
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shorten_counts_chars() {
        assert_eq!(shorten("Счёт", 10), "Счёт");
        assert_eq!(shorten("Счёт на оплату", 5), "Счёт…");
    }
}
