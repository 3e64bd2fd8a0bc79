use std::sync::Arc;

use freight_lib::api::DEFAULT_EMAIL_LIMIT;
use freight_lib::error::Error;
use freight_lib::model::EmailAction;
use freight_lib::model::EmailMessage;
use freight_lib::model::Mailbox;

use super::EmailBackend;
use super::failure_message;

const LOAD_FAILED_MESSAGE: &str = "Не удалось загрузить письма.";
const ACTION_FALLBACK: &str = "Попробуйте позже.";

/// One folder of the mail screen, loaded a page at a time.
pub struct MailboxView {
    backend: Arc<dyn EmailBackend>,
    mailbox: Mailbox,
    limit: u32,
    emails: Vec<EmailMessage>,
    total: u64,
    loading: bool,
    error: Option<String>,
    selected: Vec<String>,
    opened: Option<String>,
}

impl MailboxView {
    pub fn new(backend: Arc<dyn EmailBackend>) -> Self {
        Self {
            backend,
            mailbox: Mailbox::Inbox,
            limit: DEFAULT_EMAIL_LIMIT,
            emails: Vec::new(),
            total: 0,
            loading: false,
            error: None,
            selected: Vec::new(),
            opened: None,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit.max(1);
        self
    }

    pub fn mailbox(&self) -> Mailbox {
        self.mailbox
    }

    pub fn emails(&self) -> &[EmailMessage] {
        &self.emails
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn has_more(&self) -> bool {
        (self.emails.len() as u64) < self.total
    }

    /// Switches folder and loads its first page.
    pub async fn select_mailbox(&mut self, mailbox: Mailbox) {
        self.mailbox = mailbox;
        self.load().await;
    }

    /// Reloads the first page, dropping selection and the opened message.
    pub async fn load(&mut self) {
        self.selected.clear();
        self.opened = None;
        if let Some((emails, total)) = self.fetch(0).await {
            self.emails = emails;
            self.total = total;
        }
    }

    /// Appends the next page. Does nothing once everything is loaded.
    pub async fn load_more(&mut self) {
        if !self.has_more() {
            return;
        }
        let offset = u32::try_from(self.emails.len()).unwrap_or(u32::MAX);
        if let Some((emails, total)) = self.fetch(offset).await {
            self.emails.extend(emails);
            self.total = total;
        }
    }

    async fn fetch(&mut self, offset: u32) -> Option<(Vec<EmailMessage>, u64)> {
        self.loading = true;
        let result = self.backend.list(self.mailbox, self.limit, offset).await;
        self.loading = false;
        match result {
            Ok(page) => {
                log::debug!(
                    "[email] {} messages of {} in {}",
                    page.emails.len(),
                    page.total_count,
                    self.mailbox
                );
                self.error = None;
                Some((page.emails, page.total_count))
            }
            Err(e) => {
                log::error!("[email] failed to load {}: {}", self.mailbox, e);
                self.error = Some(failure_message(&e, LOAD_FAILED_MESSAGE, ACTION_FALLBACK));
                None
            }
        }
    }

    /// Toggles a message's checkbox. Returns whether it is now checked.
    pub fn toggle(&mut self, id: &str) -> bool {
        if let Some(pos) = self.selected.iter().position(|s| s == id) {
            self.selected.remove(pos);
            return false;
        }
        if !self.emails.iter().any(|e| e.id == id) {
            return false;
        }
        self.selected.push(id.to_string());
        true
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn open(&mut self, id: &str) -> Option<&EmailMessage> {
        let email = self.emails.iter().find(|e| e.id == id)?;
        self.opened = Some(email.id.clone());
        Some(email)
    }

    pub fn opened(&self) -> Option<&EmailMessage> {
        let id = self.opened.as_deref()?;
        self.emails.iter().find(|e| e.id == id)
    }

    /// Runs `action` on the checked messages and reloads the folder.
    ///
    /// Without a selection nothing is sent.
    pub async fn apply(&mut self, action: EmailAction) -> Result<(), Error> {
        let ids = self.selected.clone();
        self.apply_to(action, &ids).await
    }

    /// Runs `action` on explicit message ids and reloads the folder.
    pub async fn apply_to(&mut self, action: EmailAction, ids: &[String]) -> Result<(), Error> {
        if ids.is_empty() {
            return Ok(());
        }
        if let Err(e) = self.backend.action(action, ids, self.mailbox).await {
            log::error!("[email] {} failed in {}: {}", action.as_str(), self.mailbox, e);
            let prefix = format!("Не удалось выполнить действие \"{}\".", action.as_str());
            self.error = Some(failure_message(&e, &prefix, ACTION_FALLBACK));
            return Err(e);
        }
        self.load().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::email::fake::FakeMail;

    #[tokio::test]
    async fn test_pages_until_total() {
        let backend = Arc::new(FakeMail::with_messages(5));
        let mut view = MailboxView::new(backend.clone()).with_limit(2);

        view.select_mailbox(Mailbox::Sent).await;
        assert_eq!(view.emails().len(), 2);
        assert!(view.has_more());

        view.load_more().await;
        view.load_more().await;
        assert_eq!(view.emails().len(), 5);
        assert!(!view.has_more());
        view.load_more().await;

        let calls = backend.calls.lock().unwrap().clone();
        assert_eq!(
            calls,
            vec!["list INBOX.Sent 2 0", "list INBOX.Sent 2 2", "list INBOX.Sent 2 4"]
        );
    }

    #[tokio::test]
    async fn test_action_on_selection_reloads() {
        let backend = Arc::new(FakeMail::with_messages(3));
        let mut view = MailboxView::new(backend.clone());
        view.load().await;

        assert!(view.toggle("1"));
        assert!(view.toggle("3"));
        assert!(!view.toggle("9"));
        view.apply(EmailAction::Delete).await.unwrap();

        let actions = backend.actions.lock().unwrap().clone();
        assert_eq!(
            actions,
            vec![(EmailAction::Delete, vec!["1".to_string(), "3".to_string()], Mailbox::Inbox)]
        );
        assert!(view.selected().is_empty());
    }

    #[tokio::test]
    async fn test_failures_show_server_error() {
        let mut view = MailboxView::new(Arc::new(FakeMail::failing()));
        view.load().await;
        assert_eq!(
            view.error(),
            Some("Не удалось загрузить письма. Сервер почты недоступен")
        );

        let ids = vec!["1".to_string()];
        assert!(view.apply_to(EmailAction::MarkRead, &ids).await.is_err());
        assert_eq!(
            view.error(),
            Some("Не удалось выполнить действие \"mark_read\". Сервер почты недоступен")
        );
    }

    #[tokio::test]
    async fn test_open_message() {
        let mut view = MailboxView::new(Arc::new(FakeMail::with_messages(2)));
        view.load().await;
        assert_eq!(view.open("2").map(|e| e.subject.as_str()), Some("Письмо 2"));
        assert_eq!(view.opened().map(|e| e.id.as_str()), Some("2"));
        assert!(view.open("5").is_none());
    }
}
