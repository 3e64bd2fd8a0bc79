use std::sync::Arc;

use freight_lib::model::EmailMessage;
use freight_lib::model::OutgoingEmail;

use super::EmailBackend;
use super::failure_message;
use crate::calendar::ContactKind;
use crate::calendar::ContactRef;

pub const MISSING_FIELDS_MESSAGE: &str = "Заполните поля: Кому, Тема, Текст.";
const SEND_FAILED_PREFIX: &str = "Не удалось отправить письмо.";
const SEND_FAILED_FALLBACK: &str = "Проверьте настройки или попробуйте позже.";
const UNKNOWN_SENDER: &str = "Неизвестный отправитель";
const UNKNOWN_DATE: &str = "Неизвестная дата";
const NO_SUBJECT: &str = "Без темы";

/// Contents of the compose dialog. `content` is HTML.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposeDraft {
    pub to: String,
    pub subject: String,
    pub content: String,
    pub documents: Vec<i64>,
    /// Id of the message being answered or forwarded.
    pub source: Option<String>,
}

impl ComposeDraft {
    /// Blank message to `address`.
    pub fn to(address: impl Into<String>) -> Self {
        Self {
            to: address.into(),
            ..Self::default()
        }
    }

    /// Draft opened from an email contact chip. Other contact kinds have none.
    pub fn from_contact(contact: &ContactRef) -> Option<Self> {
        (contact.kind == ContactKind::Email).then(|| Self::to(contact.value.clone()))
    }

    pub fn reply(email: &EmailMessage) -> Self {
        Self {
            to: email.from.clone(),
            subject: format!("Re: {}", subject_or_default(email)),
            content: quoted_html(email),
            documents: Vec::new(),
            source: Some(email.id.clone()),
        }
    }

    /// Reply to the sender and every other recipient, without duplicates.
    pub fn reply_all(email: &EmailMessage) -> Self {
        let mut recipients: Vec<&str> = Vec::new();
        let all = std::iter::once(email.from.as_str())
            .chain(email.to.iter().map(String::as_str))
            .chain(email.cc.iter().map(String::as_str));
        for address in all.filter(|a| !a.is_empty()) {
            if !recipients.contains(&address) {
                recipients.push(address);
            }
        }
        Self {
            to: recipients.join(", "),
            ..Self::reply(email)
        }
    }

    pub fn forward(email: &EmailMessage) -> Self {
        Self {
            to: String::new(),
            subject: format!("Fwd: {}", subject_or_default(email)),
            content: quoted_html(email),
            documents: Vec::new(),
            source: Some(email.id.clone()),
        }
    }

    /// Whether every field the server requires is filled.
    pub fn is_complete(&self) -> bool {
        !self.to.trim().is_empty() && !self.subject.trim().is_empty() && !self.content.trim().is_empty()
    }

    fn to_outgoing(&self) -> OutgoingEmail {
        OutgoingEmail {
            to: self.to.trim().to_string(),
            subject: self.subject.trim().to_string(),
            content: self.content.clone(),
            is_html: true,
            documents: self.documents.clone(),
        }
    }
}

fn subject_or_default(email: &EmailMessage) -> &str {
    if email.subject.is_empty() { NO_SUBJECT } else { &email.subject }
}

/// The original message below a separator, as plain text.
pub fn quote(email: &EmailMessage) -> String {
    let sender = if email.from.is_empty() { UNKNOWN_SENDER } else { &email.from };
    let date = match email.sent_at() {
        Some(at) => at.format("%d.%m.%Y, %H:%M:%S").to_string(),
        None if !email.date.is_empty() => email.date.clone(),
        None => UNKNOWN_DATE.to_string(),
    };
    format!(
        "\n\n----- Исходное сообщение -----\nОт: {}\nДата: {}\nТема: {}\n\n{}",
        sender,
        date,
        subject_or_default(email),
        email.body_plain
    )
}

fn quoted_html(email: &EmailMessage) -> String {
    format!("<p><br></p>{}", quote(email).replace('\n', "<br>"))
}

/// Plain text typed outside the editor, as the HTML the server expects.
pub fn plain_to_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\n', "<br>")
}

/// The compose dialog shared by the mail screen and contact chips.
pub struct Composer {
    backend: Arc<dyn EmailBackend>,
    draft: Option<ComposeDraft>,
    error: Option<String>,
}

impl Composer {
    pub fn new(backend: Arc<dyn EmailBackend>) -> Self {
        Self {
            backend,
            draft: None,
            error: None,
        }
    }

    /// Opens the dialog, replacing any unsent draft.
    pub fn open(&mut self, draft: ComposeDraft) {
        self.error = None;
        self.draft = Some(draft);
    }

    /// Opens a message to the contact if it is an email address.
    pub fn open_for_contact(&mut self, contact: &ContactRef) -> bool {
        match ComposeDraft::from_contact(contact) {
            Some(draft) => {
                self.open(draft);
                true
            }
            None => false,
        }
    }

    pub fn close(&mut self) {
        self.draft = None;
        self.error = None;
    }

    pub fn is_open(&self) -> bool {
        self.draft.is_some()
    }

    pub fn draft(&self) -> Option<&ComposeDraft> {
        self.draft.as_ref()
    }

    pub fn draft_mut(&mut self) -> Option<&mut ComposeDraft> {
        self.draft.as_mut()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Replaces the attached documents.
    pub fn attach_documents(&mut self, ids: Vec<i64>) {
        if let Some(draft) = self.draft.as_mut() {
            draft.documents = ids;
        }
    }

    /// Sends the draft. Returns whether it went out.
    ///
    /// The dialog closes on success and stays open with an error otherwise.
    /// An incomplete draft is not sent.
    pub async fn send(&mut self) -> bool {
        let Some(draft) = self.draft.as_ref() else {
            return false;
        };
        if !draft.is_complete() {
            self.error = Some(MISSING_FIELDS_MESSAGE.to_string());
            return false;
        }

        let email = draft.to_outgoing();
        match self.backend.send(&email).await {
            Ok(()) => {
                log::info!("[email] sent to {}", email.to);
                self.close();
                true
            }
            Err(e) => {
                log::error!("[email] failed to send to {}: {}", email.to, e);
                self.error = Some(failure_message(&e, SEND_FAILED_PREFIX, SEND_FAILED_FALLBACK));
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::DescriptionPart;
    use crate::calendar::render_description;
    use crate::email::fake::FakeMail;

    fn message() -> EmailMessage {
        EmailMessage {
            id: "42".into(),
            from: "info@vector.by".into(),
            to: vec!["me@freight.by".into(), "info@vector.by".into()],
            cc: vec!["buh@vector.by".into()],
            subject: "Счёт".into(),
            date_iso: Some("2026-03-02T09:15:00+03:00".into()),
            body_plain: "Оплатите\nсегодня".into(),
            ..EmailMessage::default()
        }
    }

    fn contact(text: &str) -> ContactRef {
        match render_description(text).pop() {
            Some(DescriptionPart::Contact(c)) => c,
            other => panic!("no contact in {text:?}: {other:?}"),
        }
    }

    #[test]
    fn test_email_contact_opens_composer() {
        let mut composer = Composer::new(Arc::new(FakeMail::default()));

        let email = contact("[Контакт: Клиент \"Вектор\" - email info@vector.by]");
        assert!(composer.open_for_contact(&email));
        assert_eq!(composer.draft().map(|d| d.to.as_str()), Some("info@vector.by"));

        composer.close();
        let phone = contact("[Контакт: Перевозчик \"ТрансЛайн\" - телефон +375291112233]");
        assert!(!composer.open_for_contact(&phone));
        assert!(!composer.is_open());
    }

    #[test]
    fn test_reply_quotes_original() {
        let draft = ComposeDraft::reply(&message());
        assert_eq!(draft.to, "info@vector.by");
        assert_eq!(draft.subject, "Re: Счёт");
        assert_eq!(draft.source.as_deref(), Some("42"));
        assert_eq!(
            draft.content,
            "<p><br></p><br><br>----- Исходное сообщение -----<br>От: info@vector.by<br>\
             Дата: 02.03.2026, 09:15:00<br>Тема: Счёт<br><br>Оплатите<br>сегодня"
        );
    }

    #[test]
    fn test_reply_all_and_forward() {
        let all = ComposeDraft::reply_all(&message());
        assert_eq!(all.to, "info@vector.by, me@freight.by, buh@vector.by");

        let forward = ComposeDraft::forward(&EmailMessage::default());
        assert!(forward.to.is_empty());
        assert_eq!(forward.subject, "Fwd: Без темы");
        assert!(forward.content.contains("От: Неизвестный отправитель"));
        assert!(forward.content.contains("Дата: Неизвестная дата"));
    }

    #[tokio::test]
    async fn test_incomplete_draft_is_not_sent() {
        let backend = Arc::new(FakeMail::default());
        let mut composer = Composer::new(backend.clone());
        composer.open(ComposeDraft::to("info@vector.by"));

        assert!(!composer.send().await);
        assert_eq!(composer.error(), Some(MISSING_FIELDS_MESSAGE));
        assert!(composer.is_open());
        assert!(backend.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_send_closes_dialog() {
        let backend = Arc::new(FakeMail::default());
        let mut composer = Composer::new(backend.clone());
        composer.open(ComposeDraft {
            subject: " Договор ".into(),
            content: plain_to_html("Добрый день,\nдоговор <во вложении>"),
            ..ComposeDraft::to("info@vector.by")
        });
        composer.attach_documents(vec![3]);

        assert!(composer.send().await);
        assert!(!composer.is_open());
        let sent = backend.sent.lock().unwrap();
        assert_eq!(sent[0].subject, "Договор");
        assert_eq!(sent[0].content, "Добрый день,<br>договор &lt;во вложении&gt;");
        assert_eq!(sent[0].documents, vec![3]);
        assert!(sent[0].is_html);
    }

    #[tokio::test]
    async fn test_send_failure_keeps_draft() {
        let mut composer = Composer::new(Arc::new(FakeMail::failing()));
        composer.open(ComposeDraft {
            subject: "s".into(),
            content: "c".into(),
            ..ComposeDraft::to("a@b.by")
        });

        assert!(!composer.send().await);
        assert!(composer.is_open());
        assert_eq!(
            composer.error(),
            Some("Не удалось отправить письмо. Сервер почты недоступен")
        );
    }
}
