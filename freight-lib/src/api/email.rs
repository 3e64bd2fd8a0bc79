//! Mail relayed through the backend

use reqwest::multipart::Form;
use serde::Serialize;

use crate::CrmClient;
use crate::error::Error;
use crate::model::EmailAction;
use crate::model::EmailPage;
use crate::model::Mailbox;
use crate::model::OutgoingEmail;

const MESSAGES_PATH: &str = "/email/messages/";
const SEND_PATH: &str = "/email/messages/send/";
const ACTION_PATH: &str = "/email/messages/action/";

/// Page size the server uses when none is given.
pub const DEFAULT_EMAIL_LIMIT: u32 = 20;

#[derive(Serialize)]
struct ActionBody<'a> {
    action: EmailAction,
    email_ids: &'a [String],
    mailbox: &'a str,
}

impl CrmClient {
    /// Lists one page of a mailbox, newest first.
    pub async fn list_emails(&self, mailbox: Mailbox, limit: u32, offset: u32) -> Result<EmailPage, Error> {
        let query = vec![
            ("mailbox".to_string(), mailbox.as_str().to_string()),
            ("limit".to_string(), limit.to_string()),
            ("offset".to_string(), offset.to_string()),
        ];
        self.get_json(MESSAGES_PATH, &query).await
    }

    /// Sends a message from the user's configured address.
    ///
    /// Goes out as a multipart form, attached document ids as `documents[]`.
    pub async fn send_email(&self, email: &OutgoingEmail) -> Result<(), Error> {
        let mut form = Form::new()
            .text("to", email.to.clone())
            .text("subject", email.subject.clone())
            .text("content", email.content.clone())
            .text("is_html", email.is_html.to_string());
        for id in &email.documents {
            form = form.text("documents[]", id.to_string());
        }
        log::info!(
            "[api] sending email to {} with {} document(s)",
            email.to,
            email.documents.len()
        );
        self.post_multipart(SEND_PATH, form).await?;
        Ok(())
    }

    /// Marks or deletes messages of a mailbox.
    pub async fn email_action(&self, action: EmailAction, ids: &[String], mailbox: Mailbox) -> Result<(), Error> {
        log::info!("[api] email {} on {:?} in {}", action.as_str(), ids, mailbox);
        let body = ActionBody {
            action,
            email_ids: ids,
            mailbox: mailbox.as_str(),
        };
        let _: serde_json::Value = self.post_json(ACTION_PATH, &body).await?;
        Ok(())
    }
}
