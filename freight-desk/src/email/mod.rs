//! Mail screen and the compose dialog

mod compose;
mod mailbox;

pub use compose::*;
pub use mailbox::*;

use async_trait::async_trait;
use freight_lib::CrmClient;
use freight_lib::error::Error;
use freight_lib::model::EmailAction;
use freight_lib::model::EmailPage;
use freight_lib::model::Mailbox;
use freight_lib::model::OutgoingEmail;

/// Mail endpoints the screens need.
#[async_trait]
pub trait EmailBackend: Send + Sync {
    async fn list(&self, mailbox: Mailbox, limit: u32, offset: u32) -> Result<EmailPage, Error>;
    async fn send(&self, email: &OutgoingEmail) -> Result<(), Error>;
    async fn action(&self, action: EmailAction, ids: &[String], mailbox: Mailbox) -> Result<(), Error>;
}

#[async_trait]
impl EmailBackend for CrmClient {
    async fn list(&self, mailbox: Mailbox, limit: u32, offset: u32) -> Result<EmailPage, Error> {
        self.list_emails(mailbox, limit, offset).await
    }

    async fn send(&self, email: &OutgoingEmail) -> Result<(), Error> {
        self.send_email(email).await
    }

    async fn action(&self, action: EmailAction, ids: &[String], mailbox: Mailbox) -> Result<(), Error> {
        self.email_action(action, ids, mailbox).await
    }
}

/// `"{prefix} {server error}"`, or the fallback when the server gave none.
fn failure_message(error: &Error, prefix: &str, fallback: &str) -> String {
    let detail = match error {
        Error::Api(api) if api.is_network() => Some(error.user_message()),
        Error::Api(api) => api.server_message(),
        _ => None,
    };
    format!("{} {}", prefix, detail.unwrap_or_else(|| fallback.to_string()))
}
