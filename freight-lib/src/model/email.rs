//! Mail of the signed-in user, relayed by the backend's IMAP/SMTP bridge

use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::FixedOffset;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;

/// Folders the mail screen offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mailbox {
    #[default]
    Inbox,
    Sent,
    Trash,
}

impl Mailbox {
    pub const ALL: [Mailbox; 3] = [Self::Inbox, Self::Sent, Self::Trash];

    /// IMAP folder name sent as the `mailbox` parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inbox => "INBOX",
            Self::Sent => "INBOX.Sent",
            Self::Trash => "INBOX.Trash",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Inbox => "Входящие",
            Self::Sent => "Отправленные",
            Self::Trash => "Корзина",
        }
    }
}

impl fmt::Display for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mailbox {
    type Err = String;

    /// Accepts the folder name or a short alias (`inbox`, `sent`, `trash`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "inbox" => Ok(Self::Inbox),
            "sent" | "inbox.sent" => Ok(Self::Sent),
            "trash" | "inbox.trash" => Ok(Self::Trash),
            other => Err(format!("unknown mailbox: {}", other)),
        }
    }
}

/// Bulk operation of `POST /email/messages/action/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailAction {
    MarkRead,
    MarkUnread,
    Delete,
}

impl EmailAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MarkRead => "mark_read",
            Self::MarkUnread => "mark_unread",
            Self::Delete => "delete",
        }
    }
}

/// One message of a mailbox listing.
///
/// The bridge reports message ids as strings (IMAP sequence numbers).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EmailMessage {
    pub id: String,
    pub from: String,
    #[serde(deserialize_with = "addresses")]
    pub to: Vec<String>,
    #[serde(deserialize_with = "addresses")]
    pub cc: Vec<String>,
    pub subject: String,
    /// Date already formatted by the server for display.
    pub date: String,
    pub date_iso: Option<String>,
    pub content_preview: String,
    pub body_plain: String,
    pub body_html: String,
    pub is_read: bool,
    pub is_starred: bool,
    pub mailbox: String,
}

impl EmailMessage {
    /// Parsed `date_iso`, if the server sent a readable one.
    pub fn sent_at(&self) -> Option<DateTime<FixedOffset>> {
        self.date_iso
            .as_deref()
            .and_then(|d| DateTime::parse_from_rfc3339(d).ok())
    }
}

/// Address lists come either as a header string (`a@x, b@y`) or as a list.
fn addresses<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Addresses {
        Header(String),
        List(Vec<String>),
        Missing(()),
    }

    let split = |s: &str| -> Vec<String> {
        s.split(',')
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(String::from)
            .collect()
    };
    Ok(match Addresses::deserialize(deserializer)? {
        Addresses::Header(header) => split(&header),
        Addresses::List(list) => list.iter().flat_map(|a| split(a)).collect(),
        Addresses::Missing(()) => Vec::new(),
    })
}

/// A page of `GET /email/messages/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EmailPage {
    pub emails: Vec<EmailMessage>,
    pub total_count: u64,
}

/// A message to send from the user's own address.
///
/// `documents` are ids of stored documents the server attaches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub content: String,
    pub is_html: bool,
    pub documents: Vec<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_addresses_from_header_or_list() {
        let page: EmailPage = serde_json::from_value(json!({
            "emails": [
                {"id": "12", "from": "a@x.by", "to": "b@x.by, c@x.by", "subject": "Счёт",
                 "date_iso": "2026-03-02T09:00:00+03:00"},
                {"id": "13", "to": ["d@x.by"], "cc": null}
            ],
            "total_count": 40
        }))
        .unwrap();

        assert_eq!(page.total_count, 40);
        assert_eq!(page.emails[0].to, vec!["b@x.by", "c@x.by"]);
        assert_eq!(page.emails[0].sent_at().map(|d| d.timestamp()), Some(1_772_431_200));
        assert_eq!(page.emails[1].to, vec!["d@x.by"]);
        assert!(page.emails[1].cc.is_empty());
        assert!(page.emails[1].sent_at().is_none());
    }

    #[test]
    fn test_mailbox_aliases() {
        assert_eq!("sent".parse::<Mailbox>(), Ok(Mailbox::Sent));
        assert_eq!("INBOX.Trash".parse::<Mailbox>(), Ok(Mailbox::Trash));
        assert!("spam".parse::<Mailbox>().is_err());
        assert_eq!(Mailbox::default().as_str(), "INBOX");
    }
}
