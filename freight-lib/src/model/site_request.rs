//! Leads submitted through the public site form

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::Record;

/// Processing state of a site request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    New,
    InProgress,
    Completed,
    Rejected,
}

impl RequestStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::New => "Новая",
            Self::InProgress => "В обработке",
            Self::Completed => "Завершена",
            Self::Rejected => "Отклонена",
        }
    }

    /// Only fresh requests can be taken into work or converted to a client.
    pub fn can_process(self) -> bool {
        self == Self::New
    }
}

/// A lead posted by the public site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteRequest {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub comment: String,
    pub status: RequestStatus,
    #[serde(default)]
    pub source_domain: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl SiteRequest {
    /// Prefilled body of the "create client" form opened from this request.
    ///
    /// The requester becomes the company name and the single manager contact.
    pub fn to_client_draft(&self) -> Record {
        let contact = serde_json::json!({
            "type": "manager",
            "name": self.name,
            "phone": self.phone,
            "email": self.email,
        });
        Record::new()
            .set("company_name", self.name.clone())
            .set("comments", self.comment.clone())
            .set("contacts", serde_json::Value::Array(vec![contact]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_draft() {
        let request: SiteRequest = serde_json::from_value(json!({
            "id": 9,
            "name": "ООО Ромашка",
            "phone": "+375291112233",
            "email": "info@romashka.by",
            "comment": "Нужна перевозка",
            "status": "in_progress",
            "source_domain": "example.by",
            "created_at": "2026-01-10T08:00:00Z"
        }))
        .unwrap();

        assert_eq!(request.status, RequestStatus::InProgress);
        assert!(!request.status.can_process());

        let draft = request.to_client_draft();
        assert_eq!(draft.get_str("company_name").unwrap(), Some("ООО Ромашка"));
        assert_eq!(draft.get("contacts").unwrap()[0]["type"], "manager");
    }
}
