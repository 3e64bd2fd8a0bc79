//! Contact references embedded in task descriptions.
//!
//! The contact picker inserts `[Контакт: Клиент "Name" - type value]` into
//! free text; the day dialog turns those back into clickable parts.

use std::fmt;
use std::sync::LazyLock;

use freight_lib::model::Record;
use regex::Regex;

static CONTACT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\[Контакт: (Клиент|Перевозчик) "(.*?)" - (.*?) (\S+)\]"#)
        .expect("invalid contact regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactEntity {
    Client,
    Carrier,
}

impl ContactEntity {
    pub fn label(self) -> &'static str {
        match self {
            Self::Client => "Клиент",
            Self::Carrier => "Перевозчик",
        }
    }

    fn from_label(label: &str) -> Option<Self> {
        match label {
            "Клиент" => Some(Self::Client),
            "Перевозчик" => Some(Self::Carrier),
            _ => None,
        }
    }
}

/// How a contact value can be acted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    Email,
    Phone,
    Plain,
}

impl ContactKind {
    fn classify(contact_type: &str) -> Self {
        let lower = contact_type.to_lowercase();
        if lower.contains("email") {
            Self::Email
        } else if lower.contains("телефон") {
            Self::Phone
        } else {
            Self::Plain
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRef {
    pub entity: ContactEntity,
    pub name: String,
    pub contact_type: String,
    pub value: String,
    pub kind: ContactKind,
}

impl ContactRef {
    /// Text in front of the value, e.g. `[Контакт: Клиент "Name" - email `.
    pub fn prefix(&self) -> String {
        format!(
            "[Контакт: {} \"{}\" - {} ",
            self.entity.label(),
            self.name,
            self.contact_type
        )
    }

    /// Hover text naming the entity.
    pub fn tooltip(&self) -> String {
        format!("{} \"{}\"", self.entity.label(), self.name)
    }

    /// `mailto:` or `tel:` link for actionable kinds.
    pub fn link(&self) -> Option<String> {
        match self.kind {
            ContactKind::Email => Some(format!("mailto:{}", self.value)),
            ContactKind::Phone => Some(format!("tel:{}", self.value)),
            ContactKind::Plain => None,
        }
    }
}

impl fmt::Display for ContactRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&contact_reference(
            self.entity,
            &self.name,
            &self.contact_type,
            &self.value,
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptionPart {
    Text(String),
    Contact(ContactRef),
}

/// Splits a description into plain text and contact references.
pub fn render_description(text: &str) -> Vec<DescriptionPart> {
    let mut parts = Vec::new();
    let mut last = 0;

    for caps in CONTACT_REGEX.captures_iter(text) {
        let (Some(whole), Some(entity), Some(name), Some(contact_type), Some(value)) =
            (caps.get(0), caps.get(1), caps.get(2), caps.get(3), caps.get(4))
        else {
            continue;
        };
        let Some(entity) = ContactEntity::from_label(entity.as_str()) else {
            continue;
        };

        if whole.start() > last {
            parts.push(DescriptionPart::Text(text[last..whole.start()].to_string()));
        }
        parts.push(DescriptionPart::Contact(ContactRef {
            entity,
            name: name.as_str().to_string(),
            contact_type: contact_type.as_str().to_string(),
            value: value.as_str().to_string(),
            kind: ContactKind::classify(contact_type.as_str()),
        }));
        last = whole.end();
    }

    if last < text.len() {
        parts.push(DescriptionPart::Text(text[last..].to_string()));
    }
    parts
}

/// Builds the reference the contact picker inserts into a description.
pub fn contact_reference(
    entity: ContactEntity,
    name: &str,
    contact_type: &str,
    value: &str,
) -> String {
    format!(
        "[Контакт: {} \"{}\" - {} {}]",
        entity.label(),
        name,
        contact_type,
        value
    )
}

/// Name a client or carrier is referred to by: its company name, else the
/// full name of its user account.
pub fn entity_name(entity: &Record) -> String {
    if let Some(name) = entity.display("company_name") {
        return name;
    }
    let user = entity.get_object("user").ok().flatten().unwrap_or_default();
    let first = user.display("first_name").unwrap_or_default();
    let last = user.display("last_name").unwrap_or_default();
    format!("{first} {last}").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_one_part() {
        assert_eq!(
            render_description("Позвонить утром"),
            vec![DescriptionPart::Text("Позвонить утром".into())]
        );
        assert!(render_description("").is_empty());
    }

    #[test]
    fn test_contacts_between_text() {
        let text = "Связаться [Контакт: Клиент \"ООО Ромашка\" - email info@romashka.by] и \
                    [Контакт: Перевозчик \"ТрансЛайн\" - Рабочий телефон +375291234567].";
        let parts = render_description(text);

        assert_eq!(parts.len(), 5);
        assert_eq!(parts[0], DescriptionPart::Text("Связаться ".into()));
        let DescriptionPart::Contact(email) = &parts[1] else {
            panic!("expected contact, got {:?}", parts[1]);
        };
        assert_eq!(email.entity, ContactEntity::Client);
        assert_eq!(email.name, "ООО Ромашка");
        assert_eq!(email.kind, ContactKind::Email);
        assert_eq!(email.link().as_deref(), Some("mailto:info@romashka.by"));

        let DescriptionPart::Contact(phone) = &parts[3] else {
            panic!("expected contact, got {:?}", parts[3]);
        };
        assert_eq!(phone.contact_type, "Рабочий телефон");
        assert_eq!(phone.kind, ContactKind::Phone);
        assert_eq!(parts[4], DescriptionPart::Text(".".into()));
    }

    #[test]
    fn test_entity_name_falls_back_to_user() {
        let company: Record = serde_json::from_value(serde_json::json!({"company_name": "Вектор"})).unwrap();
        let person: Record =
            serde_json::from_value(serde_json::json!({"user": {"first_name": "Анна", "last_name": null}})).unwrap();
        assert_eq!(entity_name(&company), "Вектор");
        assert_eq!(entity_name(&person), "Анна");
    }

    #[test]
    fn test_reference_round_trips_through_parser() {
        let reference = contact_reference(ContactEntity::Carrier, "Вектор", "факс", "80171234567");
        let parts = render_description(&reference);

        let [DescriptionPart::Contact(contact)] = parts.as_slice() else {
            panic!("expected one contact, got {:?}", parts);
        };
        assert_eq!(contact.kind, ContactKind::Plain);
        assert_eq!(contact.to_string(), reference);
        assert_eq!(contact.prefix(), "[Контакт: Перевозчик \"Вектор\" - факс ");
    }
}
