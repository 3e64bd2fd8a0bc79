//! Client-side form validation.
//!
//! Runs before any request is sent. Every field reports its first failing
//! rule only.
//!
//! ```
//! use freight_desk::forms::Validator;
//! use freight_lib::model::Record;
//!
//! let record = Record::new().set("unp", "12345");
//! let result = Validator::new(&record)
//!     .field("company_name")
//!     .required("Обязательное поле")
//!     .field("unp")
//!     .digits(9, "УНП должен содержать 9 цифр")
//!     .validate();
//!
//! let errors = result.unwrap_err();
//! assert_eq!(errors.for_field("company_name"), Some("Обязательное поле"));
//! assert_eq!(errors.for_field("unp"), Some("УНП должен содержать 9 цифр"));
//! ```

use freight_lib::error::ValidationErrors;
use freight_lib::model::Record;
use freight_lib::model::Role;

pub const REQUIRED_MESSAGE: &str = "Это поле обязательно для заполнения";
pub const UNP_MESSAGE: &str = "УНП должен содержать 9 цифр";
pub const UNN_MESSAGE: &str = "УНН должен содержать 12 цифр";
pub const OKPO_MESSAGE: &str = "ОКПО должен содержать 10 цифр";
pub const EMAIL_MESSAGE: &str = "Некорректный email";
pub const ROLE_MESSAGE: &str = "Выберите роль";

/// Fluent validator over the fields of a form record.
pub struct Validator<'a> {
    record: &'a Record,
    errors: ValidationErrors,
    current: Option<Current>,
}

struct Current {
    field: String,
    value: String,
    failed: bool,
}

impl<'a> Validator<'a> {
    pub fn new(record: &'a Record) -> Self {
        Self {
            record,
            errors: ValidationErrors::new(),
            current: None,
        }
    }

    /// Starts the rules of `field`. Its value is the field's display text,
    /// empty when missing or null.
    pub fn field(mut self, field: &str) -> Self {
        let value = self.record.display(field).unwrap_or_default();
        self.current = Some(Current {
            field: field.to_string(),
            value: value.trim().to_string(),
            failed: false,
        });
        self
    }

    /// Adds a rule on the current field's value.
    pub fn rule<F>(mut self, check: F, msg: &str) -> Self
    where
        F: FnOnce(&str) -> bool,
    {
        let Some(current) = self.current.as_mut() else {
            return self;
        };
        if !current.failed && !check(&current.value) {
            current.failed = true;
            self.errors.push(current.field.clone(), msg);
        }
        self
    }

    pub fn required(self, msg: &str) -> Self {
        self.rule(|v| !v.is_empty(), msg)
    }

    /// Exactly `count` ASCII digits. Empty passes; combine with `required`.
    pub fn digits(self, count: usize, msg: &str) -> Self {
        self.rule(
            |v| v.is_empty() || (v.len() == count && v.bytes().all(|b| b.is_ascii_digit())),
            msg,
        )
    }

    /// Valid email address. Empty passes; combine with `required`.
    pub fn email(self, msg: &str) -> Self {
        self.rule(
            |v| v.is_empty() || email_address::EmailAddress::is_valid(v),
            msg,
        )
    }

    /// Matches a regex. An invalid pattern fails the field.
    pub fn pattern(self, pattern: &str, msg: &str) -> Self {
        match regex::Regex::new(pattern) {
            Ok(re) => self.rule(|v| re.is_match(v), msg),
            Err(e) => {
                log::error!("[forms] invalid pattern {}: {}", pattern, e);
                self.rule(|_| false, msg)
            }
        }
    }

    pub fn validate(self) -> Result<(), ValidationErrors> {
        self.errors.into_result()
    }
}

fn tax_ids(validator: Validator<'_>) -> Validator<'_> {
    validator
        .field("unp")
        .digits(9, UNP_MESSAGE)
        .field("unn")
        .digits(12, UNN_MESSAGE)
        .field("okpo")
        .digits(10, OKPO_MESSAGE)
}

pub fn validate_client(record: &Record) -> Result<(), ValidationErrors> {
    let validator = Validator::new(record)
        .field("company_name")
        .required(REQUIRED_MESSAGE);
    tax_ids(validator)
        .field("email")
        .email(EMAIL_MESSAGE)
        .validate()
}

pub fn validate_carrier(record: &Record) -> Result<(), ValidationErrors> {
    let validator = Validator::new(record)
        .field("company_name")
        .required(REQUIRED_MESSAGE);
    tax_ids(validator).validate()
}

/// Validates a user form. The password is only required when creating.
pub fn validate_user(record: &Record, creating: bool) -> Result<(), ValidationErrors> {
    let validator = Validator::new(record)
        .field("email")
        .required(REQUIRED_MESSAGE)
        .email(EMAIL_MESSAGE)
        .field("username")
        .required(REQUIRED_MESSAGE)
        .field("role")
        .rule(
            |v| matches!(Role::from(v.to_string()), Role::Admin | Role::Manager | Role::Client),
            ROLE_MESSAGE,
        );
    let validator = if creating {
        validator.field("password").required(REQUIRED_MESSAGE)
    } else {
        validator
    };
    validator.validate()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_ids() {
        let ok = Record::new()
            .set("company_name", "Вектор")
            .set("unp", "190000001")
            .set("unn", "123456789012")
            .set("okpo", "");
        assert!(validate_client(&ok).is_ok());

        let bad = Record::new()
            .set("company_name", "Вектор")
            .set("unp", "19000000a")
            .set("unn", "1234")
            .set("okpo", "12345678901");
        let errors = validate_carrier(&bad).unwrap_err();
        assert_eq!(errors.for_field("unp"), Some(UNP_MESSAGE));
        assert_eq!(errors.for_field("unn"), Some(UNN_MESSAGE));
        assert_eq!(errors.for_field("okpo"), Some(OKPO_MESSAGE));
    }

    #[test]
    fn test_company_name_required() {
        let errors = validate_client(&Record::new().set("company_name", "   ")).unwrap_err();
        assert_eq!(errors.first_message(), Some(REQUIRED_MESSAGE));
        assert_eq!(errors.errors().len(), 1);
    }

    #[test]
    fn test_user_first_error_per_field() {
        let record = Record::new().set("email", "").set("username", "ivan").set("role", "driver");
        let errors = validate_user(&record, true).unwrap_err();

        assert_eq!(errors.for_field("email"), Some(REQUIRED_MESSAGE));
        assert_eq!(errors.for_field("role"), Some(ROLE_MESSAGE));
        assert_eq!(errors.for_field("password"), Some(REQUIRED_MESSAGE));
        assert_eq!(errors.errors().len(), 3);

        let editing = Record::new()
            .set("email", "ivan@example.com")
            .set("username", "ivan")
            .set("role", "Manager");
        assert!(validate_user(&editing, false).is_ok());
    }

    #[test]
    fn test_email_format() {
        let record = Record::new().set("company_name", "Вектор").set("email", "not-an-email");
        let errors = validate_client(&record).unwrap_err();
        assert_eq!(errors.for_field("email"), Some(EMAIL_MESSAGE));
    }
}
