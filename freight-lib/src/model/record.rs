//! Dynamic resource record

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::error::FieldError;

/// Keys tried, in order, when a nested object has to be shown as text.
const LABEL_KEYS: [&str; 5] = ["company_name", "name", "title", "email", "username"];

/// A row returned by a resource endpoint.
///
/// The backend's business fields (pricing, customs codes, delivery terms) are
/// passed through untouched, so a record is just the JSON object with typed
/// accessors on top. Only `id` is relied upon.
///
/// # Example
///
/// ```
/// use freight_lib::model::Record;
///
/// let record = Record::new()
///     .set("company_name", "Vector Logistics")
///     .set("unp", "190000001");
///
/// assert_eq!(record.get_str("company_name").unwrap(), Some("Vector Logistics"));
/// assert_eq!(record.id(), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    /// Creates an empty record, e.g. the body of a create form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing JSON object.
    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Returns the integer `id`, if present.
    pub fn id(&self) -> Option<i64> {
        self.fields.get("id").and_then(Value::as_i64)
    }

    /// Returns a reference to the field value, if it exists.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns `true` if the record contains the given field.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn fields_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.fields
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.fields
    }

    /// Sets a field, builder style.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.remove(field)
    }

    // =========================================================================
    // Typed getters
    // =========================================================================
    //
    // A missing field and an explicit `null` both read as `Ok(None)`.

    fn non_null(&self, field: &str) -> Option<&Value> {
        self.fields.get(field).filter(|v| !v.is_null())
    }

    pub fn get_str(&self, field: &str) -> Result<Option<&str>, FieldError> {
        match self.non_null(field) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(FieldError::mismatch(field, "string", other)),
        }
    }

    pub fn get_i64(&self, field: &str) -> Result<Option<i64>, FieldError> {
        match self.non_null(field) {
            None => Ok(None),
            Some(v) => v
                .as_i64()
                .map(Some)
                .ok_or_else(|| FieldError::mismatch(field, "integer", v)),
        }
    }

    pub fn get_f64(&self, field: &str) -> Result<Option<f64>, FieldError> {
        match self.non_null(field) {
            None => Ok(None),
            // Decimal fields arrive as strings from the backend.
            Some(Value::String(s)) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| FieldError::mismatch(field, "number", &Value::String(s.clone()))),
            Some(v) => v
                .as_f64()
                .map(Some)
                .ok_or_else(|| FieldError::mismatch(field, "number", v)),
        }
    }

    pub fn get_bool(&self, field: &str) -> Result<Option<bool>, FieldError> {
        match self.non_null(field) {
            None => Ok(None),
            Some(v) => v
                .as_bool()
                .map(Some)
                .ok_or_else(|| FieldError::mismatch(field, "bool", v)),
        }
    }

    /// Reads an RFC 3339 timestamp such as `created_at`.
    pub fn get_datetime(&self, field: &str) -> Result<Option<DateTime<Utc>>, FieldError> {
        let Some(raw) = self.get_str(field)? else {
            return Ok(None);
        };
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|_| FieldError::mismatch(field, "datetime", &Value::String(raw.to_string())))
    }

    /// Reads a nested object such as `created_by`.
    pub fn get_object(&self, field: &str) -> Result<Option<Record>, FieldError> {
        match self.non_null(field) {
            None => Ok(None),
            Some(Value::Object(map)) => Ok(Some(Record::from_map(map.clone()))),
            Some(other) => Err(FieldError::mismatch(field, "object", other)),
        }
    }

    /// Like [`get_str`](Self::get_str) but fails when the field is absent.
    pub fn require_str(&self, field: &str) -> Result<&str, FieldError> {
        self.get_str(field)?.ok_or_else(|| FieldError::missing(field))
    }

    /// Text a grid cell shows for `field`.
    ///
    /// Returns `None` for missing, `null` and empty values so the caller can
    /// render its placeholder.
    pub fn display(&self, field: &str) -> Option<String> {
        self.fields.get(field).and_then(display_value)
    }
}

fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(if *b { "Да" } else { "Нет" }.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().filter_map(display_value).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
        Value::Object(map) => LABEL_KEYS
            .iter()
            .find_map(|key| map.get(*key).and_then(display_value))
            .or_else(|| {
                let first = map.get("first_name").and_then(display_value);
                let last = map.get("last_name").and_then(display_value);
                match (first, last) {
                    (Some(f), Some(l)) => Some(format!("{f} {l}")),
                    (Some(n), None) | (None, Some(n)) => Some(n),
                    (None, None) => None,
                }
            }),
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self::from_map(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_typed_getters() {
        let r = record(json!({
            "id": 12,
            "company_name": "Vector",
            "is_active": true,
            "price": "1250.50",
            "notes": null
        }));

        assert_eq!(r.id(), Some(12));
        assert_eq!(r.get_str("company_name").unwrap(), Some("Vector"));
        assert_eq!(r.get_bool("is_active").unwrap(), Some(true));
        assert_eq!(r.get_f64("price").unwrap(), Some(1250.5));
        assert_eq!(r.get_str("notes").unwrap(), None);
        assert_eq!(r.get_str("absent").unwrap(), None);
        assert!(matches!(
            r.get_str("id"),
            Err(FieldError::TypeMismatch { expected: "string", actual: "integer", .. })
        ));
        assert_eq!(r.require_str("absent"), Err(FieldError::missing("absent")));
    }

    #[test]
    fn test_display() {
        let r = record(json!({
            "name": "",
            "status": "Активный",
            "weight": 1200,
            "created_by": {"id": 1, "first_name": "Ирина", "last_name": "Козлова"},
            "tags": ["a", "b"],
            "flag": false
        }));

        assert_eq!(r.display("name"), None);
        assert_eq!(r.display("missing"), None);
        assert_eq!(r.display("status").as_deref(), Some("Активный"));
        assert_eq!(r.display("weight").as_deref(), Some("1200"));
        assert_eq!(r.display("created_by").as_deref(), Some("Ирина Козлова"));
        assert_eq!(r.display("tags").as_deref(), Some("a, b"));
        assert_eq!(r.display("flag").as_deref(), Some("Нет"));
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let r = Record::new().set("company_name", "Vector").set("unp", "190000001");
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json, json!({"company_name": "Vector", "unp": "190000001"}));
    }
}
