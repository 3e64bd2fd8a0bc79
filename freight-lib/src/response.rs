//! List responses
//!
//! List endpoints answer either with a bare JSON array or with a paginated
//! page `{count, next, previous, results}` depending on the view's paginator.
//! [`ListEnvelope`] accepts both.

use serde::Deserialize;
use serde::Deserializer;
use serde::de::DeserializeOwned;
use serde::de::Error as _;
use serde_json::Value;

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ListEnvelope<T> {
    /// The items on this page.
    pub results: Vec<T>,
    /// Total number of items across all pages, when the server reports it.
    pub count: Option<u64>,
    /// URL of the next page, if any.
    pub next: Option<String>,
    /// URL of the previous page, if any.
    pub previous: Option<String>,
    /// `true` when the server answered with something that is neither an
    /// array nor a page. `results` is then empty.
    pub unexpected_shape: bool,
}

impl<T> Default for ListEnvelope<T> {
    fn default() -> Self {
        Self {
            results: Vec::new(),
            count: None,
            next: None,
            previous: None,
            unexpected_shape: false,
        }
    }
}

impl<T> ListEnvelope<T> {
    /// Wraps a plain list.
    pub fn from_items(results: Vec<T>) -> Self {
        let count = Some(results.len() as u64);
        Self {
            results,
            count,
            ..Self::default()
        }
    }

    /// Total item count: the server's `count`, or the page length.
    pub fn total(&self) -> u64 {
        self.count.unwrap_or(self.results.len() as u64)
    }

    /// Returns `true` if another page follows.
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn into_items(self) -> Vec<T> {
        self.results
    }
}

impl<T: DeserializeOwned> ListEnvelope<T> {
    /// Interprets an already-parsed JSON body.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        match value {
            Value::Array(items) => {
                let results = items
                    .into_iter()
                    .map(serde_json::from_value)
                    .collect::<Result<Vec<T>, _>>()?;
                Ok(Self::from_items(results))
            }
            Value::Object(mut map) => match map.remove("results") {
                Some(Value::Array(items)) => {
                    let results = items
                        .into_iter()
                        .map(serde_json::from_value)
                        .collect::<Result<Vec<T>, _>>()?;
                    Ok(Self {
                        results,
                        count: map.get("count").and_then(Value::as_u64),
                        next: map.get("next").and_then(Value::as_str).map(String::from),
                        previous: map
                            .get("previous")
                            .and_then(Value::as_str)
                            .map(String::from),
                        unexpected_shape: false,
                    })
                }
                _ => Ok(Self::unexpected()),
            },
            _ => Ok(Self::unexpected()),
        }
    }

    fn unexpected() -> Self {
        Self {
            unexpected_shape: true,
            ..Self::default()
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for ListEnvelope<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_array() {
        let list: ListEnvelope<i64> = serde_json::from_value(json!([1, 2, 3])).unwrap();
        assert_eq!(list.results, vec![1, 2, 3]);
        assert_eq!(list.total(), 3);
        assert!(!list.has_next());
    }

    #[test]
    fn test_paginated_page() {
        let list: ListEnvelope<i64> = serde_json::from_value(json!({
            "count": 25,
            "next": "http://localhost:8000/api/clients/?page=2",
            "previous": null,
            "results": [1, 2]
        }))
        .unwrap();
        assert_eq!(list.results, vec![1, 2]);
        assert_eq!(list.total(), 25);
        assert!(list.has_next());
        assert_eq!(list.previous, None);
    }

    #[test]
    fn test_unexpected_shape_is_empty() {
        let list: ListEnvelope<i64> =
            serde_json::from_value(json!({"detail": "ok"})).unwrap();
        assert!(list.is_empty());
        assert!(list.unexpected_shape);

        let list: ListEnvelope<i64> = serde_json::from_value(json!("text")).unwrap();
        assert!(list.unexpected_shape);
    }
}
