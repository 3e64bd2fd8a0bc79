//! List query parameters

/// Query parameters of a list request, in insertion order.
///
/// Empty values are dropped when the query is built, so a cleared filter
/// field never reaches the server as `?name=`.
///
/// # Example
///
/// ```
/// use freight_lib::api::Filters;
///
/// let filters = Filters::new()
///     .search("Вектор")
///     .with("status", "active")
///     .with("city", "")
///     .page(2);
///
/// assert_eq!(
///     filters.to_query(),
///     vec![
///         ("search".to_string(), "Вектор".to_string()),
///         ("status".to_string(), "active".to_string()),
///         ("page".to_string(), "2".to_string()),
///     ]
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    params: Vec<(String, String)>,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a parameter, replacing an earlier value for the same key.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.params.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.params.push((key, value)),
        }
    }

    pub fn remove(&mut self, key: &str) {
        self.params.retain(|(k, _)| k != key);
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Full-text search over the resource's search fields.
    pub fn search(self, text: impl Into<String>) -> Self {
        self.with("search", text)
    }

    /// 1-based page number.
    pub fn page(self, page: u32) -> Self {
        self.with("page", page.to_string())
    }

    pub fn page_size(self, size: u32) -> Self {
        self.with("page_size", size.to_string())
    }

    /// Ordering field, prefixed with `-` for descending.
    pub fn ordering(self, field: impl Into<String>) -> Self {
        self.with("ordering", field)
    }

    /// Drops every parameter.
    pub fn clear(&mut self) {
        self.params.clear();
    }

    /// Returns `true` if no non-empty parameter is set.
    pub fn is_empty(&self) -> bool {
        self.params.iter().all(|(_, v)| v.trim().is_empty())
    }

    /// Key/value pairs sent as the query string.
    pub fn to_query(&self) -> Vec<(String, String)> {
        self.params
            .iter()
            .filter(|(_, v)| !v.trim().is_empty())
            .map(|(k, v)| (k.clone(), v.trim().to_string()))
            .collect()
    }
}
