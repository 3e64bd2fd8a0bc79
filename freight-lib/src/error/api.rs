//! API error types

/// Message shown when the server answered with an error but no usable text.
pub const GENERIC_ERROR_MESSAGE: &str = "Произошла ошибка при выполнении запроса";

/// Message shown when no response was received at all.
pub const NETWORK_ERROR_MESSAGE: &str = "Ошибка сети. Проверьте подключение к интернету.";

/// Errors that can occur during API calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// HTTP error response from the API.
    ///
    /// `message` is already normalized from the response body, see
    /// [`extract_message`].
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Human-readable error message.
        message: String,
        /// Raw response body, if it could be read.
        body: Option<String>,
    },

    /// The session token was rejected (HTTP 401).
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Message extracted from the response body.
        message: String,
    },

    /// Network error during API call (no response received).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse API response.
    #[error("Response parse error: {message}")]
    Parse {
        /// Description of the parse error.
        message: String,
        /// Raw response body, if available.
        body: Option<String>,
    },

    /// Local file could not be read or written during import/export.
    #[error("File error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// Creates a new HTTP error.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
            body: None,
        }
    }

    /// Builds an HTTP error from a status and raw body, normalizing the message.
    pub fn from_response_body(status: u16, body: String) -> Self {
        let message = extract_message(&body);
        if status == 401 {
            return Self::Unauthorized { message };
        }
        Self::Http {
            status,
            message,
            body: if body.is_empty() { None } else { Some(body) },
        }
    }

    /// Creates a new parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: None,
        }
    }

    /// Creates a new parse error with the raw response body.
    pub fn parse_with_body(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: Some(body.into()),
        }
    }

    /// Returns the HTTP status code if this is an HTTP error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Unauthorized { .. } => Some(401),
            _ => None,
        }
    }

    /// Returns `true` if no response was received.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    /// Returns `true` if the server rejected the session token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// What the server said about a rejected request.
    ///
    /// The extracted message if the body had one, else the per-field errors
    /// of a validation body joined as `field: error; field: error`.
    pub fn server_message(&self) -> Option<String> {
        let Self::Http { message, body, .. } = self else {
            return None;
        };
        if message != GENERIC_ERROR_MESSAGE {
            return Some(message.clone());
        }
        body.as_deref().and_then(field_messages)
    }

    /// Returns the message suitable for showing next to the failed action.
    pub fn user_message(&self) -> String {
        match self {
            Self::Http { message, .. } | Self::Unauthorized { message } => message.clone(),
            Self::Network(_) => NETWORK_ERROR_MESSAGE.to_string(),
            Self::InvalidUrl(_) | Self::Parse { .. } | Self::Io(_) => self.to_string(),
        }
    }
}

/// Extracts the most specific error message from a response body.
///
/// Priority is `message`, then `detail`, then `error`. Anything else
/// (non-JSON bodies, other shapes, empty strings) yields
/// [`GENERIC_ERROR_MESSAGE`].
pub fn extract_message(body: &str) -> String {
    let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(body) else {
        return GENERIC_ERROR_MESSAGE.to_string();
    };

    ["message", "detail", "error"]
        .iter()
        .filter_map(|key| map.get(*key))
        .find_map(|value| match value {
            serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
            serde_json::Value::Null => None,
            serde_json::Value::String(_) => None,
            other => Some(other.to_string()),
        })
        .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string())
}

fn field_messages(body: &str) -> Option<String> {
    let serde_json::Value::Object(map) = serde_json::from_str::<serde_json::Value>(body).ok()? else {
        return None;
    };
    let parts: Vec<String> = map
        .iter()
        .map(|(field, value)| match value {
            serde_json::Value::Array(items) => {
                let items: Vec<String> = items
                    .iter()
                    .map(|i| i.as_str().map(String::from).unwrap_or_else(|| i.to_string()))
                    .collect();
                format!("{}: {}", field, items.join(", "))
            }
            serde_json::Value::String(s) => format!("{}: {}", field, s),
            other => format!("{}: {}", field, other),
        })
        .collect();
    if parts.is_empty() { None } else { Some(parts.join("; ")) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_priority() {
        let body = r#"{"error": "e", "detail": "d", "message": "m"}"#;
        assert_eq!(extract_message(body), "m");

        let body = r#"{"error": "e", "detail": "d"}"#;
        assert_eq!(extract_message(body), "d");

        let body = r#"{"error": "e"}"#;
        assert_eq!(extract_message(body), "e");
    }

    #[test]
    fn test_message_fallback() {
        assert_eq!(extract_message(""), GENERIC_ERROR_MESSAGE);
        assert_eq!(extract_message("<html>502</html>"), GENERIC_ERROR_MESSAGE);
        assert_eq!(extract_message(r#"["a"]"#), GENERIC_ERROR_MESSAGE);
        assert_eq!(extract_message(r#"{"name": ["required"]}"#), GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn test_empty_message_falls_through() {
        let body = r#"{"message": "", "detail": "Not found."}"#;
        assert_eq!(extract_message(body), "Not found.");
    }

    #[test]
    fn test_server_message_joins_field_errors() {
        let err = ApiError::from_response_body(400, r#"{"title": ["Обязательное поле."], "deadline": "bad"}"#.into());
        assert_eq!(
            err.server_message().as_deref(),
            Some("deadline: bad; title: Обязательное поле.")
        );

        let err = ApiError::from_response_body(400, r#"{"detail": "Bad"}"#.into());
        assert_eq!(err.server_message().as_deref(), Some("Bad"));
        assert_eq!(ApiError::http(500, GENERIC_ERROR_MESSAGE).server_message(), None);
    }

    #[test]
    fn test_401_becomes_unauthorized() {
        let err = ApiError::from_response_body(401, r#"{"detail": "Invalid token."}"#.into());
        assert!(err.is_unauthorized());
        assert_eq!(err.user_message(), "Invalid token.");
        assert_eq!(err.status_code(), Some(401));
    }

    #[test]
    fn test_http_error_keeps_body() {
        let err = ApiError::from_response_body(400, r#"{"detail": "Bad"}"#.into());
        match err {
            ApiError::Http { status, message, body } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Bad");
                assert!(body.is_some());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
