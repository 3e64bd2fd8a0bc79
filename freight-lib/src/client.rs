//! Main CrmClient

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use reqwest::Method;
use reqwest::header::ACCEPT;
use reqwest::header::AUTHORIZATION;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::Form;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::TokenProvider;
use crate::error::ApiError;
use crate::error::Error;

/// Callback invoked when the server rejects the session token (HTTP 401).
///
/// Front-ends use it to drop the stored session and return to the login
/// screen.
pub type UnauthorizedHook = Arc<dyn Fn() + Send + Sync>;

/// The main client for the CRM REST API.
///
/// This client is cheap to clone (uses `Arc` internally) and can be shared
/// across tasks.
///
/// # Example
///
/// ```ignore
/// use freight_lib::{CrmClient, auth::SharedTokenProvider};
///
/// let tokens = SharedTokenProvider::new();
/// let client = CrmClient::builder()
///     .url("http://localhost:8000/api")
///     .token_provider(tokens.clone())
///     .build();
///
/// let login = client.login("manager@example.com", "secret", false).await?;
/// tokens.set(login.token);
/// ```
#[derive(Clone)]
pub struct CrmClient {
    inner: Arc<CrmClientInner>,
}

struct CrmClientInner {
    base_url: String,
    token_provider: Arc<dyn TokenProvider>,
    http_client: Client,
    timeout: Option<Duration>,
    on_unauthorized: Option<UnauthorizedHook>,
}

/// Body of an outgoing request.
pub(crate) enum RequestBody {
    Empty,
    Json(String),
    Multipart(Form),
}

impl CrmClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> CrmClientBuilder<Missing, Missing> {
        CrmClientBuilder::new()
    }

    /// Returns the base URL of the API, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Builds the full URL for an API path plus query parameters.
    ///
    /// Absolute URLs (pagination `next` links) are used as-is. Relative
    /// paths are joined to the base URL; a trailing slash on `path` is kept
    /// because the backend requires it.
    pub(crate) fn build_url(&self, path: &str, query: &[(String, String)]) -> Result<Url, ApiError> {
        let raw = if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}/{}", self.inner.base_url, path.trim_start_matches('/'))
        };

        let mut url = Url::parse(&raw).map_err(|e| ApiError::InvalidUrl(format!("{raw}: {e}")))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Makes an authenticated HTTP request and normalizes failures.
    ///
    /// This is the low-level request method used by all API operations.
    /// Non-2xx answers become [`ApiError::Http`] with the message already
    /// extracted; a 401 additionally invalidates the token and fires the
    /// unauthorized hook.
    pub(crate) async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: RequestBody,
    ) -> Result<reqwest::Response, Error> {
        self.send(method, path, query, body, true).await
    }

    /// Same as [`request`](Self::request) but without the session token and
    /// without 401 handling. Used by login and password reset.
    pub(crate) async fn request_anonymous(
        &self,
        method: Method,
        path: &str,
        body: RequestBody,
    ) -> Result<reqwest::Response, Error> {
        self.send(method, path, &[], body, false).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: RequestBody,
        authenticated: bool,
    ) -> Result<reqwest::Response, Error> {
        let url = self.build_url(path, query)?;
        log::debug!("[api] {} {}", method, url);

        let mut request = self
            .inner
            .http_client
            .request(method.clone(), url.clone())
            .header(ACCEPT, "application/json");

        if authenticated {
            if let Some(token) = self.inner.token_provider.token().await {
                request = request.header(AUTHORIZATION, token.header_value());
            }
        }

        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        request = match body {
            RequestBody::Empty => request,
            RequestBody::Json(json) => request.header(CONTENT_TYPE, "application/json").body(json),
            RequestBody::Multipart(form) => request.multipart(form),
        };

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                log::error!("[api] {} {}: no response: {}", method, url, e);
                return Err(ApiError::Network(e).into());
            }
        };

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = ApiError::from_response_body(status.as_u16(), body);
        log::error!("[api] {} {}: {}", method, url, error);

        if authenticated && error.is_unauthorized() {
            self.inner.token_provider.invalidate().await;
            if let Some(hook) = &self.inner.on_unauthorized {
                hook();
            }
        }

        Err(error.into())
    }

    // =========================================================================
    // JSON helpers
    // =========================================================================

    /// `GET` a JSON document.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<T, Error> {
        let response = self.request(Method::GET, path, query, RequestBody::Empty).await?;
        parse_json(response).await
    }

    /// `POST` a JSON body and parse the JSON answer.
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let response = self
            .request(Method::POST, path, &[], json_body(body)?)
            .await?;
        parse_json(response).await
    }

    /// `PUT` a JSON body and parse the JSON answer.
    pub async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let response = self
            .request(Method::PUT, path, &[], json_body(body)?)
            .await?;
        parse_json(response).await
    }

    /// `PATCH` a JSON body and parse the JSON answer.
    pub async fn patch_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let response = self
            .request(Method::PATCH, path, &[], json_body(body)?)
            .await?;
        parse_json(response).await
    }

    /// `DELETE` a resource, ignoring any response body.
    pub async fn delete(&self, path: &str) -> Result<(), Error> {
        self.request(Method::DELETE, path, &[], RequestBody::Empty)
            .await?;
        Ok(())
    }

    /// `POST` without a body. Returns the JSON answer, or `Null` when the
    /// server answers with an empty body.
    pub async fn post_empty(&self, path: &str) -> Result<serde_json::Value, Error> {
        let response = self
            .request(Method::POST, path, &[], RequestBody::Empty)
            .await?;
        parse_json_or_null(response).await
    }

    /// `GET` a binary document (spreadsheet or file download).
    pub async fn get_bytes(&self, path: &str, query: &[(String, String)]) -> Result<Vec<u8>, Error> {
        let response = self.request(Method::GET, path, query, RequestBody::Empty).await?;
        let bytes = response.bytes().await.map_err(ApiError::Network)?;
        Ok(bytes.to_vec())
    }

    /// `POST` a multipart form.
    pub async fn post_multipart(&self, path: &str, form: Form) -> Result<serde_json::Value, Error> {
        let response = self
            .request(Method::POST, path, &[], RequestBody::Multipart(form))
            .await?;
        parse_json_or_null(response).await
    }
}

pub(crate) fn json_body<B: Serialize + ?Sized>(body: &B) -> Result<RequestBody, Error> {
    let json = serde_json::to_string(body)
        .map_err(|e| ApiError::parse(format!("Failed to serialize request body: {e}")))?;
    Ok(RequestBody::Json(json))
}

pub(crate) async fn parse_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, Error> {
    let text = response.text().await.map_err(ApiError::Network)?;
    match serde_json::from_str(&text) {
        Ok(value) => Ok(value),
        Err(e) => Err(ApiError::parse_with_body(e.to_string(), text).into()),
    }
}

pub(crate) async fn parse_json_or_null(response: reqwest::Response) -> Result<serde_json::Value, Error> {
    let text = response.text().await.map_err(ApiError::Network)?;
    if text.trim().is_empty() {
        return Ok(serde_json::Value::Null);
    }
    match serde_json::from_str(&text) {
        Ok(value) => Ok(value),
        Err(e) => Err(ApiError::parse_with_body(e.to_string(), text).into()),
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing a [`CrmClient`].
///
/// Uses the typestate pattern to ensure required fields are set at compile time.
///
/// # Required Fields
///
/// - `url` - The API base URL, e.g. `http://localhost:8000/api`
/// - `token_provider` - A [`TokenProvider`] implementation
pub struct CrmClientBuilder<Url, Provider> {
    url: Url,
    token_provider: Provider,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
    on_unauthorized: Option<UnauthorizedHook>,
}

impl CrmClientBuilder<Missing, Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: Missing,
            token_provider: Missing,
            timeout: None,
            connect_timeout: None,
            http_client: None,
            on_unauthorized: None,
        }
    }
}

impl Default for CrmClientBuilder<Missing, Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> CrmClientBuilder<Missing, P> {
    /// Sets the API base URL.
    pub fn url(self, url: impl Into<String>) -> CrmClientBuilder<Set<String>, P> {
        CrmClientBuilder {
            url: Set(url.into()),
            token_provider: self.token_provider,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
            on_unauthorized: self.on_unauthorized,
        }
    }
}

impl<U> CrmClientBuilder<U, Missing> {
    /// Sets the token provider for authentication.
    pub fn token_provider<T: TokenProvider + 'static>(
        self,
        provider: T,
    ) -> CrmClientBuilder<U, Set<Arc<dyn TokenProvider>>> {
        CrmClientBuilder {
            url: self.url,
            token_provider: Set(Arc::new(provider) as Arc<dyn TokenProvider>),
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
            on_unauthorized: self.on_unauthorized,
        }
    }
}

impl<U, P> CrmClientBuilder<U, P> {
    /// Sets the request timeout. No timeout is applied by default.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// This is applied when building the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Registers a callback fired after any authenticated request is
    /// answered with 401.
    pub fn on_unauthorized(mut self, hook: UnauthorizedHook) -> Self {
        self.on_unauthorized = Some(hook);
        self
    }
}

impl CrmClientBuilder<Set<String>, Set<Arc<dyn TokenProvider>>> {
    /// Builds the [`CrmClient`].
    ///
    /// This method is only available when both `url` and `token_provider` have been set.
    pub fn build(self) -> CrmClient {
        let http_client = self.http_client.unwrap_or_else(|| {
            let mut builder = Client::builder();
            if let Some(timeout) = self.connect_timeout {
                builder = builder.connect_timeout(timeout);
            }
            builder.build().unwrap_or_else(|e| {
                log::warn!("[api] custom HTTP client failed to build ({e}), using defaults");
                Client::new()
            })
        });

        CrmClient {
            inner: Arc::new(CrmClientInner {
                base_url: self.url.0.trim_end_matches('/').to_string(),
                token_provider: self.token_provider.0,
                http_client,
                timeout: self.timeout,
                on_unauthorized: self.on_unauthorized,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticTokenProvider;

    fn client(base: &str) -> CrmClient {
        CrmClient::builder()
            .url(base)
            .token_provider(StaticTokenProvider::new("t"))
            .build()
    }

    #[test]
    fn test_build_url_keeps_trailing_slash() {
        let client = client("http://localhost:8000/api/");
        let url = client.build_url("/clients/", &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/clients/");

        let url = client.build_url("clients/5/", &[]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/clients/5/");
    }

    #[test]
    fn test_build_url_encodes_query() {
        let client = client("http://localhost:8000/api");
        let query = vec![("table".to_string(), "site requests".to_string())];
        let url = client.build_url("/highlights/", &query).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/highlights/?table=site+requests"
        );
    }

    #[test]
    fn test_absolute_next_link_used_as_is() {
        let client = client("http://localhost:8000/api");
        let url = client
            .build_url("http://localhost:8000/api/clients/?page=2", &[])
            .unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/clients/?page=2");
    }

    #[test]
    fn test_invalid_base_url() {
        let client = client("not a url");
        assert!(matches!(
            client.build_url("/clients/", &[]),
            Err(ApiError::InvalidUrl(_))
        ));
    }
}
