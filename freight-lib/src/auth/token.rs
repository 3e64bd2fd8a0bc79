//! TokenProvider trait and AuthToken

use std::sync::Arc;
use std::sync::PoisonError;
use std::sync::RwLock;

use async_trait::async_trait;

/// The header scheme sent with every authenticated request.
///
/// The backend accepts `Authorization: Token <key>`. Sending the bare key is
/// not supported by this client.
pub const TOKEN_SCHEME: &str = "Token";

/// A session token issued by `POST /login/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthToken {
    /// The raw token key.
    pub token: String,
}

impl AuthToken {
    /// Creates a new token from the raw key.
    ///
    /// A key that already carries the `Token ` prefix is stripped so the
    /// header is never sent with the scheme twice.
    pub fn new(token: impl Into<String>) -> Self {
        let token = token.into();
        let token = match token.strip_prefix("Token ") {
            Some(rest) => rest.trim().to_string(),
            None => token.trim().to_string(),
        };
        Self { token }
    }

    /// Returns the value for the `Authorization` header.
    pub fn header_value(&self) -> String {
        format!("{} {}", TOKEN_SCHEME, self.token)
    }

    /// Returns `true` if the key is empty.
    pub fn is_empty(&self) -> bool {
        self.token.is_empty()
    }
}

/// Trait for providing session tokens to the client.
///
/// The client asks for a token before each request. Returning `None` sends
/// the request anonymously (used by login and password reset).
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Returns the current token, if any.
    async fn token(&self) -> Option<AuthToken>;

    /// Drops the current token after the server rejected it.
    ///
    /// The default does nothing, for providers that cannot forget.
    async fn invalidate(&self) {}
}

/// A token provider that always returns the same token.
///
/// Useful for scripts and tests.
///
/// # Example
///
/// ```
/// use freight_lib::auth::StaticTokenProvider;
///
/// let provider = StaticTokenProvider::new("0123456789abcdef");
/// ```
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    token: AuthToken,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: AuthToken::new(token),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn token(&self) -> Option<AuthToken> {
        Some(self.token.clone())
    }
}

/// A token slot shared between the client and the application session.
///
/// The session writes the token after login and clears it on logout or when
/// the server answers 401; the client reads it before every request.
#[derive(Debug, Clone, Default)]
pub struct SharedTokenProvider {
    slot: Arc<RwLock<Option<AuthToken>>>,
}

impl SharedTokenProvider {
    /// Creates an empty slot (anonymous requests).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a slot holding `token`.
    pub fn with_token(token: impl Into<String>) -> Self {
        let provider = Self::new();
        provider.set(token);
        provider
    }

    /// Stores a new token.
    pub fn set(&self, token: impl Into<String>) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(AuthToken::new(token));
    }

    /// Forgets the token.
    pub fn clear(&self) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Returns the current token without going through the async trait.
    pub fn current(&self) -> Option<AuthToken> {
        self.slot.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Returns `true` if a token is stored.
    pub fn is_set(&self) -> bool {
        self.current().is_some()
    }
}

#[async_trait]
impl TokenProvider for SharedTokenProvider {
    async fn token(&self) -> Option<AuthToken> {
        self.current().filter(|t| !t.is_empty())
    }

    async fn invalidate(&self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_uses_token_scheme() {
        let token = AuthToken::new("abc");
        assert_eq!(token.header_value(), "Token abc");
    }

    #[test]
    fn test_prefixed_token_is_not_doubled() {
        let token = AuthToken::new("Token abc");
        assert_eq!(token.header_value(), "Token abc");
    }

    #[tokio::test]
    async fn test_shared_provider_set_and_invalidate() {
        let provider = SharedTokenProvider::new();
        assert!(provider.token().await.is_none());

        provider.set("k1");
        let clone = provider.clone();
        assert_eq!(clone.token().await.map(|t| t.token), Some("k1".to_string()));

        clone.invalidate().await;
        assert!(!provider.is_set());
    }

    #[test]
    fn test_logout_survives_poisoned_slot() {
        let provider = SharedTokenProvider::with_token("k1");
        let slot = provider.slot.clone();
        let _ = std::thread::spawn(move || {
            let _guard = slot.write().unwrap();
            panic!("writer panicked while holding the slot");
        })
        .join();
        assert!(provider.slot.is_poisoned());

        provider.clear();
        assert!(!provider.is_set());

        provider.set("k2");
        assert_eq!(provider.current().map(|t| t.token), Some("k2".to_string()));
    }
}
