//! Authentication error types

/// Errors that can occur during login and session handling.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Invalid email or password.
    #[error("Неверный email или пароль")]
    InvalidCredentials,

    /// No token is available for an operation that needs one.
    #[error("Not logged in")]
    MissingToken,

    /// The login endpoint answered without a token or user.
    #[error("Invalid response from server")]
    MalformedLoginResponse,
}
