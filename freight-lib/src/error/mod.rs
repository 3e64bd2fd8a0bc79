//! Error types

mod api;
mod auth;
mod field;
mod validation;

pub use api::*;
pub use auth::*;
pub use field::*;
pub use validation::*;

/// Top-level error returned by client operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Field(#[from] FieldError),

    #[error(transparent)]
    Validation(#[from] ValidationErrors),
}

impl Error {
    /// Returns `true` if the server rejected the session token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api(api) if api.is_unauthorized())
    }

    /// Returns the message a screen shows next to the action that failed.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(api) => api.user_message(),
            Self::Auth(auth) => auth.to_string(),
            Self::Field(field) => field.to_string(),
            Self::Validation(v) => v.to_string(),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Api(ApiError::Network(err))
    }
}
