//! Login, token validation and password reset

use reqwest::Method;
use serde::Deserialize;
use serde::Serialize;

use super::AuthToken;
use crate::CrmClient;
use crate::client::json_body;
use crate::client::parse_json;
use crate::error::ApiError;
use crate::error::AuthError;
use crate::error::Error;
use crate::model::User;

/// Body of `POST /login/`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub remember_me: bool,
}

/// A successful login: the session token plus the profile of the user.
#[derive(Debug, Clone)]
pub struct LoginResponse {
    pub token: AuthToken,
    pub user: User,
}

#[derive(Deserialize)]
struct RawLoginResponse {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    user: Option<User>,
}

#[derive(Deserialize)]
struct ValidateTokenResponse {
    #[serde(default)]
    valid: bool,
}

impl CrmClient {
    /// Exchanges credentials for a session token.
    ///
    /// The request is sent without any stored token. A 400 or 401 answer
    /// becomes [`AuthError::InvalidCredentials`]; an answer lacking either
    /// `token` or `user` becomes [`AuthError::MalformedLoginResponse`].
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        remember_me: bool,
    ) -> Result<LoginResponse, Error> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
            remember_me,
        };

        log::info!("[auth] logging in as {}", email);
        let response = self
            .request_anonymous(Method::POST, "/login/", json_body(&request)?)
            .await
            .map_err(|e| match e {
                Error::Api(ApiError::Unauthorized { .. }) => AuthError::InvalidCredentials.into(),
                Error::Api(ApiError::Http { status: 400, .. }) => AuthError::InvalidCredentials.into(),
                other => other,
            })?;

        let raw: RawLoginResponse = parse_json(response)
            .await
            .map_err(|_| Error::from(AuthError::MalformedLoginResponse))?;

        match (raw.token, raw.user) {
            (Some(token), Some(user)) if !token.trim().is_empty() => {
                log::info!("[auth] login succeeded for user {}", user.id);
                Ok(LoginResponse {
                    token: AuthToken::new(token),
                    user,
                })
            }
            _ => {
                log::warn!("[auth] login answer lacked token or user");
                Err(AuthError::MalformedLoginResponse.into())
            }
        }
    }

    /// Asks the server whether the current token is still valid.
    ///
    /// A 401 answer is reported as `Ok(false)` after the unauthorized hook has
    /// run; transport failures stay errors so callers can tell an offline
    /// backend apart from an expired session.
    pub async fn validate_token(&self) -> Result<bool, Error> {
        match self
            .get_json::<ValidateTokenResponse>("/validate-token/", &[])
            .await
        {
            Ok(answer) => Ok(answer.valid),
            Err(e) if e.is_unauthorized() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Requests a password reset mail for `email`.
    pub async fn reset_password(&self, email: &str) -> Result<(), Error> {
        let body = serde_json::json!({ "email": email });
        self.request_anonymous(Method::POST, "/password-reset/", json_body(&body)?)
            .await?;
        Ok(())
    }
}
