//! Application session: who is logged in and how the app looks.
//!
//! Owns everything the app persists about the session and is the only
//! place that reads or writes those keys. Boot calls [`Session::hydrate`];
//! sign-out and an expired token both end in [`Session::logout`].

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::time::Duration;

use freight_lib::CrmClient;
use freight_lib::UnauthorizedHook;
use freight_lib::auth::SharedTokenProvider;
use freight_lib::model::ThemeSettings;
use freight_lib::model::User;
use thiserror::Error;

use crate::storage::LocalStore;
use crate::storage::StorageError;
use crate::storage::keys;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Api(#[from] freight_lib::error::Error),
    #[error("not logged in")]
    NotLoggedIn,
}

impl SessionError {
    /// Message shown on the login screen or settings panel.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

pub struct Session {
    store: LocalStore,
    tokens: SharedTokenProvider,
    expired: Arc<AtomicBool>,
    user: Option<User>,
    theme: ThemeSettings,
}

impl Session {
    pub fn new(store: LocalStore) -> Self {
        Self {
            store,
            tokens: SharedTokenProvider::new(),
            expired: Arc::new(AtomicBool::new(false)),
            user: None,
            theme: ThemeSettings::default(),
        }
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    /// Token slot shared with every client built by [`Session::client`].
    pub fn token_provider(&self) -> SharedTokenProvider {
        self.tokens.clone()
    }

    /// Hook that marks the session expired when the server answers 401.
    pub fn unauthorized_hook(&self) -> UnauthorizedHook {
        let expired = self.expired.clone();
        Arc::new(move || {
            log::warn!("[session] server rejected the token");
            expired.store(true, Ordering::SeqCst);
        })
    }

    /// Builds an API client bound to this session.
    pub fn client(&self, base_url: &str, timeout: Option<Duration>) -> CrmClient {
        let builder = CrmClient::builder()
            .url(base_url)
            .token_provider(self.tokens.clone())
            .on_unauthorized(self.unauthorized_hook());
        match timeout {
            Some(t) => builder.timeout(t).build(),
            None => builder.build(),
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn theme(&self) -> &ThemeSettings {
        &self.theme
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.tokens.is_set()
    }

    /// Restores token, user and theme from local storage.
    ///
    /// A stored user that no longer decodes ends the session. An unreadable
    /// theme falls back to the default.
    pub async fn hydrate(&mut self) -> Result<(), SessionError> {
        self.theme = match self.store.get::<ThemeSettings>(keys::THEME).await {
            Ok(theme) => theme.unwrap_or_default(),
            Err(e) => {
                log::warn!("[session] ignoring stored theme: {}", e);
                ThemeSettings::default()
            }
        };

        let Some(token) = self.store.get::<String>(keys::TOKEN).await? else {
            log::debug!("[session] no stored token");
            return Ok(());
        };

        match self.store.get::<User>(keys::USER).await {
            Ok(Some(user)) => {
                log::info!("[session] restored session of user {}", user.id);
                self.tokens.set(token);
                self.user = Some(user);
                self.expired.store(false, Ordering::SeqCst);
                Ok(())
            }
            Ok(None) => {
                log::warn!("[session] token stored without user, logging out");
                self.logout().await
            }
            Err(e) => {
                log::error!("[session] stored user unreadable ({}), logging out", e);
                self.logout().await
            }
        }
    }

    /// Checks the restored token with the server.
    ///
    /// Ends the session when the server says the token is invalid. A network
    /// failure leaves the session in place and is returned.
    pub async fn validate(&mut self, client: &CrmClient) -> Result<bool, SessionError> {
        if !self.tokens.is_set() {
            return Ok(false);
        }
        let valid = client.validate_token().await?;
        if !valid {
            self.logout().await?;
        }
        Ok(valid)
    }

    /// Logs in and persists the new session.
    ///
    /// The server theme is pulled afterwards; failing to get it is only
    /// logged.
    pub async fn login(
        &mut self,
        client: &CrmClient,
        email: &str,
        password: &str,
        remember_me: bool,
    ) -> Result<&User, SessionError> {
        let login = client.login(email, password, remember_me).await?;

        self.store.set(keys::TOKEN, &login.token.token).await?;
        self.store.set(keys::USER, &login.user).await?;
        if remember_me {
            self.store.set(keys::AUTO_LOGIN, &true).await?;
        }
        self.tokens.set(login.token.token.clone());
        self.expired.store(false, Ordering::SeqCst);

        match client.get_settings().await {
            Ok(Some(theme)) => {
                self.store.set(keys::THEME, &theme).await?;
                self.theme = theme;
            }
            Ok(None) => log::debug!("[session] no server theme"),
            Err(e) => log::warn!("[session] could not load server theme: {}", e),
        }

        log::info!("[session] logged in as {}", login.user.email);
        Ok(self.user.insert(login.user))
    }

    /// Forgets token, user and auto-login, locally and in storage.
    ///
    /// The theme is kept so the login screen keeps the user's colors.
    pub async fn logout(&mut self) -> Result<(), SessionError> {
        self.tokens.clear();
        self.user = None;
        self.expired.store(false, Ordering::SeqCst);
        self.store.remove(keys::TOKEN).await?;
        self.store.remove(keys::USER).await?;
        self.store.remove(keys::AUTO_LOGIN).await?;
        log::info!("[session] logged out");
        Ok(())
    }

    /// Ends the session if a request was rejected with 401 since the last
    /// call. Returns `true` when it did, so the caller can show the login
    /// screen.
    pub async fn handle_unauthorized(&mut self) -> Result<bool, SessionError> {
        let expired = self.expired.swap(false, Ordering::SeqCst);
        if expired || (self.user.is_some() && !self.tokens.is_set()) {
            self.logout().await?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Applies a theme locally and saves it on the server.
    ///
    /// The local copy is kept even if the server call fails.
    pub async fn update_theme(
        &mut self,
        client: &CrmClient,
        theme: ThemeSettings,
    ) -> Result<(), SessionError> {
        self.store.set(keys::THEME, &theme).await?;
        self.theme = theme;
        if self.user.is_none() {
            return Err(SessionError::NotLoggedIn);
        }
        client.update_settings(&self.theme).await?;
        Ok(())
    }

    /// Replaces the cached profile after the user edited it.
    pub async fn update_user(&mut self, user: User) -> Result<(), SessionError> {
        self.store.set(keys::USER, &user).await?;
        self.user = Some(user);
        Ok(())
    }

    /// Whether the last login asked to be remembered.
    pub async fn auto_login(&self) -> bool {
        self.store.get_or(keys::AUTO_LOGIN, false).await.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use freight_lib::model::Role;

    fn user() -> User {
        User {
            id: 5,
            email: "admin@example.com".into(),
            username: Some("admin".into()),
            first_name: None,
            last_name: None,
            role: Role::Admin,
        }
    }

    #[tokio::test]
    async fn test_hydrate_restores_session() {
        let store = LocalStore::in_memory();
        store.set(keys::TOKEN, &"abc".to_string()).await.unwrap();
        store.set(keys::USER, &user()).await.unwrap();

        let mut session = Session::new(store);
        session.hydrate().await.unwrap();

        assert!(session.is_authenticated());
        assert_eq!(session.user().map(|u| u.id), Some(5));
        assert_eq!(
            session.token_provider().current().map(|t| t.header_value()),
            Some("Token abc".to_string())
        );
        assert_eq!(session.theme(), &ThemeSettings::default());
    }

    #[tokio::test]
    async fn test_hydrate_with_corrupt_user_logs_out() {
        let store = LocalStore::in_memory();
        store.set(keys::TOKEN, &"abc".to_string()).await.unwrap();
        store.set(keys::USER, &1u8).await.unwrap();
        store.set(keys::AUTO_LOGIN, &true).await.unwrap();

        let mut session = Session::new(store.clone());
        session.hydrate().await.unwrap();

        assert!(!session.is_authenticated());
        assert_eq!(store.get::<String>(keys::TOKEN).await.unwrap(), None);
        assert!(!session.auto_login().await);
    }

    #[tokio::test]
    async fn test_unauthorized_hook_ends_session() {
        let store = LocalStore::in_memory();
        store.set(keys::TOKEN, &"abc".to_string()).await.unwrap();
        store.set(keys::USER, &user()).await.unwrap();
        let mut session = Session::new(store.clone());
        session.hydrate().await.unwrap();

        assert!(!session.handle_unauthorized().await.unwrap());

        (session.unauthorized_hook())();
        assert!(session.handle_unauthorized().await.unwrap());
        assert!(session.user().is_none());
        assert_eq!(store.get::<User>(keys::USER).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_logout_keeps_theme() {
        let store = LocalStore::in_memory();
        let mut theme = ThemeSettings::default();
        theme.main.primary_color = "#000000".into();
        store.set(keys::THEME, &theme).await.unwrap();

        let mut session = Session::new(store.clone());
        session.hydrate().await.unwrap();
        session.logout().await.unwrap();

        assert_eq!(session.theme().main.primary_color, "#000000");
        assert!(store.get::<ThemeSettings>(keys::THEME).await.unwrap().is_some());
    }
}
