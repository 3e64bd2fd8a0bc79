//! Typed local storage.
//!
//! Holds what survives a restart on this machine: the session token and
//! user, the theme, the last API URL and per-table column visibility.

mod backend;
mod memory;
mod sqlite;

pub use backend::StorageBackend;
pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Well-known storage keys.
pub mod keys {
    pub const TOKEN: &str = "token";
    pub const USER: &str = "user";
    pub const THEME: &str = "theme";
    pub const API_URL: &str = "api_url";
    pub const AUTO_LOGIN: &str = "autoLogin";
    pub const COLUMNS_PREFIX: &str = "columns:";

    /// Key of the visible-column list of one table.
    pub fn columns(table: &str) -> String {
        format!("{COLUMNS_PREFIX}{table}")
    }
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] async_sqlite::Error),
    #[error("cannot create storage directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot encode '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: bincode::Error,
    },
    #[error("cannot decode '{key}': {source}")]
    Decode {
        key: String,
        #[source]
        source: bincode::Error,
    },
}

/// Typed view over a [`StorageBackend`], encoding values with bincode.
#[derive(Clone)]
pub struct LocalStore {
    backend: Arc<dyn StorageBackend>,
}

impl LocalStore {
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// A store that forgets everything when dropped.
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// Opens the SQLite store at the platform data directory.
    pub async fn open_default() -> Result<Self, StorageError> {
        let path = crate::paths::storage_db().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "no home directory")
        })?;
        Ok(Self::new(SqliteBackend::open(path).await?))
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let Some(bytes) = self.backend.read(key).await? else {
            return Ok(None);
        };
        bincode::deserialize(&bytes)
            .map(Some)
            .map_err(|source| StorageError::Decode {
                key: key.to_string(),
                source,
            })
    }

    pub async fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> Result<T, StorageError> {
        Ok(self.get(key).await?.unwrap_or(default))
    }

    pub async fn set<T: Serialize + Sync>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let bytes = bincode::serialize(value).map_err(|source| StorageError::Encode {
            key: key.to_string(),
            source,
        })?;
        self.backend.write(key, bytes).await
    }

    pub async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.backend.remove(key).await
    }

    pub async fn keys(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        self.backend.keys(prefix).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use freight_lib::model::Role;
    use freight_lib::model::ThemeSettings;
    use freight_lib::model::User;

    #[tokio::test]
    async fn test_typed_round_trip() {
        let store = LocalStore::in_memory();
        let user = User {
            id: 3,
            email: "m@example.com".into(),
            username: None,
            first_name: Some("Ирина".into()),
            last_name: None,
            role: Role::Manager,
        };

        store.set(keys::USER, &user).await.unwrap();
        store.set(keys::THEME, &ThemeSettings::default()).await.unwrap();

        assert_eq!(store.get::<User>(keys::USER).await.unwrap(), Some(user));
        assert_eq!(
            store.get::<ThemeSettings>(keys::THEME).await.unwrap(),
            Some(ThemeSettings::default())
        );
        assert_eq!(store.get::<String>(keys::TOKEN).await.unwrap(), None);
        assert!(store.get_or(keys::AUTO_LOGIN, false).await.is_ok_and(|v| !v));
    }

    #[tokio::test]
    async fn test_decode_error_names_key() {
        let store = LocalStore::in_memory();
        store.set(keys::USER, &7u8).await.unwrap();

        let err = store.get::<User>(keys::USER).await.unwrap_err();
        assert!(matches!(err, StorageError::Decode { ref key, .. } if key == "user"));
    }
}
