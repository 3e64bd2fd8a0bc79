//! SQLite storage backend with a read-through cache.

use std::path::Path;

use async_sqlite::Client;
use async_sqlite::ClientBuilder;
use async_trait::async_trait;
use dashmap::DashMap;

use super::StorageBackend;
use super::StorageError;

/// Local storage persisted in one SQLite table, `local_storage(key, value)`.
pub struct SqliteBackend {
    client: Client,
    cache: DashMap<String, Vec<u8>>,
}

impl SqliteBackend {
    /// Opens (or creates) the database at `path`.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        log::debug!("[storage] opening {}", path.display());

        let client = ClientBuilder::new().path(path).open().await?;
        client
            .conn(|conn| {
                conn.execute(
                    "CREATE TABLE IF NOT EXISTS local_storage (
                        key TEXT PRIMARY KEY,
                        value BLOB NOT NULL
                    )",
                    [],
                )
            })
            .await?;

        Ok(Self {
            client,
            cache: DashMap::new(),
        })
    }
}

#[async_trait]
impl StorageBackend for SqliteBackend {
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        if let Some(hit) = self.cache.get(key) {
            return Ok(Some(hit.clone()));
        }

        let lookup = key.to_string();
        let value = self
            .client
            .conn(move |conn| {
                let mut stmt = conn.prepare("SELECT value FROM local_storage WHERE key = ?1")?;
                let mut rows = stmt.query([&lookup])?;
                rows.next()?.map(|row| row.get::<_, Vec<u8>>(0)).transpose()
            })
            .await?;

        if let Some(bytes) = &value {
            self.cache.insert(key.to_string(), bytes.clone());
        }
        Ok(value)
    }

    async fn write(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
        let row_key = key.to_string();
        let row_value = value.clone();
        self.client
            .conn(move |conn| {
                conn.execute(
                    "INSERT INTO local_storage (key, value) VALUES (?1, ?2)
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                    rusqlite::params![row_key, row_value],
                )
            })
            .await?;

        self.cache.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let row_key = key.to_string();
        self.client
            .conn(move |conn| conn.execute("DELETE FROM local_storage WHERE key = ?1", [row_key]))
            .await?;

        self.cache.remove(key);
        Ok(())
    }

    async fn keys(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        // `substr` instead of LIKE so `_` and `%` in table names match literally.
        let prefix = prefix.to_string();
        let keys = self
            .client
            .conn(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT key FROM local_storage WHERE substr(key, 1, length(?1)) = ?1",
                )?;
                let rows = stmt.query_map([&prefix], |row| row.get(0))?;
                rows.collect::<Result<Vec<String>, _>>()
            })
            .await?;
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.db");

        let backend = SqliteBackend::open(&path).await.unwrap();
        backend.write("token", b"abc".to_vec()).await.unwrap();
        backend.write("columns:site_requests", vec![1]).await.unwrap();
        backend.write("columnsXsite", vec![2]).await.unwrap();
        drop(backend);

        let backend = SqliteBackend::open(&path).await.unwrap();
        assert_eq!(backend.read("token").await.unwrap(), Some(b"abc".to_vec()));
        assert_eq!(
            backend.keys("columns:").await.unwrap(),
            vec!["columns:site_requests".to_string()]
        );

        backend.remove("token").await.unwrap();
        assert_eq!(backend.read("token").await.unwrap(), None);
    }
}
