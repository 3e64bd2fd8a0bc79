//! Where grid highlights live and how failures reach the user

use async_trait::async_trait;
use freight_lib::CrmClient;
use freight_lib::error::Error;
use freight_lib::model::Highlight;

/// Persistence of highlight records.
#[async_trait]
pub trait HighlightStore: Send + Sync {
    async fn load(&self, table: &str) -> Result<Vec<Highlight>, Error>;

    /// Upserts every entry; `color: None` deletes.
    async fn save(&self, batch: &[Highlight]) -> Result<(), Error>;
}

#[async_trait]
impl HighlightStore for CrmClient {
    async fn load(&self, table: &str) -> Result<Vec<Highlight>, Error> {
        self.load_highlights(table).await
    }

    async fn save(&self, batch: &[Highlight]) -> Result<(), Error> {
        let result = self.save_highlights(batch).await?;
        log::debug!(
            "[grid] highlights saved: {} created, {} updated, {} deleted",
            result.created,
            result.updated,
            result.deleted
        );
        Ok(())
    }
}

/// Blocking user notification, shown once per failed operation.
pub trait AlertSink: Send + Sync {
    fn alert(&self, message: &str);
}

/// Alerts that only reach the log file.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAlertSink;

impl AlertSink for LogAlertSink {
    fn alert(&self, message: &str) {
        log::error!("[grid] {}", message);
    }
}
