//! Spreadsheet import/export and file downloads

use std::ops::Deref;
use std::path::Path;

use reqwest::multipart::Form;
use reqwest::multipart::Part;

use super::ResourceApi;
use crate::CrmClient;
use crate::error::ApiError;
use crate::error::Error;
use crate::model::Resource;

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

impl ResourceApi<'_> {
    /// Downloads the whole collection as an `.xlsx` workbook.
    pub async fn export_excel(&self) -> Result<Vec<u8>, Error> {
        let bytes = self
            .client()
            .get_bytes(&self.resource().action_path("export_excel"), &[])
            .await?;
        log::info!("[api] exported {} ({} bytes)", self.resource(), bytes.len());
        Ok(bytes)
    }

    /// Uploads a workbook from disk to `import_excel/`.
    pub async fn import_excel(&self, path: impl AsRef<Path>) -> Result<serde_json::Value, Error> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(ApiError::Io)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "import.xlsx".to_string());
        self.import_excel_bytes(&name, bytes).await
    }

    /// Uploads workbook bytes as the multipart field `file`.
    pub async fn import_excel_bytes(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<serde_json::Value, Error> {
        log::info!(
            "[api] importing {} into {} ({} bytes)",
            file_name,
            self.resource(),
            bytes.len()
        );
        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(XLSX_MIME)?;
        let form = Form::new().part("file", part);
        self.client()
            .post_multipart(&self.resource().action_path("import_excel"), form)
            .await
    }
}

/// `/orders/` with its CSV export.
#[derive(Clone, Copy)]
pub struct OrdersApi<'a>(ResourceApi<'a>);

/// `/documents/` with file download.
#[derive(Clone, Copy)]
pub struct DocumentsApi<'a>(ResourceApi<'a>);

impl CrmClient {
    pub fn orders(&self) -> OrdersApi<'_> {
        OrdersApi(self.resource(Resource::Orders))
    }

    pub fn documents(&self) -> DocumentsApi<'_> {
        DocumentsApi(self.resource(Resource::Documents))
    }
}

impl OrdersApi<'_> {
    /// Downloads all orders as CSV.
    pub async fn export_csv(&self) -> Result<Vec<u8>, Error> {
        self.client()
            .get_bytes(&Resource::Orders.action_path("export_orders_csv"), &[])
            .await
    }
}

impl DocumentsApi<'_> {
    /// Downloads the stored file of a document.
    pub async fn download(&self, id: i64) -> Result<Vec<u8>, Error> {
        let query = [("download".to_string(), "true".to_string())];
        self.client()
            .get_bytes(&Resource::Documents.item_path(id), &query)
            .await
    }
}

impl<'a> Deref for OrdersApi<'a> {
    type Target = ResourceApi<'a>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a> Deref for DocumentsApi<'a> {
    type Target = ResourceApi<'a>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
