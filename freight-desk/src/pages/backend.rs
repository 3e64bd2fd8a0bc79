//! Resource endpoints the list screens need

use async_trait::async_trait;
use freight_lib::CrmClient;
use freight_lib::ListEnvelope;
use freight_lib::api::Filters;
use freight_lib::error::Error;
use freight_lib::model::Record;
use freight_lib::model::Resource;
use serde_json::Value;

#[async_trait]
pub trait RecordBackend: Send + Sync {
    async fn list(&self, resource: Resource, filters: &Filters) -> Result<ListEnvelope<Record>, Error>;
    async fn get(&self, resource: Resource, id: i64) -> Result<Record, Error>;
    async fn create(&self, resource: Resource, data: &Record) -> Result<Record, Error>;
    async fn update(&self, resource: Resource, id: i64, data: &Record) -> Result<Record, Error>;
    async fn delete(&self, resource: Resource, id: i64) -> Result<(), Error>;
    async fn reassign_owner(&self, resource: Resource, id: i64, user_id: i64) -> Result<Record, Error>;
    async fn export_excel(&self, resource: Resource) -> Result<Vec<u8>, Error>;
    async fn import_excel(&self, resource: Resource, file_name: &str, bytes: Vec<u8>) -> Result<Value, Error>;
}

#[async_trait]
impl RecordBackend for CrmClient {
    async fn list(&self, resource: Resource, filters: &Filters) -> Result<ListEnvelope<Record>, Error> {
        self.resource(resource).get_all(filters).await
    }

    async fn get(&self, resource: Resource, id: i64) -> Result<Record, Error> {
        self.resource(resource).get_by_id(id).await
    }

    async fn create(&self, resource: Resource, data: &Record) -> Result<Record, Error> {
        self.resource(resource).create(data).await
    }

    async fn update(&self, resource: Resource, id: i64, data: &Record) -> Result<Record, Error> {
        self.resource(resource).update(id, data).await
    }

    async fn delete(&self, resource: Resource, id: i64) -> Result<(), Error> {
        self.resource(resource).delete(id).await
    }

    async fn reassign_owner(&self, resource: Resource, id: i64, user_id: i64) -> Result<Record, Error> {
        CrmClient::reassign_owner(self, resource, id, user_id).await
    }

    async fn export_excel(&self, resource: Resource) -> Result<Vec<u8>, Error> {
        self.resource(resource).export_excel().await
    }

    async fn import_excel(&self, resource: Resource, file_name: &str, bytes: Vec<u8>) -> Result<Value, Error> {
        self.resource(resource).import_excel_bytes(file_name, bytes).await
    }
}
