//! Create, Read, Update, Delete operations
//!
//! Every backend collection follows the same REST shape, so one handle type
//! serves all of them. Resource-specific actions live next to it in their
//! own modules.
//!
//! # Example
//!
//! ```ignore
//! use freight_lib::api::Filters;
//! use freight_lib::model::{Record, Resource};
//!
//! let clients = client.resource(Resource::Clients);
//! let page = clients.get_all(&Filters::new().search("Вектор")).await?;
//!
//! let created = clients
//!     .create(&Record::new().set("company_name", "Vector Logistics"))
//!     .await?;
//! clients.delete(created.id().unwrap_or_default()).await?;
//! ```

use serde_json::json;

use super::Filters;
use super::Pages;
use crate::CrmClient;
use crate::error::Error;
use crate::model::Record;
use crate::model::Resource;
use crate::response::ListEnvelope;

/// Typed verbs over one backend collection.
#[derive(Clone, Copy)]
pub struct ResourceApi<'a> {
    client: &'a CrmClient,
    resource: Resource,
}

impl CrmClient {
    /// Returns the CRUD handle for `resource`.
    pub fn resource(&self, resource: Resource) -> ResourceApi<'_> {
        ResourceApi {
            client: self,
            resource,
        }
    }

    /// Hands a record over to another user by patching `created_by_id`.
    ///
    /// Only admins may call this; the backend answers 403 otherwise.
    pub async fn reassign_owner(
        &self,
        resource: Resource,
        id: i64,
        user_id: i64,
    ) -> Result<Record, Error> {
        log::info!("[api] reassigning {} {} to user {}", resource, id, user_id);
        self.patch_json(&resource.item_path(id), &json!({ "created_by_id": user_id }))
            .await
    }
}

impl<'a> ResourceApi<'a> {
    pub fn resource(&self) -> Resource {
        self.resource
    }

    pub(crate) fn client(&self) -> &'a CrmClient {
        self.client
    }

    /// Lists records matching `filters`.
    pub async fn get_all(&self, filters: &Filters) -> Result<ListEnvelope<Record>, Error> {
        let list: ListEnvelope<Record> = self
            .client
            .get_json(self.resource.path(), &filters.to_query())
            .await?;
        if list.unexpected_shape {
            log::warn!("[api] {} list answer was neither an array nor a page", self.resource);
        }
        Ok(list)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Record, Error> {
        self.client
            .get_json(&self.resource.item_path(id), &[])
            .await
    }

    /// Creates a record and returns the stored version.
    pub async fn create(&self, data: &Record) -> Result<Record, Error> {
        self.client.post_json(self.resource.path(), data).await
    }

    /// Replaces a record (`PUT`).
    pub async fn update(&self, id: i64, data: &Record) -> Result<Record, Error> {
        self.client
            .put_json(&self.resource.item_path(id), data)
            .await
    }

    /// Changes only the given fields (`PATCH`).
    pub async fn partial_update(&self, id: i64, data: &Record) -> Result<Record, Error> {
        self.client
            .patch_json(&self.resource.item_path(id), data)
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<(), Error> {
        self.client.delete(&self.resource.item_path(id)).await
    }

    /// Deletes several records one after another.
    ///
    /// Stops at the first failure; earlier deletions are not undone.
    pub async fn delete_many(&self, ids: &[i64]) -> Result<(), Error> {
        for id in ids {
            self.delete(*id).await?;
        }
        Ok(())
    }

    /// Iterates over every page of the list, following `next` links.
    pub fn pages(&self, filters: &Filters) -> Pages<'a> {
        Pages::new(self.client, self.resource.path(), filters.to_query())
    }
}
