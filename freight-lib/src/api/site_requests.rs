//! Site request workflow actions

use std::ops::Deref;

use super::Filters;
use super::ResourceApi;
use crate::CrmClient;
use crate::error::Error;
use crate::model::Resource;
use crate::model::SiteRequest;
use crate::response::ListEnvelope;

/// `/site-requests/requests/` with its status transitions.
#[derive(Clone, Copy)]
pub struct SiteRequestsApi<'a>(ResourceApi<'a>);

impl CrmClient {
    pub fn site_requests(&self) -> SiteRequestsApi<'_> {
        SiteRequestsApi(self.resource(Resource::SiteRequests))
    }
}

impl SiteRequestsApi<'_> {
    /// Lists requests as typed values.
    pub async fn list(&self, filters: &Filters) -> Result<ListEnvelope<SiteRequest>, Error> {
        self.client()
            .get_json(Resource::SiteRequests.path(), &filters.to_query())
            .await
    }

    /// Marks a request as in progress.
    pub async fn process(&self, id: i64) -> Result<(), Error> {
        self.transition(id, "process").await
    }

    /// Marks a request as completed.
    pub async fn complete(&self, id: i64) -> Result<(), Error> {
        self.transition(id, "complete").await
    }

    /// Marks a request as rejected.
    pub async fn reject(&self, id: i64) -> Result<(), Error> {
        self.transition(id, "reject").await
    }

    async fn transition(&self, id: i64, action: &str) -> Result<(), Error> {
        log::info!("[api] site request {}: {}", id, action);
        self.client()
            .post_empty(&Resource::SiteRequests.item_action_path(id, action))
            .await?;
        Ok(())
    }
}

impl<'a> Deref for SiteRequestsApi<'a> {
    type Target = ResourceApi<'a>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
