//! Site requests screen

use std::sync::Arc;

use async_trait::async_trait;
use freight_lib::CrmClient;
use freight_lib::ListEnvelope;
use freight_lib::api::Filters;
use freight_lib::error::Error;
use freight_lib::error::ValidationErrors;
use freight_lib::model::Record;
use freight_lib::model::RequestStatus;
use freight_lib::model::Resource;
use freight_lib::model::SiteRequest;

use super::backend::RecordBackend;
use super::pagination::Pagination;
use crate::forms;
use crate::grid::StatusSeverity;

#[async_trait]
pub trait SiteRequestBackend: Send + Sync {
    async fn list(&self, filters: &Filters) -> Result<ListEnvelope<SiteRequest>, Error>;
    async fn process(&self, id: i64) -> Result<(), Error>;
    async fn complete(&self, id: i64) -> Result<(), Error>;
    async fn reject(&self, id: i64) -> Result<(), Error>;
}

#[async_trait]
impl SiteRequestBackend for CrmClient {
    async fn list(&self, filters: &Filters) -> Result<ListEnvelope<SiteRequest>, Error> {
        self.site_requests().list(filters).await
    }

    async fn process(&self, id: i64) -> Result<(), Error> {
        self.site_requests().process(id).await
    }

    async fn complete(&self, id: i64) -> Result<(), Error> {
        self.site_requests().complete(id).await
    }

    async fn reject(&self, id: i64) -> Result<(), Error> {
        self.site_requests().reject(id).await
    }
}

/// A status change a manager can make on a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Process,
    Complete,
    Reject,
}

impl Transition {
    pub fn label(self) -> &'static str {
        match self {
            Self::Process => "В работу",
            Self::Complete => "Завершить",
            Self::Reject => "Отклонить",
        }
    }
}

/// Chip color of a request status.
pub fn status_severity(status: RequestStatus) -> StatusSeverity {
    match status {
        RequestStatus::New => StatusSeverity::Info,
        RequestStatus::InProgress => StatusSeverity::Warning,
        RequestStatus::Completed => StatusSeverity::Success,
        RequestStatus::Rejected => StatusSeverity::Error,
    }
}

/// Transitions offered for a request in `status`.
pub fn available_transitions(status: RequestStatus) -> &'static [Transition] {
    match status {
        RequestStatus::New => &[Transition::Process, Transition::Reject],
        RequestStatus::InProgress => &[Transition::Complete, Transition::Reject],
        RequestStatus::Completed | RequestStatus::Rejected => &[],
    }
}

pub struct SiteRequestsPage {
    backend: Arc<dyn SiteRequestBackend>,
    records: Arc<dyn RecordBackend>,
    requests: Vec<SiteRequest>,
    filters: Filters,
    pagination: Pagination,
    loading: bool,
    error: Option<String>,
    converting: Option<(i64, Record)>,
    draft_errors: ValidationErrors,
}

impl SiteRequestsPage {
    pub fn new(backend: Arc<dyn SiteRequestBackend>, records: Arc<dyn RecordBackend>) -> Self {
        Self {
            backend,
            records,
            requests: Vec::new(),
            filters: Filters::new(),
            pagination: Pagination::default(),
            loading: false,
            error: None,
            converting: None,
            draft_errors: ValidationErrors::new(),
        }
    }

    pub fn requests(&self) -> &[SiteRequest] {
        &self.requests
    }

    pub fn request(&self, id: i64) -> Option<&SiteRequest> {
        self.requests.iter().find(|r| r.id == id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub async fn load(&mut self) {
        let filters = self.pagination.apply(&self.filters);
        self.loading = true;
        match self.backend.list(&filters).await {
            Ok(list) => {
                self.pagination.set_total(list.total());
                self.requests = list.into_items();
                self.error = None;
            }
            Err(e) => {
                log::error!("[requests] failed to load site requests: {}", e);
                self.error = Some(e.user_message());
            }
        }
        self.loading = false;
    }

    /// Shows only requests in `status`, or all with `None`.
    pub async fn filter_status(&mut self, status: Option<RequestStatus>) {
        match status {
            Some(s) => {
                let value = serde_json::to_value(s)
                    .ok()
                    .and_then(|v| v.as_str().map(String::from))
                    .unwrap_or_default();
                self.filters.set("status", value);
            }
            None => self.filters.remove("status"),
        }
        self.pagination.reset();
        self.load().await;
    }

    /// Applies a status change and reloads.
    pub async fn transition(&mut self, id: i64, transition: Transition) -> Result<(), Error> {
        let result = match transition {
            Transition::Process => self.backend.process(id).await,
            Transition::Complete => self.backend.complete(id).await,
            Transition::Reject => self.backend.reject(id).await,
        };
        if let Err(e) = &result {
            log::error!("[requests] {:?} of {} failed: {}", transition, id, e);
            self.error = Some(e.user_message());
            return result;
        }
        self.load().await;
        result
    }

    /// Opens the client form prefilled from a request.
    pub fn start_convert(&mut self, id: i64) -> Option<&mut Record> {
        let draft = self.request(id)?.to_client_draft();
        self.draft_errors = ValidationErrors::new();
        self.converting = Some((id, draft));
        self.converting.as_mut().map(|(_, draft)| draft)
    }

    pub fn draft(&self) -> Option<&Record> {
        self.converting.as_ref().map(|(_, draft)| draft)
    }

    pub fn draft_mut(&mut self) -> Option<&mut Record> {
        self.converting.as_mut().map(|(_, draft)| draft)
    }

    pub fn draft_errors(&self) -> &ValidationErrors {
        &self.draft_errors
    }

    pub fn cancel_convert(&mut self) {
        self.converting = None;
    }

    /// Creates the client and takes the request into work.
    ///
    /// Returns the new client. An invalid draft keeps the form open and
    /// sends nothing.
    pub async fn convert(&mut self) -> Result<Option<Record>, Error> {
        let Some((id, draft)) = self.converting.clone() else {
            return Ok(None);
        };
        if let Err(errors) = forms::validate_client(&draft) {
            self.draft_errors = errors;
            return Ok(None);
        }

        let client = self.records.create(Resource::Clients, &draft).await.inspect_err(|e| {
            log::error!("[requests] failed to create client from request {}: {}", id, e);
        })?;
        log::info!("[requests] request {} converted to client {:?}", id, client.id());
        self.converting = None;
        self.transition(id, Transition::Process).await?;
        Ok(Some(client))
    }
}
