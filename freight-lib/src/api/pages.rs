//! Async iterator over paginated list endpoints.

use futures::Stream;

use crate::CrmClient;
use crate::error::Error;
use crate::model::Record;
use crate::response::ListEnvelope;

/// Async iterator that yields pages of a list endpoint.
///
/// The first request carries the caller's filters; later requests follow the
/// absolute `next` URL the server returns. Endpoints without pagination yield
/// exactly one page.
///
/// # Example
///
/// ```ignore
/// let mut pages = client.resource(Resource::Clients).pages(&Filters::new());
///
/// while let Some(page) = pages.next().await {
///     for record in page?.results {
///         println!("{:?}", record.id());
///     }
/// }
/// ```
pub struct Pages<'a> {
    client: &'a CrmClient,
    next_url: Option<String>,
    query: Vec<(String, String)>,
    done: bool,
}

impl<'a> Pages<'a> {
    pub(crate) fn new(client: &'a CrmClient, path: &str, query: Vec<(String, String)>) -> Self {
        Self {
            client,
            next_url: Some(path.to_string()),
            query,
            done: false,
        }
    }

    /// Fetches the next page of results.
    ///
    /// Returns `None` when all pages have been consumed. After an error the
    /// iterator is exhausted.
    pub async fn next(&mut self) -> Option<Result<ListEnvelope<Record>, Error>> {
        if self.done {
            return None;
        }
        let url = match self.next_url.take() {
            Some(url) => url,
            None => {
                self.done = true;
                return None;
            }
        };

        // Only the first request carries the filters; `next` already has them.
        let query = std::mem::take(&mut self.query);
        match self.client.get_json::<ListEnvelope<Record>>(&url, &query).await {
            Ok(page) => {
                self.next_url = page.next.clone();
                if self.next_url.is_none() {
                    self.done = true;
                }
                Some(Ok(page))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }

    /// Collects every record of every page.
    pub async fn collect_all(mut self) -> Result<Vec<Record>, Error> {
        let mut records = Vec::new();
        while let Some(page) = self.next().await {
            records.extend(page?.results);
        }
        Ok(records)
    }

    /// Flattens the pages into a stream of records.
    pub fn into_stream(mut self) -> impl Stream<Item = Result<Record, Error>> + 'a {
        async_stream::try_stream! {
            while let Some(page) = self.next().await {
                for record in page?.results {
                    yield record;
                }
            }
        }
    }
}
