use async_trait::async_trait;

use crate::error::FetchError;
use crate::filters::ListingFilters;
use crate::listing::ListItem;
use crate::page::{ContinuationToken, Page, PageSize};

/// Issues one bounded request to a listing endpoint.
///
/// `continuation` is `None` only for the first page of a session. Implementations
/// make a single remote call and must not keep per-session state; recovery is
/// left to the caller.
#[async_trait(?Send)]
pub trait PageFetcher {
    type Item: ListItem;
    type Filters: ListingFilters;

    async fn fetch(
        &self,
        filters: &Self::Filters,
        continuation: Option<&ContinuationToken>,
        page_size: PageSize,
    ) -> Result<Page<Self::Item>, FetchError>;
}
