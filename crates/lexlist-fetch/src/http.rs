//! HTTP page fetcher for the legal-services listing API.

use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use lexlist_core::{
    Act, ActFilters, ContinuationToken, FetchError, Judgment, JudgmentFilters, LawMapping,
    ListItem, ListingFilters, MappingFilters, Page, PageFetcher, PageSize,
};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{info, warn};

use crate::envelope::{parse_page, query_params};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("building HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// Where the API lives and how to authenticate against it.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Like `https://api.example.org` (a trailing slash is tolerated).
    pub base_url: String,
    /// Sent as `Authorization: Bearer <token>` when present.
    pub bearer_token: Option<String>,
    /// Per-request timeout. `None` leaves it to reqwest's default (none).
    pub timeout: Option<Duration>,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            bearer_token: None,
            timeout: None,
        }
    }
}

/// Fetches pages of one listing over HTTP.
pub struct HttpPageFetcher<F, T> {
    client: reqwest::Client,
    base_url: String,
    bearer_token: Option<String>,
    _listing: PhantomData<fn() -> (F, T)>,
}

pub type JudgmentFetcher = HttpPageFetcher<JudgmentFilters, Judgment>;
pub type ActFetcher = HttpPageFetcher<ActFilters, Act>;
pub type MappingFetcher = HttpPageFetcher<MappingFilters, LawMapping>;

impl<F, T> HttpPageFetcher<F, T> {
    pub fn new(config: ApiConfig) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            bearer_token: config.bearer_token,
            _listing: PhantomData,
        })
    }
}

#[async_trait(?Send)]
impl<F, T> PageFetcher for HttpPageFetcher<F, T>
where
    F: ListingFilters,
    T: ListItem + DeserializeOwned,
{
    type Item = T;
    type Filters = F;

    async fn fetch(
        &self,
        filters: &F,
        continuation: Option<&ContinuationToken>,
        page_size: PageSize,
    ) -> Result<Page<T>, FetchError> {
        let url = format!("{}{}", self.base_url, filters.endpoint());
        let params = query_params(filters, continuation, page_size)?;
        let offset = match continuation {
            Some(ContinuationToken::Offset(n)) => *n,
            _ => 0,
        };

        info!(url = %url, listing = F::LISTING, offset, "fetching page");
        let mut request = self.client.get(&url).query(&params);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(url = %url, status = status.as_u16(), "listing request rejected");
            return Err(FetchError::from_status(status.as_u16(), body));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;
        let page: Page<T> = parse_page(&body, filters.style(), offset)?;
        info!(
            count = page.items.len(),
            has_more = page.has_more,
            "fetched page"
        );
        Ok(page)
    }
}
