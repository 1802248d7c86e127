//! In-memory fetcher that replays a script of pages and failures.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use lexlist_core::{
    ContinuationToken, FetchError, JudgmentFilters, ListItem, Page, PageFetcher, PageSize,
};
use tokio::time::Instant;

#[derive(Debug, Clone, PartialEq)]
pub struct Row(pub u32);

impl ListItem for Row {
    fn key(&self) -> String {
        self.0.to_string()
    }

    fn card(&self) -> Vec<(&'static str, String)> {
        vec![("row", self.0.to_string())]
    }
}

#[derive(Debug, Clone)]
pub struct Call {
    pub filters: JudgmentFilters,
    pub continuation: Option<ContinuationToken>,
    pub page_size: PageSize,
    pub at: Instant,
}

/// Pops one scripted response per call, at call time, then waits `latency`.
pub struct ScriptedFetcher {
    script: RefCell<VecDeque<Result<Page<Row>, FetchError>>>,
    calls: RefCell<Vec<Call>>,
    latency: Duration,
}

impl ScriptedFetcher {
    pub fn new(latency: Duration) -> Self {
        Self {
            script: RefCell::new(VecDeque::new()),
            calls: RefCell::new(Vec::new()),
            latency,
        }
    }

    pub fn then(self, response: Result<Page<Row>, FetchError>) -> Self {
        self.script.borrow_mut().push_back(response);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }
}

/// `n` rows numbered from `start`.
pub fn rows(start: u32, n: u32) -> Vec<Row> {
    (start..start + n).map(Row).collect()
}

#[async_trait(?Send)]
impl PageFetcher for ScriptedFetcher {
    type Item = Row;
    type Filters = JudgmentFilters;

    async fn fetch(
        &self,
        filters: &JudgmentFilters,
        continuation: Option<&ContinuationToken>,
        page_size: PageSize,
    ) -> Result<Page<Row>, FetchError> {
        self.calls.borrow_mut().push(Call {
            filters: filters.clone(),
            continuation: continuation.cloned(),
            page_size,
            at: Instant::now(),
        });
        let response = self
            .script
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(FetchError::Malformed("script exhausted".into())));
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        response
    }
}
