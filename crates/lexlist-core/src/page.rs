//! Pages, continuation tokens and page sizes.
//!
//! Listing endpoints paginate in one of two shapes: a plain row offset, or a
//! cursor object whose fields are echoed back as `cursor_<field>` query
//! parameters. Both are carried as a [`ContinuationToken`], which only the
//! fetcher interprets.

use std::collections::BTreeMap;

use crate::error::ConfigError;

/// Opaque "where to resume" marker returned with each page.
#[derive(Debug, Clone, PartialEq)]
pub enum ContinuationToken {
    Offset(u64),
    Cursor(BTreeMap<String, serde_json::Value>),
}

/// Which token shape a listing endpoint speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationStyle {
    Offset,
    Cursor,
}

/// One bounded page of a remote listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<ContinuationToken>,
    pub has_more: bool,
    pub total_count: Option<u64>,
}

impl<T> Page<T> {
    /// A final page with no continuation.
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next: None,
            has_more: false,
            total_count: None,
        }
    }

    /// A page followed by more data at `next`.
    pub fn more(items: Vec<T>, next: ContinuationToken) -> Self {
        Self {
            items,
            next: Some(next),
            has_more: true,
            total_count: None,
        }
    }

    pub fn with_total(mut self, total: u64) -> Self {
        self.total_count = Some(total);
        self
    }
}

/// Number of items requested per page, fixed for a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSize(usize);

impl PageSize {
    pub const MAX: usize = 100;

    pub fn new(n: usize) -> Result<Self, ConfigError> {
        if n == 0 || n > Self::MAX {
            return Err(ConfigError::PageSize {
                got: n,
                max: Self::MAX,
            });
        }
        Ok(Self(n))
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(20)
    }
}
