//! Ordered accumulation of fetched pages.

use crate::page::{ContinuationToken, Page};

/// The items seen so far in one listing session, plus where to resume.
///
/// Items keep server order and are never deduplicated. Pages are assumed to
/// be validated by the fetcher already.
#[derive(Debug, Clone)]
pub struct Accumulator<T> {
    items: Vec<T>,
    continuation: Option<ContinuationToken>,
    has_more: bool,
    total_count: Option<u64>,
}

impl<T> Default for Accumulator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Accumulator<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            continuation: None,
            has_more: true,
            total_count: None,
        }
    }

    /// Merge a page. An initial page replaces the list, any other page is
    /// appended. Pagination metadata always follows the latest page.
    pub fn append_page(&mut self, page: Page<T>, is_initial: bool) {
        if is_initial {
            self.items = page.items;
        } else {
            self.items.extend(page.items);
        }
        self.continuation = page.next;
        self.has_more = page.has_more;
        if page.total_count.is_some() {
            self.total_count = page.total_count;
        }
    }

    pub fn reset(&mut self) {
        self.items.clear();
        self.continuation = None;
        self.has_more = true;
        self.total_count = None;
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn continuation(&self) -> Option<&ContinuationToken> {
        self.continuation.as_ref()
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn total_count(&self) -> Option<u64> {
        self.total_count
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
