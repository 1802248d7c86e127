//! Failure bookkeeping and manual retry.

use tracing::debug;

use crate::error::ErrorKind;
use crate::page::ContinuationToken;

/// A fetch as issued: enough to re-issue it verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest<F> {
    pub filters: F,
    pub continuation: Option<ContinuationToken>,
    pub is_initial: bool,
}

/// Records failures and holds the failed request until the user retries.
///
/// Never retries on its own. Every error kind is recoverable here; what to
/// tell the user (e.g. "log in again" for auth) is up to the caller.
#[derive(Debug, Clone)]
pub struct RetryController<F> {
    consecutive_failures: u32,
    last_error: Option<ErrorKind>,
    failed: Option<FetchRequest<F>>,
}

impl<F> Default for RetryController<F> {
    fn default() -> Self {
        Self {
            consecutive_failures: 0,
            last_error: None,
            failed: None,
        }
    }
}

impl<F: Clone> RetryController<F> {
    pub fn on_error(&mut self, kind: ErrorKind, request: FetchRequest<F>) {
        self.consecutive_failures += 1;
        self.last_error = Some(kind);
        self.failed = Some(request);
        debug!(
            kind = %kind,
            consecutive = self.consecutive_failures,
            "fetch failure recorded"
        );
    }

    pub fn on_success(&mut self) {
        self.consecutive_failures = 0;
        self.last_error = None;
        self.failed = None;
    }

    /// The request to re-issue, if the last fetch failed.
    pub fn retry_request(&self) -> Option<FetchRequest<F>> {
        self.failed.clone()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn last_error(&self) -> Option<ErrorKind> {
        self.last_error
    }
}
