//! Per-listing pagination state and its phase machine.
//!
//! ```text
//! Idle -> LoadingInitial -> Ready <-> LoadingMore
//!                 |                        |
//!                 +------> Failed <--------+
//!                            |
//!               retry: LoadingInitial / LoadingMore
//! ```
//!
//! A filter or section change sends any phase back to `LoadingInitial`.

use crate::accumulator::Accumulator;
use crate::error::ErrorKind;
use crate::page::{ContinuationToken, Page};
use crate::retry::{FetchRequest, RetryController};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailedStage {
    Initial,
    More,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Idle,
    LoadingInitial,
    Ready,
    LoadingMore,
    Failed(FailedStage),
}

/// Why a "load more" cannot start right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadBlocked {
    /// No initial page has been requested yet.
    NotStarted,
    /// The server reported no further pages.
    Exhausted,
    /// A fetch is outstanding.
    InFlight,
    /// The last fetch failed; only `retry` may proceed.
    Failed,
}

#[derive(Debug, Clone)]
pub struct PaginationState<T, F> {
    accumulator: Accumulator<T>,
    phase: LoadPhase,
    retry: RetryController<F>,
}

impl<T, F: Clone> Default for PaginationState<T, F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, F: Clone> PaginationState<T, F> {
    pub fn new() -> Self {
        Self {
            accumulator: Accumulator::new(),
            phase: LoadPhase::Idle,
            retry: RetryController::default(),
        }
    }

    /// Drop everything and enter `LoadingInitial`.
    pub fn begin_initial(&mut self) {
        self.accumulator.reset();
        self.retry.clear();
        self.phase = LoadPhase::LoadingInitial;
    }

    /// Enter `LoadingMore` if allowed, returning the continuation to fetch from.
    pub fn begin_more(&mut self) -> Result<Option<ContinuationToken>, LoadBlocked> {
        self.can_load_more()?;
        self.phase = LoadPhase::LoadingMore;
        Ok(self.accumulator.continuation().cloned())
    }

    pub fn can_load_more(&self) -> Result<(), LoadBlocked> {
        match self.phase {
            LoadPhase::Idle => Err(LoadBlocked::NotStarted),
            LoadPhase::LoadingInitial | LoadPhase::LoadingMore => Err(LoadBlocked::InFlight),
            LoadPhase::Failed(_) => Err(LoadBlocked::Failed),
            LoadPhase::Ready if !self.accumulator.has_more() => Err(LoadBlocked::Exhausted),
            LoadPhase::Ready => Ok(()),
        }
    }

    /// Re-enter the loading phase of the failed stage and hand back the failed request.
    pub fn begin_retry(&mut self) -> Option<FetchRequest<F>> {
        let LoadPhase::Failed(stage) = self.phase else {
            return None;
        };
        let request = self.retry.retry_request()?;
        self.phase = match stage {
            FailedStage::Initial => LoadPhase::LoadingInitial,
            FailedStage::More => LoadPhase::LoadingMore,
        };
        Some(request)
    }

    pub fn apply_page(&mut self, page: Page<T>, is_initial: bool) {
        self.accumulator.append_page(page, is_initial);
        self.retry.on_success();
        self.phase = LoadPhase::Ready;
    }

    /// Record a failure. Already loaded items stay untouched.
    pub fn apply_failure(&mut self, kind: ErrorKind, request: FetchRequest<F>) {
        let stage = if request.is_initial {
            FailedStage::Initial
        } else {
            FailedStage::More
        };
        self.retry.on_error(kind, request);
        self.phase = LoadPhase::Failed(stage);
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn items(&self) -> &[T] {
        self.accumulator.items()
    }

    pub fn continuation(&self) -> Option<&ContinuationToken> {
        self.accumulator.continuation()
    }

    pub fn has_more(&self) -> bool {
        self.accumulator.has_more()
    }

    pub fn total_count(&self) -> Option<u64> {
        self.accumulator.total_count()
    }

    pub fn is_loading_initial(&self) -> bool {
        self.phase == LoadPhase::LoadingInitial
    }

    pub fn is_loading_more(&self) -> bool {
        self.phase == LoadPhase::LoadingMore
    }

    pub fn in_flight(&self) -> bool {
        self.is_loading_initial() || self.is_loading_more()
    }

    pub fn last_error(&self) -> Option<ErrorKind> {
        self.retry.last_error()
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.retry.consecutive_failures()
    }

    /// Terminal state of a session: ready with nothing left to fetch.
    pub fn is_exhausted(&self) -> bool {
        self.phase == LoadPhase::Ready && !self.accumulator.has_more()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type State = PaginationState<u32, &'static str>;

    fn request(continuation: Option<u64>, is_initial: bool) -> FetchRequest<&'static str> {
        FetchRequest {
            filters: "f",
            continuation: continuation.map(ContinuationToken::Offset),
            is_initial,
        }
    }

    fn ready_with(items: Vec<u32>, next: Option<u64>) -> State {
        let mut state = State::new();
        state.begin_initial();
        let page = match next {
            Some(n) => Page::more(items, ContinuationToken::Offset(n)),
            None => Page::last(items),
        };
        state.apply_page(page, true);
        state
    }

    #[test]
    fn starts_idle() {
        let state = State::new();
        assert_eq!(state.phase(), LoadPhase::Idle);
        assert_eq!(state.can_load_more(), Err(LoadBlocked::NotStarted));
    }

    #[test]
    fn one_fetch_in_flight() {
        let mut state = ready_with(vec![1, 2], Some(2));
        assert_eq!(state.begin_more(), Ok(Some(ContinuationToken::Offset(2))));
        assert!(state.is_loading_more());
        assert_eq!(state.begin_more(), Err(LoadBlocked::InFlight));
    }

    #[test]
    fn exhausted_blocks_more() {
        let mut state = ready_with(vec![1], None);
        assert!(state.is_exhausted());
        assert_eq!(state.begin_more(), Err(LoadBlocked::Exhausted));
    }

    #[test]
    fn failed_more_keeps_items_and_retries_same_request() {
        let mut state = ready_with(vec![1, 2], Some(2));
        state.begin_more().unwrap();
        state.apply_failure(ErrorKind::Network, request(Some(2), false));

        assert_eq!(state.items(), &[1, 2]);
        assert_eq!(state.phase(), LoadPhase::Failed(FailedStage::More));
        assert_eq!(state.last_error(), Some(ErrorKind::Network));
        assert_eq!(state.can_load_more(), Err(LoadBlocked::Failed));

        let again = state.begin_retry().unwrap();
        assert_eq!(again, request(Some(2), false));
        assert!(state.is_loading_more());

        state.apply_page(Page::last(vec![3]), false);
        assert_eq!(state.items(), &[1, 2, 3]);
        assert!(state.last_error().is_none());
        assert_eq!(state.consecutive_failures(), 0);
    }

    #[test]
    fn failed_initial_retries_as_initial() {
        let mut state = State::new();
        state.begin_initial();
        state.apply_failure(ErrorKind::Auth, request(None, true));
        assert_eq!(state.phase(), LoadPhase::Failed(FailedStage::Initial));
        state.begin_retry().unwrap();
        assert!(state.is_loading_initial());
    }

    #[test]
    fn retry_without_failure_is_none() {
        let mut state = ready_with(vec![1], Some(1));
        assert!(state.begin_retry().is_none());
        assert_eq!(state.phase(), LoadPhase::Ready);
    }

    #[test]
    fn begin_initial_resets_from_any_phase() {
        let mut state = ready_with(vec![1, 2], Some(2));
        state.begin_more().unwrap();
        state.apply_failure(ErrorKind::Server, request(Some(2), false));
        state.begin_initial();
        assert!(state.items().is_empty());
        assert!(state.continuation().is_none());
        assert!(state.last_error().is_none());
        assert!(state.is_loading_initial());
    }
}
