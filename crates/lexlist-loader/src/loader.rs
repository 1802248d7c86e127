//! The incremental list loader.
//!
//! `ListLoader` owns the pagination state of one listing for as long as the
//! view showing it is alive. Scroll events go through the [`ScrollScheduler`],
//! filter edits through the [`Debouncer`]; both end in a single fetch path
//! that races the fetch against the session's cancellation token and checks
//! that token once more before touching state.
//!
//! Everything runs on one thread: state lives in a `RefCell` and is never
//! borrowed across an `.await`, so the only interleaving points are the
//! fetches and timers themselves.

use std::cell::RefCell;
use std::rc::Rc;

use lexlist_core::{
    ErrorKind, FetchRequest, ListingFilters, LoadPhase, PageFetcher, PaginationState,
};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::LoaderConfig;
use crate::debounce::Debouncer;
use crate::scheduler::{Decision, ScrollPosition, ScrollScheduler, SkipReason};

/// What became of one load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied { added: usize, has_more: bool },
    Failed(ErrorKind),
    /// The loader was unmounted or the session restarted while fetching.
    Discarded,
    Skipped(SkipReason),
}

type State<P> = PaginationState<<P as PageFetcher>::Item, <P as PageFetcher>::Filters>;

fn listing<P: PageFetcher>() -> &'static str {
    <P::Filters as ListingFilters>::LISTING
}

struct Inner<P: PageFetcher> {
    state: State<P>,
    filters: P::Filters,
    session: CancellationToken,
    scheduler: ScrollScheduler,
    debouncer: Debouncer,
}

struct Shared<P: PageFetcher> {
    fetcher: P,
    config: LoaderConfig,
    mount: CancellationToken,
    inner: RefCell<Inner<P>>,
}

/// Loads a listing page by page. Must be driven from inside a tokio `LocalSet`.
///
/// Dropping the loader unmounts it.
pub struct ListLoader<P: PageFetcher> {
    shared: Rc<Shared<P>>,
}

impl<P> ListLoader<P>
where
    P: PageFetcher + 'static,
    P::Item: 'static,
    P::Filters: 'static,
{
    pub fn new(fetcher: P, filters: P::Filters, config: LoaderConfig) -> Self {
        let mount = CancellationToken::new();
        let inner = Inner {
            state: PaginationState::new(),
            filters,
            session: mount.child_token(),
            scheduler: ScrollScheduler::new(config.throttle_window, config.near_threshold),
            debouncer: Debouncer::new(config.debounce_window),
        };
        Self {
            shared: Rc::new(Shared {
                fetcher,
                config,
                mount,
                inner: RefCell::new(inner),
            }),
        }
    }

    /// Reset and fetch the first page with the current filters.
    pub async fn load_initial(&self) -> LoadOutcome {
        self.shared.load_initial().await
    }

    /// Fetch the next page if the listing allows it right now.
    pub async fn load_more(&self) -> LoadOutcome {
        match self.shared.begin_more() {
            Ok((request, session)) => self.shared.execute(request, session).await,
            Err(reason) => LoadOutcome::Skipped(reason),
        }
    }

    /// Feed a scroll or intersection event. When the scheduler fires, the
    /// loader enters `LoadingMore` before returning and the load runs as a
    /// local task whose handle is returned.
    pub fn on_scroll(&self, position: ScrollPosition) -> Option<JoinHandle<LoadOutcome>> {
        if self.shared.mount.is_cancelled() {
            return None;
        }
        let decision = {
            let mut inner = self.shared.inner.borrow_mut();
            let gate = inner.state.can_load_more();
            inner.scheduler.evaluate(position, gate, Instant::now())
        };
        if let Decision::Skip(reason) = decision {
            debug!(listing = listing::<P>(), ?reason, "scroll trigger skipped");
            return None;
        }

        match self.shared.begin_more() {
            Ok((request, session)) => {
                let shared = Rc::clone(&self.shared);
                Some(tokio::task::spawn_local(async move {
                    shared.execute(request, session).await
                }))
            }
            Err(reason) => {
                self.shared.inner.borrow_mut().scheduler.settled();
                debug!(listing = listing::<P>(), ?reason, "scroll trigger skipped");
                None
            }
        }
    }

    /// Debounced filter edit. Returns whether a reload is now pending; going
    /// back to the filters already applied cancels any pending reload.
    pub fn on_filter_change(&self, filters: P::Filters) -> bool {
        if self.shared.mount.is_cancelled() {
            return false;
        }
        let mut inner = self.shared.inner.borrow_mut();
        if filters == inner.filters {
            if inner.debouncer.cancel() {
                debug!(listing = listing::<P>(), "filters reverted, reload cancelled");
            }
            return false;
        }
        let shared = Rc::clone(&self.shared);
        inner.debouncer.schedule(Box::pin(async move {
            shared.inner.borrow_mut().filters = filters;
            shared.load_initial().await;
        }));
        true
    }

    /// Apply filters and reload at once, e.g. when switching listing section.
    pub async fn reload_with(&self, filters: P::Filters) -> LoadOutcome {
        {
            let mut inner = self.shared.inner.borrow_mut();
            inner.debouncer.cancel();
            inner.filters = filters;
        }
        self.shared.load_initial().await
    }

    /// Re-issue the fetch that last failed, with the same filters and continuation.
    pub async fn retry(&self) -> LoadOutcome {
        if self.shared.mount.is_cancelled() {
            return LoadOutcome::Skipped(SkipReason::Unmounted);
        }
        let (request, session) = {
            let mut inner = self.shared.inner.borrow_mut();
            match inner.state.begin_retry() {
                Some(request) => (request, inner.session.clone()),
                None => return LoadOutcome::Skipped(SkipReason::NothingToRetry),
            }
        };
        info!(
            listing = listing::<P>(),
            initial = request.is_initial,
            "retrying failed fetch"
        );
        self.shared.execute(request, session).await
    }

    /// Tear down: pending reloads are dropped and in-flight results are discarded.
    pub fn unmount(&self) {
        self.shared.unmount();
    }

    pub fn is_mounted(&self) -> bool {
        !self.shared.mount.is_cancelled()
    }

    /// Read the pagination state.
    pub fn view<R>(&self, f: impl FnOnce(&State<P>) -> R) -> R {
        f(&self.shared.inner.borrow().state)
    }

    pub fn phase(&self) -> LoadPhase {
        self.view(|s| s.phase())
    }

    pub fn len(&self) -> usize {
        self.view(|s| s.items().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn has_more(&self) -> bool {
        self.view(|s| s.has_more())
    }

    pub fn last_error(&self) -> Option<ErrorKind> {
        self.view(|s| s.last_error())
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.view(|s| s.consecutive_failures())
    }

    pub fn filters(&self) -> P::Filters {
        self.shared.inner.borrow().filters.clone()
    }

    pub fn fetcher(&self) -> &P {
        &self.shared.fetcher
    }
}

impl<P> ListLoader<P>
where
    P: PageFetcher + 'static,
    P::Item: Clone + 'static,
    P::Filters: 'static,
{
    pub fn items(&self) -> Vec<P::Item> {
        self.view(|s| s.items().to_vec())
    }
}

impl<P: PageFetcher> Drop for ListLoader<P> {
    fn drop(&mut self) {
        self.shared.unmount();
    }
}

impl<P: PageFetcher> Shared<P> {
    fn unmount(&self) {
        if self.mount.is_cancelled() {
            return;
        }
        self.mount.cancel();
        if let Ok(mut inner) = self.inner.try_borrow_mut() {
            inner.debouncer.cancel();
        }
        debug!(listing = listing::<P>(), "loader unmounted");
    }

    /// Start a fresh session: the previous one is cancelled so its pending
    /// result can never land.
    fn begin_initial(&self) -> Option<(FetchRequest<P::Filters>, CancellationToken)> {
        if self.mount.is_cancelled() {
            return None;
        }
        let mut inner = self.inner.borrow_mut();
        inner.session.cancel();
        inner.session = self.mount.child_token();
        inner.state.begin_initial();
        inner.scheduler.reset();
        let request = FetchRequest {
            filters: inner.filters.clone(),
            continuation: None,
            is_initial: true,
        };
        Some((request, inner.session.clone()))
    }

    fn begin_more(&self) -> Result<(FetchRequest<P::Filters>, CancellationToken), SkipReason> {
        if self.mount.is_cancelled() {
            return Err(SkipReason::Unmounted);
        }
        let mut inner = self.inner.borrow_mut();
        let continuation = inner.state.begin_more().map_err(SkipReason::Blocked)?;
        let request = FetchRequest {
            filters: inner.filters.clone(),
            continuation,
            is_initial: false,
        };
        Ok((request, inner.session.clone()))
    }

    async fn load_initial(&self) -> LoadOutcome {
        match self.begin_initial() {
            Some((request, session)) => self.execute(request, session).await,
            None => LoadOutcome::Discarded,
        }
    }

    async fn execute(
        &self,
        request: FetchRequest<P::Filters>,
        session: CancellationToken,
    ) -> LoadOutcome {
        let result = tokio::select! {
            biased;
            _ = session.cancelled() => None,
            result = self.fetcher.fetch(
                &request.filters,
                request.continuation.as_ref(),
                self.config.page_size,
            ) => Some(result),
        };

        let result = match result {
            Some(result) if !session.is_cancelled() => result,
            _ => {
                debug!(listing = listing::<P>(), "discarding stale fetch");
                return LoadOutcome::Discarded;
            }
        };

        let mut inner = self.inner.borrow_mut();
        inner.scheduler.settled();
        match result {
            Ok(page) => {
                let added = page.items.len();
                let has_more = page.has_more;
                inner.state.apply_page(page, request.is_initial);
                info!(
                    listing = listing::<P>(),
                    added,
                    total = inner.state.items().len(),
                    has_more,
                    "page applied"
                );
                LoadOutcome::Applied { added, has_more }
            }
            Err(err) => {
                let kind = err.kind();
                warn!(
                    listing = listing::<P>(),
                    error = %err,
                    initial = request.is_initial,
                    "page fetch failed"
                );
                inner.state.apply_failure(kind, request);
                LoadOutcome::Failed(kind)
            }
        }
    }
}
