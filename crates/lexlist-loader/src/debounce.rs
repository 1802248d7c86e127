//! Trailing-edge debounce on the local task set.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use futures::future::LocalBoxFuture;
use tokio::task::JoinHandle;

struct Pending {
    handle: JoinHandle<()>,
    fired: Rc<Cell<bool>>,
}

/// Runs work once its window has passed without another `schedule` call.
///
/// Cancelling only stops a timer that has not fired yet; work that already
/// started is left to finish (callers guard its effects with their own
/// cancellation token). Must be used from inside a tokio `LocalSet`.
pub struct Debouncer {
    window: Duration,
    pending: Option<Pending>,
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Start or restart the timer with `work` as the action to run.
    pub fn schedule(&mut self, work: LocalBoxFuture<'static, ()>) {
        self.cancel();
        let deadline = tokio::time::Instant::now() + self.window;
        let fired = Rc::new(Cell::new(false));
        let flag = Rc::clone(&fired);
        let handle = tokio::task::spawn_local(async move {
            tokio::time::sleep_until(deadline).await;
            flag.set(true);
            work.await;
        });
        self.pending = Some(Pending { handle, fired });
    }

    /// Cancel a pending timer. Returns whether one was cancelled.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(p) if !p.fired.get() => {
                p.handle.abort();
                true
            }
            _ => false,
        }
    }

    /// A timer is armed and has not fired.
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|p| !p.fired.get())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::task::LocalSet;
    use tokio::time::{Instant, sleep};

    fn record(log: &Rc<std::cell::RefCell<Vec<(u32, Instant)>>>, n: u32) -> LocalBoxFuture<'static, ()> {
        let log = Rc::clone(log);
        Box::pin(async move { log.borrow_mut().push((n, Instant::now())) })
    }

    #[tokio::test(start_paused = true)]
    async fn only_last_schedule_runs() {
        LocalSet::new()
            .run_until(async {
                let log = Rc::new(std::cell::RefCell::new(Vec::new()));
                let mut d = Debouncer::new(Duration::from_millis(800));
                d.schedule(record(&log, 1));
                sleep(Duration::from_millis(100)).await;
                d.schedule(record(&log, 2));
                sleep(Duration::from_millis(100)).await;
                d.schedule(record(&log, 3));
                let last = Instant::now();
                assert!(d.is_pending());

                sleep(Duration::from_millis(900)).await;
                let log = log.borrow();
                assert_eq!(log.len(), 1);
                assert_eq!(log[0].0, 3);
                assert_eq!(log[0].1 - last, Duration::from_millis(800));
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_work() {
        LocalSet::new()
            .run_until(async {
                let log = Rc::new(std::cell::RefCell::new(Vec::new()));
                let mut d = Debouncer::new(Duration::from_millis(500));
                d.schedule(record(&log, 1));
                assert!(d.cancel());
                assert!(!d.is_pending());
                sleep(Duration::from_secs(1)).await;
                assert!(log.borrow().is_empty());
                assert!(!d.cancel());
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn drop_cancels() {
        LocalSet::new()
            .run_until(async {
                let log = Rc::new(std::cell::RefCell::new(Vec::new()));
                {
                    let mut d = Debouncer::new(Duration::from_millis(500));
                    d.schedule(record(&log, 1));
                }
                sleep(Duration::from_secs(1)).await;
                assert!(log.borrow().is_empty());
            })
            .await;
    }
}
