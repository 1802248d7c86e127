//! Scroll-triggered scheduling of "load more".
//!
//! The scheduler decides; it never fetches. Each scroll (or intersection)
//! event is evaluated against the pagination gate and a leading-edge
//! throttle: the first trigger of a burst proceeds, later ones inside the
//! window are dropped rather than queued.

use std::time::Duration;

use lexlist_core::LoadBlocked;
use tokio::time::Instant;

/// Where the end-of-list sentinel sits relative to the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollPosition {
    /// Top edge of the sentinel rendered after the last item.
    pub sentinel_top: f64,
    /// Bottom edge of the visible area, in the same units.
    pub viewport_bottom: f64,
}

impl ScrollPosition {
    /// The sentinel is on screen.
    pub fn at_end() -> Self {
        Self {
            sentinel_top: 0.0,
            viewport_bottom: 0.0,
        }
    }

    pub fn is_near(&self, threshold: f64) -> bool {
        self.sentinel_top - self.viewport_bottom <= threshold
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NotNearEnd,
    Throttled,
    /// The previously triggered load has not resolved or rejected yet.
    Unsettled,
    Blocked(LoadBlocked),
    Unmounted,
    NothingToRetry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Trigger,
    Skip(SkipReason),
}

#[derive(Debug)]
pub struct ScrollScheduler {
    throttle_window: Duration,
    near_threshold: f64,
    last_trigger: Option<Instant>,
    unsettled: bool,
}

impl ScrollScheduler {
    pub fn new(throttle_window: Duration, near_threshold: f64) -> Self {
        Self {
            throttle_window,
            near_threshold,
            last_trigger: None,
            unsettled: false,
        }
    }

    /// Decide whether this event should start a load. A `Trigger` arms the
    /// throttle and marks the scheduler unsettled until [`settled`](Self::settled).
    pub fn evaluate(
        &mut self,
        position: ScrollPosition,
        gate: Result<(), LoadBlocked>,
        now: Instant,
    ) -> Decision {
        if !position.is_near(self.near_threshold) {
            return Decision::Skip(SkipReason::NotNearEnd);
        }
        if let Err(blocked) = gate {
            return Decision::Skip(SkipReason::Blocked(blocked));
        }
        if self.unsettled {
            return Decision::Skip(SkipReason::Unsettled);
        }
        if let Some(last) = self.last_trigger
            && now.duration_since(last) < self.throttle_window
        {
            return Decision::Skip(SkipReason::Throttled);
        }
        self.last_trigger = Some(now);
        self.unsettled = true;
        Decision::Trigger
    }

    /// The triggered load finished, successfully or not.
    pub fn settled(&mut self) {
        self.unsettled = false;
    }

    /// Forget throttle history; used when the listing restarts.
    pub fn reset(&mut self) {
        self.last_trigger = None;
        self.unsettled = false;
    }
}
