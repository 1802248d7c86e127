use std::time::Duration;

use lexlist_core::PageSize;

/// Tuning for one listing's loader.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    pub page_size: PageSize,
    /// Scroll triggers closer together than this collapse into one load.
    pub throttle_window: Duration,
    /// Quiet period required after the last filter edit.
    pub debounce_window: Duration,
    /// How close (in the caller's layout units) the end-of-list sentinel must
    /// be to the bottom of the viewport to count as "near".
    pub near_threshold: f64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            page_size: PageSize::default(),
            throttle_window: Duration::from_millis(150),
            debounce_window: Duration::from_millis(800),
            near_threshold: 200.0,
        }
    }
}

impl LoaderConfig {
    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }
}
