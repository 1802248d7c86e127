//! Loader layer: drives a [`PageFetcher`](lexlist_core::PageFetcher) from scroll
//! and filter events on a single-threaded `LocalSet`.

mod config;
mod debounce;
mod loader;
mod scheduler;

#[cfg(test)]
mod testing;

pub use config::LoaderConfig;
pub use debounce::Debouncer;
pub use loader::{ListLoader, LoadOutcome};
pub use scheduler::{Decision, ScrollPosition, ScrollScheduler, SkipReason};
