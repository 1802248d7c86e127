pub mod accumulator;
pub mod error;
pub mod fetcher;
pub mod filters;
pub mod listing;
pub mod page;
pub mod retry;
pub mod state;

pub use accumulator::Accumulator;
pub use error::{ConfigError, ErrorKind, FetchError, FilterError};
pub use fetcher::PageFetcher;
pub use filters::{ActFilters, ActSection, JudgmentFilters, ListingFilters, MappingFilters};
pub use listing::{Act, Judgment, LawMapping, ListItem};
pub use page::{ContinuationToken, Page, PageSize, PaginationStyle};
pub use retry::{FetchRequest, RetryController};
pub use state::{FailedStage, LoadBlocked, LoadPhase, PaginationState};
