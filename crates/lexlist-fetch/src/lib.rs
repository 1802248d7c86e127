//! Fetch layer: query construction, response envelope parsing, and the
//! `reqwest`-backed page fetcher.
//!
//! The fetcher and its tests live behind the `http` feature; run them with
//! `cargo test -p lexlist-fetch --features http`.

pub mod envelope;

#[cfg(feature = "http")]
pub mod http;

pub use envelope::{parse_page, query_params};

#[cfg(feature = "http")]
pub use http::{ActFetcher, ApiConfig, ClientError, HttpPageFetcher, JudgmentFetcher, MappingFetcher};
