//! Seed page fetching and the aggregate file the pages are collected into.

mod aggregate;
mod error;
mod fetcher;

pub use aggregate::{AGGREGATE_EXTENSION, AggregateStore, aggregate_file_name};
pub use error::{FetchError, StoreError};
pub use fetcher::fetch_page;
