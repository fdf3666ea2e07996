//! Crawler module: the fetch, extract, and aggregate pipeline
//!
//! - HTTP fetching with optional bounded retry
//! - Pure HTML extraction for listing and thread detail pages
//! - Per-thread resolution as the unit of concurrent work
//! - Per-category orchestration with bounded fan-out and partial-failure
//!   aggregation

mod coordinator;
mod extract;
mod fetcher;
mod resolver;

pub use coordinator::{crawl_category, listing_url, CrawlResult};
pub use extract::{extract_listing, extract_thread, CategoryListing, Thread, ThreadField};
pub use fetcher::{build_http_client, fetch, RetryPolicy};
pub use resolver::resolve_thread;
