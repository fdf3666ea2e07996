//! Category crawl orchestration
//!
//! Fetches every listing page of a category, collects the discovered thread
//! hrefs, fans out thread resolution with bounded concurrency, aggregates
//! partial failures, and returns a deterministically ordered result.

use crate::config::{CategoryConfig, CrawlerConfig};
use crate::crawler::extract::{extract_listing, CategoryListing, Thread};
use crate::crawler::fetcher::{fetch, RetryPolicy};
use crate::crawler::resolver::resolve_thread;
use crate::{CrawlError, ResolveError};
use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::collections::HashSet;
use url::Url;

/// Aggregate outcome of one category crawl
///
/// `threads` is sorted ascending by `link`. Per-thread failures are recorded
/// in `skipped` rather than aborting the crawl; failed listing pages are
/// counted in `listing_failures` (the crawl only fails outright when every
/// listing page failed).
#[derive(Debug)]
pub struct CrawlResult {
    pub feed_title: String,
    pub threads: Vec<Thread>,
    pub skipped: Vec<ResolveError>,
    pub listing_failures: usize,
}

/// Listing URL for a category page, 1-based
pub fn listing_url(base: &Url, category_id: &str, page: u32) -> Result<Url, url::ParseError> {
    base.join(&format!("forum-{}-{}.htm?orderby=tid", category_id, page))
}

/// Crawls one category and aggregates the result
///
/// Listing pages are fetched concurrently and slotted by page number, so
/// the feed title always comes from page 1 regardless of completion order.
/// Thread resolution is fanned out bounded by `max-concurrent`; a single
/// broken thread is skipped and recorded, never fatal.
///
/// When `timeout-secs` is configured, the whole crawl runs under a deadline:
/// on expiry every outstanding fetch is dropped and no partial result is
/// returned.
pub async fn crawl_category(
    client: &Client,
    base: &Url,
    category: &CategoryConfig,
    crawler: &CrawlerConfig,
) -> Result<CrawlResult, CrawlError> {
    match crawler.deadline() {
        Some(deadline) => tokio::time::timeout(
            deadline,
            crawl_category_inner(client, base, category, crawler),
        )
        .await
        .map_err(|_| CrawlError::Timeout {
            category: category.name.clone(),
            seconds: deadline.as_secs(),
        })?,
        None => crawl_category_inner(client, base, category, crawler).await,
    }
}

async fn crawl_category_inner(
    client: &Client,
    base: &Url,
    category: &CategoryConfig,
    crawler: &CrawlerConfig,
) -> Result<CrawlResult, CrawlError> {
    let pages = category.pages.unwrap_or(crawler.pages).max(1);
    let concurrency = crawler.max_concurrent.max(1);
    let retry = RetryPolicy::from(crawler);

    let mut page_urls = Vec::with_capacity(pages as usize);
    for page in 1..=pages {
        page_urls.push((page, listing_url(base, &category.id, page)?));
    }

    // Fetch listing pages concurrently; slot results by page index so page 1's
    // title wins no matter which page responds first.
    let fetched: Vec<(u32, Result<String, crate::FetchError>)> = stream::iter(page_urls)
        .map(|(page, url)| {
            let client = client.clone();
            async move {
                let body = fetch(&client, url.as_str(), &retry).await;
                (page, body)
            }
        })
        .buffer_unordered(concurrency)
        .collect()
        .await;

    let mut listings: Vec<Option<CategoryListing>> = vec![None; pages as usize];
    let mut listing_failures = 0;
    for (page, result) in fetched {
        match result {
            Ok(body) => listings[(page - 1) as usize] = Some(extract_listing(&body)),
            Err(err) => {
                listing_failures += 1;
                tracing::warn!(
                    "Listing page {} of category '{}' failed: {}",
                    page,
                    category.name,
                    err
                );
            }
        }
    }

    if listing_failures == pages as usize {
        return Err(CrawlError::NoListingPages {
            category: category.name.clone(),
        });
    }

    // Page 1's title specifically; later pages' titles are discarded. When
    // page 1 itself failed, the category name stands in.
    let feed_title = listings[0]
        .as_ref()
        .and_then(|listing| listing.feed_title.clone())
        .unwrap_or_else(|| category.name.clone());

    // Union hrefs in (page, document) order. Pinned threads reappear on every
    // page; the first occurrence wins so duplicates collapse before fan-out.
    let mut seen = HashSet::new();
    let mut hrefs = Vec::new();
    for listing in listings.iter().flatten() {
        for href in &listing.thread_hrefs {
            if seen.insert(href.clone()) {
                hrefs.push(href.clone());
            }
        }
    }

    tracing::info!(
        "Category '{}': {} listing pages fetched, {} threads discovered",
        category.name,
        pages as usize - listing_failures,
        hrefs.len()
    );

    // Bounded fan-out over thread detail pages.
    let mut threads = Vec::with_capacity(hrefs.len());
    let mut skipped = Vec::new();
    let mut resolutions = stream::iter(hrefs)
        .map(|href| {
            let client = client.clone();
            async move { resolve_thread(&client, base, &href, &retry).await }
        })
        .buffer_unordered(concurrency);

    while let Some(result) = resolutions.next().await {
        match result {
            Ok(thread) => threads.push(thread),
            Err(err) => {
                tracing::warn!("Skipping thread in category '{}': {}", category.name, err);
                skipped.push(err);
            }
        }
    }

    // Resolutions complete in nondeterministic order; sort exactly once,
    // after everything has settled, so reruns against identical markup yield
    // identical feeds.
    threads.sort_by(|a, b| a.link.cmp(&b.link));

    Ok(CrawlResult {
        feed_title,
        threads,
        skipped,
        listing_failures,
    })
}
