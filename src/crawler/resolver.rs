//! Thread resolver
//!
//! Turns one discovered thread href into one [`Thread`] record: resolve the
//! href against the forum base, fetch the detail page, extract. Stateless
//! and side-effect-free apart from the network call, so any number of
//! resolutions can run in parallel.

use crate::crawler::extract::{extract_thread, Thread};
use crate::crawler::fetcher::{fetch, RetryPolicy};
use crate::ResolveError;
use reqwest::Client;
use url::Url;

/// Resolves a single thread href into a [`Thread`]
///
/// Any underlying fetch or extraction failure is wrapped in
/// [`ResolveError`], which carries the URL context for partial-failure
/// reporting.
pub async fn resolve_thread(
    client: &Client,
    base: &Url,
    href: &str,
    retry: &RetryPolicy,
) -> Result<Thread, ResolveError> {
    let url = base.join(href).map_err(|source| ResolveError::Href {
        href: href.to_string(),
        source,
    })?;

    let body = fetch(client, url.as_str(), retry).await?;
    let thread = extract_thread(&body, &url)?;

    tracing::debug!("Resolved thread: {}", thread.link);
    Ok(thread)
}
