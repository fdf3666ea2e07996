//! Feed document model and builder
//!
//! A [`FeedDocument`] is the serialization-ready form of a crawl result:
//! channel metadata plus one entry per thread in sorted order. Building it
//! is a pure transformation with no failure modes.

use crate::crawler::CrawlResult;
use chrono::{DateTime, Utc};

/// Enclosure MIME type for every entry; attachments are torrent files
pub const ENCLOSURE_TYPE: &str = "application/x-bittorrent";

/// Enclosure length placeholder; attachment sizes are not fetched
pub const ENCLOSURE_LENGTH: &str = "0";

/// One feed entry, mirroring a resolved thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: String,
    pub link: String,
    pub description: String,
    pub enclosure_url: String,
}

/// A complete syndication feed, ready for the RSS writer
#[derive(Debug, Clone)]
pub struct FeedDocument {
    pub title: String,
    /// Canonical first-page listing URL
    pub link: String,
    pub description: String,
    pub built_at: DateTime<Utc>,
    pub entries: Vec<FeedEntry>,
}

/// Builds a [`FeedDocument`] from an aggregated crawl result
///
/// The channel description mirrors the title, and entries preserve the
/// result's sorted-by-link order. `built_at` is passed in rather than read
/// from the clock so the output is deterministic under test.
pub fn build_feed(
    result: &CrawlResult,
    canonical_link: &str,
    built_at: DateTime<Utc>,
) -> FeedDocument {
    FeedDocument {
        title: result.feed_title.clone(),
        link: canonical_link.to_string(),
        description: result.feed_title.clone(),
        built_at,
        entries: result
            .threads
            .iter()
            .map(|thread| FeedEntry {
                title: thread.title.clone(),
                link: thread.link.clone(),
                description: thread.description.clone(),
                enclosure_url: thread.enclosure_url.clone(),
            })
            .collect(),
    }
}
