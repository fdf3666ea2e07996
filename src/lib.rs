//! Threadcast: forum thread listings as syndication feeds
//!
//! This crate crawls a paginated forum category, resolves every discovered
//! thread concurrently, and serializes the results into an RSS 2.0 feed
//! written to a file or object-store sink.

pub mod config;
pub mod crawler;
pub mod feed;
pub mod sink;

use thiserror::Error;

use crate::crawler::ThreadField;

/// Top-level error for a category crawl run
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("No listing pages could be fetched for category '{category}'")]
    NoListingPages { category: String },

    #[error("Crawl for category '{category}' timed out after {seconds}s")]
    Timeout { category: String, seconds: u64 },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Feed serialization error: {0}")]
    Feed(#[from] FeedError),

    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single HTTP fetch that did not produce a usable document
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Network error for {url}: {source}")]
    Network { url: String, source: reqwest::Error },
}

impl FetchError {
    /// Whether a retry has any chance of succeeding.
    ///
    /// Timeouts, server errors, and rate-limit responses are transient;
    /// everything else is not.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Timeout { .. } => true,
            FetchError::Status { status, .. } => *status == 429 || (500..600).contains(status),
            FetchError::Network { .. } => false,
        }
    }
}

/// A required element was missing or ambiguous in thread markup
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Missing {field} in {url}")]
    MissingField { field: ThreadField, url: String },

    #[error("Ambiguous {field} in {url}: selector matched more than one element")]
    AmbiguousField { field: ThreadField, url: String },
}

/// Failure to turn one thread href into a `Thread` record
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Invalid thread href '{href}': {source}")]
    Href {
        href: String,
        source: url::ParseError,
    },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors from serializing a feed document
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("XML write error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Feed output was not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Errors from writing a serialized feed to its destination
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("S3 error: {0}")]
    S3(String),
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl_category, CrawlResult, Thread};
pub use feed::{build_feed, write_rss, FeedDocument};
pub use sink::{FeedSink, FileSink};
