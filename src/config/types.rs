use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Threadcast
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub source: SourceConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub category: Vec<CategoryConfig>,
}

/// The forum site to crawl
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Forum base URL; thread and attachment hrefs are resolved against it
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Short source name, used in default output keys (e.g. "4k2")
    pub name: String,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Number of listing pages to crawl per category (1-based)
    pub pages: u32,

    /// Maximum number of concurrent in-flight requests per category
    #[serde(rename = "max-concurrent")]
    pub max_concurrent: usize,

    /// Retry attempts for transient fetch failures (0 disables retry)
    pub retries: u32,

    /// Base delay for exponential retry backoff (milliseconds)
    #[serde(rename = "retry-base-delay-ms")]
    pub retry_base_delay_ms: u64,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Optional deadline for a whole category crawl (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: Option<u64>,

    /// User agent sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            pages: 1,
            max_concurrent: 8,
            retries: 0,
            retry_base_delay_ms: 500,
            request_timeout_secs: 30,
            timeout_secs: None,
            user_agent: format!("threadcast/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl CrawlerConfig {
    /// Per-category crawl deadline, if configured.
    pub fn deadline(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Output configuration: local directory by default, S3 when configured
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for the file sink; one `<category>.xml` per category
    pub directory: String,

    /// Object-store sink; takes precedence over the file sink when present
    pub s3: Option<S3Config>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "./feeds".to_string(),
            s3: None,
        }
    }
}

/// S3 sink configuration
#[derive(Debug, Clone, Deserialize)]
pub struct S3Config {
    pub bucket: String,

    /// Key prefix; defaults to `feeds/<source name>`
    pub prefix: Option<String>,
}

/// One forum category to crawl
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryConfig {
    /// Category identifier as it appears in listing URLs
    pub id: String,

    /// Human-readable category name; also the output file/key stem
    pub name: String,

    /// Per-category override of `crawler.pages`
    pub pages: Option<u32>,
}
