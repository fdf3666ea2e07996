//! End-to-end crawl tests
//!
//! These tests run the full category pipeline against wiremock servers:
//! listing discovery, concurrent thread resolution, partial-failure
//! aggregation, ordering, feed serialization, and the file sink.

use chrono::{TimeZone, Utc};
use std::time::Duration;
use threadcast::config::{CategoryConfig, CrawlerConfig};
use threadcast::crawler::{crawl_category, listing_url};
use threadcast::feed::{build_feed, write_rss};
use threadcast::sink::{FeedSink, FileSink};
use threadcast::{CrawlError, ExtractError, ResolveError};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn category(id: &str, pages: u32) -> CategoryConfig {
    CategoryConfig {
        id: id.to_string(),
        name: format!("cat{}", id),
        pages: Some(pages),
    }
}

fn crawler_config() -> CrawlerConfig {
    CrawlerConfig {
        max_concurrent: 4,
        ..CrawlerConfig::default()
    }
}

fn listing_html(title: &str, hrefs: &[&str]) -> String {
    let items: String = hrefs
        .iter()
        .map(|href| {
            format!(
                r#"<li class="thread"><div class="media-body"><div class="style3_subject"><a href="{}">subject</a></div></div></li>"#,
                href
            )
        })
        .collect();
    format!(
        r#"<html><head><title>{}</title></head><body><ul class="threadlist">{}</ul></body></html>"#,
        title, items
    )
}

fn thread_html(title: &str, message: &str, attach_href: &str) -> String {
    format!(
        r#"<html><head><title>{}</title></head><body>
        <div class="message">{}</div>
        <ul class="attachlist"><li><a href="{}">download</a></li></ul>
        </body></html>"#,
        title, message, attach_href
    )
}

async fn mount_listing(server: &MockServer, category_id: &str, page: u32, body: String, delay: Option<Duration>) {
    let mut template = ResponseTemplate::new(200).set_body_string(body);
    if let Some(delay) = delay {
        template = template.set_delay(delay);
    }
    Mock::given(method("GET"))
        .and(path(format!("/forum-{}-{}.htm", category_id, page)))
        .respond_with(template)
        .mount(server)
        .await;
}

async fn mount_thread(server: &MockServer, n: u32) {
    Mock::given(method("GET"))
        .and(path(format!("/thread-{}.htm", n)))
        .respond_with(ResponseTemplate::new(200).set_body_string(thread_html(
            &format!("Thread {}", n),
            &format!("body {}", n),
            &format!("attach-download-{}.htm", n),
        )))
        .mount(server)
        .await;
}

fn base_url(server: &MockServer) -> Url {
    Url::parse(&server.uri()).unwrap()
}

#[tokio::test]
async fn test_two_pages_merge_and_sort() {
    let server = MockServer::start().await;

    // Page 1 responds slowly so page 2 completes first; its title must still win.
    mount_listing(
        &server,
        "1",
        1,
        listing_html("HD Forum Page 1", &["thread-3.htm", "thread-1.htm", "thread-5.htm"]),
        Some(Duration::from_millis(100)),
    )
    .await;
    mount_listing(
        &server,
        "1",
        2,
        listing_html("HD Forum Page 2", &["thread-2.htm", "thread-4.htm"]),
        None,
    )
    .await;
    for n in 1..=5 {
        mount_thread(&server, n).await;
    }

    let client = reqwest::Client::new();
    let base = base_url(&server);
    let result = crawl_category(&client, &base, &category("1", 2), &crawler_config())
        .await
        .unwrap();

    assert_eq!(result.feed_title, "HD Forum Page 1");
    assert_eq!(result.threads.len(), 5);
    assert!(result.skipped.is_empty());
    assert_eq!(result.listing_failures, 0);

    let links: Vec<_> = result.threads.iter().map(|t| t.link.clone()).collect();
    let mut sorted = links.clone();
    sorted.sort();
    assert_eq!(links, sorted);

    // Every link and enclosure is absolute.
    for thread in &result.threads {
        assert!(thread.link.starts_with("http://"));
        assert!(thread.enclosure_url.starts_with("http://"));
    }
}

#[tokio::test]
async fn test_partial_failure_skips_broken_thread() {
    let server = MockServer::start().await;

    mount_listing(
        &server,
        "1",
        1,
        listing_html(
            "Forum",
            &[
                "thread-1.htm",
                "thread-2.htm",
                "thread-3.htm",
                "thread-4.htm",
                "thread-5.htm",
            ],
        ),
        None,
    )
    .await;
    for n in [1, 2, 4, 5] {
        mount_thread(&server, n).await;
    }
    // Thread 3 has no attachment anchor.
    Mock::given(method("GET"))
        .and(path("/thread-3.htm"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><head><title>T3</title></head><body><div class="message">m</div></body></html>"#,
        ))
        .mount(&server)
        .await;

    let client = reqwest::Client::new();
    let base = base_url(&server);
    let result = crawl_category(&client, &base, &category("1", 1), &crawler_config())
        .await
        .unwrap();

    assert_eq!(result.threads.len(), 4);
    assert!(!result.threads.iter().any(|t| t.link.contains("thread-3")));

    // The failure is recorded, not silently dropped.
    assert_eq!(result.skipped.len(), 1);
    assert!(matches!(
        result.skipped[0],
        ResolveError::Extract(ExtractError::MissingField { .. })
    ));
}

#[tokio::test]
async fn test_fetch_failure_also_recorded_as_skip() {
    let server = MockServer::start().await;

    mount_listing(
        &server,
        "1",
        1,
        listing_html("Forum", &["thread-1.htm", "thread-2.htm"]),
        None,
    )
    .await;
    mount_thread(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/thread-2.htm"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = reqwest::Client::new();
    let base = base_url(&server);
    let result = crawl_category(&client, &base, &category("1", 1), &crawler_config())
        .await
        .unwrap();

    assert_eq!(result.threads.len(), 1);
    assert_eq!(result.skipped.len(), 1);
    assert!(matches!(result.skipped[0], ResolveError::Fetch(_)));
}

#[tokio::test]
async fn test_all_listing_pages_down_fails_crawl() {
    let server = MockServer::start().await;

    for page in 1..=2 {
        Mock::given(method("GET"))
            .and(path(format!("/forum-1-{}.htm", page)))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
    }

    let client = reqwest::Client::new();
    let base = base_url(&server);
    let err = crawl_category(&client, &base, &category("1", 2), &crawler_config())
        .await
        .unwrap_err();

    assert!(matches!(err, CrawlError::NoListingPages { .. }));
}

#[tokio::test]
async fn test_surviving_pages_carry_the_crawl() {
    let server = MockServer::start().await;

    // Page 1 down, page 2 up: crawl continues, title falls back to the
    // category name (page 2's title is never promoted).
    Mock::given(method("GET"))
        .and(path("/forum-1-1.htm"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_listing(
        &server,
        "1",
        2,
        listing_html("HD Forum Page 2", &["thread-7.htm"]),
        None,
    )
    .await;
    mount_thread(&server, 7).await;

    let client = reqwest::Client::new();
    let base = base_url(&server);
    let config = category("1", 2);
    let result = crawl_category(&client, &base, &config, &crawler_config())
        .await
        .unwrap();

    assert_eq!(result.feed_title, config.name);
    assert_eq!(result.threads.len(), 1);
    assert_eq!(result.listing_failures, 1);
}

#[tokio::test]
async fn test_empty_category_is_valid() {
    let server = MockServer::start().await;

    mount_listing(&server, "1", 1, listing_html("Empty Forum", &[]), None).await;

    let client = reqwest::Client::new();
    let base = base_url(&server);
    let result = crawl_category(&client, &base, &category("1", 1), &crawler_config())
        .await
        .unwrap();

    assert_eq!(result.feed_title, "Empty Forum");
    assert!(result.threads.is_empty());
    assert!(result.skipped.is_empty());
}

#[tokio::test]
async fn test_duplicate_hrefs_collapse() {
    let server = MockServer::start().await;

    // A pinned thread appears on both pages; it must resolve once.
    mount_listing(
        &server,
        "1",
        1,
        listing_html("Forum", &["thread-1.htm", "thread-2.htm"]),
        None,
    )
    .await;
    mount_listing(
        &server,
        "1",
        2,
        listing_html("Forum p2", &["thread-1.htm", "thread-3.htm"]),
        None,
    )
    .await;
    for n in 1..=3 {
        mount_thread(&server, n).await;
    }

    let client = reqwest::Client::new();
    let base = base_url(&server);
    let result = crawl_category(&client, &base, &category("1", 2), &crawler_config())
        .await
        .unwrap();

    assert_eq!(result.threads.len(), 3);
}

#[tokio::test]
async fn test_rerun_yields_identical_ordering() {
    let server = MockServer::start().await;

    mount_listing(
        &server,
        "1",
        1,
        listing_html(
            "Forum",
            &["thread-9.htm", "thread-2.htm", "thread-30.htm", "thread-4.htm"],
        ),
        None,
    )
    .await;
    for n in [9, 2, 30, 4] {
        mount_thread(&server, n).await;
    }

    let client = reqwest::Client::new();
    let base = base_url(&server);
    let cat = category("1", 1);
    let config = crawler_config();

    let first = crawl_category(&client, &base, &cat, &config).await.unwrap();
    let second = crawl_category(&client, &base, &cat, &config).await.unwrap();

    let first_links: Vec<_> = first.threads.iter().map(|t| t.link.clone()).collect();
    let second_links: Vec<_> = second.threads.iter().map(|t| t.link.clone()).collect();
    assert_eq!(first_links, second_links);
}

#[tokio::test]
async fn test_crawl_to_feed_to_sink() {
    let server = MockServer::start().await;

    mount_listing(
        &server,
        "1",
        1,
        listing_html("HD Forum", &["thread-2.htm", "thread-1.htm"]),
        None,
    )
    .await;
    for n in 1..=2 {
        mount_thread(&server, n).await;
    }

    let client = reqwest::Client::new();
    let base = base_url(&server);
    let cat = category("1", 1);
    let result = crawl_category(&client, &base, &cat, &crawler_config())
        .await
        .unwrap();

    let canonical = listing_url(&base, &cat.id, 1).unwrap();
    let built_at = Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap();
    let feed = build_feed(&result, canonical.as_str(), built_at);
    let xml = write_rss(&feed).unwrap();

    assert!(xml.contains("<title>HD Forum</title>"));
    assert!(xml.contains(r#"type="application/x-bittorrent""#));
    // Sorted: thread-1 appears before thread-2.
    let first = xml.find("thread-1.htm").unwrap();
    let second = xml.find("thread-2.htm").unwrap();
    assert!(first < second);

    let dir = tempfile::tempdir().unwrap();
    let sink = FileSink::new(dir.path());
    let destination = sink.write(&cat.name, &xml).await.unwrap();

    assert_eq!(std::fs::read_to_string(&destination).unwrap(), xml);
}

#[tokio::test]
async fn test_retry_recovers_from_transient_error() {
    let server = MockServer::start().await;

    // First attempt fails with 503, the retry succeeds.
    Mock::given(method("GET"))
        .and(path("/forum-1-1.htm"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_listing(&server, "1", 1, listing_html("Forum", &["thread-1.htm"]), None).await;
    mount_thread(&server, 1).await;

    let client = reqwest::Client::new();
    let base = base_url(&server);
    let config = CrawlerConfig {
        retries: 2,
        retry_base_delay_ms: 10,
        ..crawler_config()
    };
    let result = crawl_category(&client, &base, &category("1", 1), &config)
        .await
        .unwrap();

    assert_eq!(result.threads.len(), 1);
    assert_eq!(result.listing_failures, 0);
}

#[tokio::test]
async fn test_category_deadline_aborts_crawl() {
    let server = MockServer::start().await;

    mount_listing(
        &server,
        "1",
        1,
        listing_html("Forum", &["thread-1.htm"]),
        Some(Duration::from_secs(5)),
    )
    .await;

    let client = reqwest::Client::new();
    let base = base_url(&server);
    let config = CrawlerConfig {
        timeout_secs: Some(1),
        ..crawler_config()
    };
    let err = crawl_category(&client, &base, &category("1", 1), &config)
        .await
        .unwrap_err();

    assert!(matches!(err, CrawlError::Timeout { .. }));
}
