//! Pure HTML extractors
//!
//! Turns fetched markup into typed records: a category listing page into
//! thread hrefs plus a candidate feed title, and a thread detail page into a
//! [`Thread`]. No I/O happens here; everything is a function from a document
//! to a value.

use crate::ExtractError;
use scraper::{ElementRef, Html, Selector};
use std::fmt;
use url::Url;

/// Anchors inside the thread-list structure of a listing page
const THREAD_LINK_SELECTOR: &str =
    r#"ul.threadlist li.thread div.media-body div.style3_subject a[href^="thread-"]"#;

/// The message body of a thread detail page
const MESSAGE_SELECTOR: &str = "div.message";

/// The attachment-download anchor of a thread detail page
const ATTACHMENT_SELECTOR: &str = r#"ul.attachlist a[href^="attach-download"]"#;

/// One resolved forum thread, ready for feed serialization
///
/// `link` and `enclosure_url` are always absolute; relative hrefs are
/// resolved before construction and the record is never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thread {
    pub title: String,
    pub link: String,
    pub description: String,
    pub enclosure_url: String,
}

/// Required fields of a thread detail page, for per-field extraction errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadField {
    Title,
    Description,
    Enclosure,
}

impl fmt::Display for ThreadField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ThreadField::Title => "title element",
            ThreadField::Description => "message body",
            ThreadField::Enclosure => "attachment anchor",
        };
        f.write_str(name)
    }
}

/// What one listing page yields
#[derive(Debug, Clone, Default)]
pub struct CategoryListing {
    /// First `<title>` text, candidate feed title (page 1's wins downstream)
    pub feed_title: Option<String>,

    /// Thread hrefs in document order, possibly relative
    pub thread_hrefs: Vec<String>,
}

/// Extracts thread links and the page title from listing markup
///
/// Zero matching anchors is a valid result (an empty category, or a page
/// past the end of the listing). The HTML5 parser is error-recovering, so
/// malformed markup degrades to an empty listing rather than an error.
pub fn extract_listing(html: &str) -> CategoryListing {
    let document = Html::parse_document(html);

    let feed_title = first_text(&document, "title");

    let anchors = selector(THREAD_LINK_SELECTOR);
    let thread_hrefs = document
        .select(&anchors)
        .filter_map(|a| a.value().attr("href"))
        .map(str::to_string)
        .collect();

    CategoryListing {
        feed_title,
        thread_hrefs,
    }
}

/// Extracts a [`Thread`] from thread detail markup
///
/// Requires a title element, exactly one message body, and exactly one
/// attachment-download anchor. The error names the field that was missing
/// or ambiguous so partial-failure reporting can say which threads broke
/// and why.
///
/// # Arguments
///
/// * `html` - The thread detail page markup
/// * `page_url` - The absolute URL the page was fetched from; becomes the
///   thread link and the base for resolving the attachment href
pub fn extract_thread(html: &str, page_url: &Url) -> Result<Thread, ExtractError> {
    let document = Html::parse_document(html);

    let title = first_text(&document, "title").ok_or_else(|| missing(ThreadField::Title, page_url))?;

    let message = single_element(&document, MESSAGE_SELECTOR, ThreadField::Description, page_url)?;
    let description = visible_text(&message);

    let attachment = single_element(&document, ATTACHMENT_SELECTOR, ThreadField::Enclosure, page_url)?;
    // An anchor without a usable href is as good as no anchor at all.
    let enclosure_url = attachment
        .value()
        .attr("href")
        .and_then(|href| page_url.join(href).ok())
        .ok_or_else(|| missing(ThreadField::Enclosure, page_url))?;

    Ok(Thread {
        title,
        link: page_url.to_string(),
        description,
        enclosure_url: enclosure_url.to_string(),
    })
}

fn missing(field: ThreadField, url: &Url) -> ExtractError {
    ExtractError::MissingField {
        field,
        url: url.to_string(),
    }
}

/// Parses a selector constant. The CSS literals above are fixed at compile
/// time, so a parse failure is programmer error.
fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("static selector must parse")
}

/// First matching element's text, trimmed, or None if absent/empty
fn first_text(document: &Html, css: &'static str) -> Option<String> {
    let sel = selector(css);
    document
        .select(&sel)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// The unique element matching `css`, erroring on zero or multiple matches
fn single_element<'a>(
    document: &'a Html,
    css: &'static str,
    field: ThreadField,
    url: &Url,
) -> Result<ElementRef<'a>, ExtractError> {
    let sel = selector(css);
    let mut matches = document.select(&sel);

    let first = matches.next().ok_or_else(|| missing(field, url))?;
    if matches.next().is_some() {
        return Err(ExtractError::AmbiguousField {
            field,
            url: url.to_string(),
        });
    }

    Ok(first)
}

/// Visible text of an element: tags stripped, entities decoded, whitespace
/// runs collapsed to single spaces
fn visible_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
