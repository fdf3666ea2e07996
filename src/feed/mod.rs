//! Feed construction and serialization

mod builder;
mod rss;

pub use builder::{build_feed, FeedDocument, FeedEntry, ENCLOSURE_LENGTH, ENCLOSURE_TYPE};
pub use rss::write_rss;
