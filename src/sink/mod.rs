//! Output sinks for serialized feeds
//!
//! A sink takes a finished XML document and a category name and writes it to
//! a destination: a local directory, or an S3 bucket when built with the
//! `s3` feature.

mod file;
#[cfg(feature = "s3")]
mod s3;

use async_trait::async_trait;

use crate::SinkError;

pub use file::FileSink;
#[cfg(feature = "s3")]
pub use s3::S3Sink;

/// Destination for serialized feed documents
#[async_trait]
pub trait FeedSink: Send + Sync {
    /// Writes one category's feed and returns the destination written
    /// (a file path or an `s3://` URL) for reporting.
    async fn write(&self, category_name: &str, xml: &str) -> Result<String, SinkError>;
}
