//! S3 object-store sink
//!
//! Uploads feeds under `<prefix>/<category>.xml` with public-read access and
//! an `application/rss+xml` content type, so the bucket can serve the feeds
//! directly to readers.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_sdk_s3::Client;

use crate::config::S3Config;
use crate::sink::FeedSink;
use crate::SinkError;

/// Writes feeds to an S3 bucket
pub struct S3Sink {
    client: Client,
    bucket: String,
    prefix: String,
}

impl S3Sink {
    pub fn new(client: Client, bucket: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            prefix: prefix.into(),
        }
    }

    /// Creates an S3 sink from ambient AWS credentials
    ///
    /// The key prefix defaults to `feeds/<source name>` when the config does
    /// not override it.
    pub async fn from_env(config: &S3Config, source_name: &str) -> Self {
        let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let client = Client::new(&aws_config);

        let prefix = config
            .prefix
            .clone()
            .unwrap_or_else(|| format!("feeds/{}", source_name));

        Self::new(client, config.bucket.clone(), prefix)
    }

    fn key(&self, category_name: &str) -> String {
        format!(
            "{}/{}.xml",
            self.prefix.trim_end_matches('/'),
            category_name
        )
    }
}

#[async_trait]
impl FeedSink for S3Sink {
    async fn write(&self, category_name: &str, xml: &str) -> Result<String, SinkError> {
        let key = self.key(category_name);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .acl(ObjectCannedAcl::PublicRead)
            .content_type("application/rss+xml")
            .body(ByteStream::from(xml.as_bytes().to_vec()))
            .send()
            .await
            .map_err(|e| SinkError::S3(e.to_string()))?;

        let destination = format!("s3://{}/{}", self.bucket, key);
        tracing::info!("Uploaded feed to {}", destination);
        Ok(destination)
    }
}
