//! Local-file sink

use async_trait::async_trait;
use std::path::PathBuf;

use crate::sink::FeedSink;
use crate::SinkError;

/// Writes feeds to `<dir>/<category>.xml`, creating the directory on demand
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl FeedSink for FileSink {
    async fn write(&self, category_name: &str, xml: &str) -> Result<String, SinkError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.dir.join(format!("{}.xml", category_name));
        tokio::fs::write(&path, xml).await?;

        tracing::info!("Wrote feed to {}", path.display());
        Ok(path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_writes_feed_to_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(dir.path());

        let destination = sink.write("hd", "<rss/>").await.unwrap();

        let path = dir.path().join("hd.xml");
        assert_eq!(destination, path.display().to_string());
        assert_eq!(std::fs::read_to_string(path).unwrap(), "<rss/>");
    }

    #[tokio::test]
    async fn test_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("feeds").join("out");
        let sink = FileSink::new(&nested);

        sink.write("4k", "<rss/>").await.unwrap();
        assert!(nested.join("4k.xml").exists());
    }

    #[tokio::test]
    async fn test_overwrites_existing_feed() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(dir.path());

        sink.write("hd", "old").await.unwrap();
        sink.write("hd", "new").await.unwrap();

        assert_eq!(
            std::fs::read_to_string(dir.path().join("hd.xml")).unwrap(),
            "new"
        );
    }
}
