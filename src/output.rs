// src/output.rs - Destinations for discovered values
use std::path::{Path, PathBuf};
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::dedup::Deduplicator;
use crate::error::{ParamCrawlError, ParamCrawlResult};

/// Single-writer destination for the values a run discovers.
///
/// Values are recorded in arrival order; implementations decide what is
/// persisted and when. `finish` returns the number of unique values.
#[async_trait]
pub trait ResultSink: Send {
    async fn record(&mut self, value: String) -> ParamCrawlResult<()>;

    async fn finish(&mut self) -> ParamCrawlResult<usize>;
}

/// Output file holding the unique, sorted values of one or more runs
pub struct FileSink {
    path: PathBuf,
    seen: Deduplicator,
}

impl FileSink {
    /// Open `path` for writing before any request is made, so an unwritable
    /// location fails the run up front.
    ///
    /// With `append`, values already in the file are kept and merged;
    /// otherwise the file is truncated immediately.
    pub async fn open(path: &Path, append: bool) -> ParamCrawlResult<Self> {
        let seen = if append && path.exists() {
            let (seen, read) = Deduplicator::from_file(path).await?;
            info!("Appending to {} ({} existing lines, {} unique)", path.display(), read, seen.len());
            seen
        } else {
            Deduplicator::new()
        };

        tokio::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(!append)
            .open(path)
            .await
            .map_err(|e| ParamCrawlError::SinkError {
                path: path.to_path_buf(),
                message: format!("Failed to open output: {}", e),
            })?;

        debug!("Output sink ready at {}", path.display());
        Ok(Self { path: path.to_path_buf(), seen })
    }
}

#[async_trait]
impl ResultSink for FileSink {
    async fn record(&mut self, value: String) -> ParamCrawlResult<()> {
        self.seen.insert(value);
        Ok(())
    }

    async fn finish(&mut self) -> ParamCrawlResult<usize> {
        self.seen.write_to(&self.path).await?;
        info!("Wrote {} unique values to {}", self.seen.len(), self.path.display());
        Ok(self.seen.len())
    }
}

/// Prints unique values to stdout once the run completes
#[derive(Default)]
pub struct StdoutSink {
    seen: Deduplicator,
}

impl StdoutSink {
    pub fn new() -> Self {
        warn!("No output path given; use --output PATH to save results. Printing to stdout");
        Self::default()
    }
}

#[async_trait]
impl ResultSink for StdoutSink {
    async fn record(&mut self, value: String) -> ParamCrawlResult<()> {
        self.seen.insert(value);
        Ok(())
    }

    async fn finish(&mut self) -> ParamCrawlResult<usize> {
        let rendered = self.seen.render();
        let mut stdout = tokio::io::stdout();
        let written = async {
            stdout.write_all(rendered.as_bytes()).await?;
            stdout.flush().await
        }.await;

        written.map_err(|e| ParamCrawlError::SinkError {
            path: PathBuf::from("<stdout>"),
            message: e.to_string(),
        })?;
        Ok(self.seen.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_sink_writes_unique_sorted_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");

        let mut sink = FileSink::open(&path, false).await.unwrap();
        for value in ["user", "id", "user", "csrf"] {
            sink.record(value.to_string()).await.unwrap();
        }
        assert_eq!(sink.finish().await.unwrap(), 3);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "csrf\nid\nuser\n");
    }

    #[tokio::test]
    async fn test_open_truncates_without_append() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");
        std::fs::write(&path, "stale\n").unwrap();

        let mut sink = FileSink::open(&path, false).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
        sink.record("fresh".to_string()).await.unwrap();
        sink.finish().await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "fresh\n");
    }

    #[tokio::test]
    async fn test_append_merges_existing_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");
        std::fs::write(&path, "token\nid\n").unwrap();

        let mut sink = FileSink::open(&path, true).await.unwrap();
        sink.record("id".to_string()).await.unwrap();
        sink.record("page".to_string()).await.unwrap();
        assert_eq!(sink.finish().await.unwrap(), 3);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "id\npage\ntoken\n");
    }

    #[tokio::test]
    async fn test_unwritable_path_fails_on_open() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no/such/dir/out.txt");
        assert!(matches!(FileSink::open(&path, false).await, Err(ParamCrawlError::SinkError { .. })));
    }
}
