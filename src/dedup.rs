// src/dedup.rs
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{ParamCrawlError, ParamCrawlResult};

/// Ordered set of unique result lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deduplicator {
    lines: BTreeSet<String>,
}

/// Line counts before and after a file was deduplicated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DedupStats {
    pub lines_read: usize,
    pub unique_lines: usize,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a line. Returns `false` if it was already present.
    pub fn insert(&mut self, line: impl Into<String>) -> bool {
        self.lines.insert(line.into())
    }

    /// Add every non-blank line of `content`, returning how many were read
    pub fn extend_from_text(&mut self, content: &str) -> usize {
        let mut read = 0;
        for line in content.lines().filter(|l| !l.trim().is_empty()) {
            read += 1;
            self.lines.insert(line.to_string());
        }
        read
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Newline-terminated rendering, one line per entry, sorted
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.lines.iter().map(|l| l.len() + 1).sum());
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    /// Replace the contents of `path` with the unique lines
    pub async fn write_to(&self, path: &Path) -> ParamCrawlResult<()> {
        debug!("Writing {} unique lines to {}", self.len(), path.display());

        tokio::fs::write(path, self.render()).await
            .map_err(|e| ParamCrawlError::SinkError {
                path: path.to_path_buf(),
                message: format!("Failed to write output: {}", e),
            })
    }

    /// Load the lines already present in `path`
    pub async fn from_file(path: &Path) -> ParamCrawlResult<(Self, usize)> {
        let content = tokio::fs::read_to_string(path).await
            .map_err(|e| ParamCrawlError::FileError {
                path: path.to_path_buf(),
                message: format!("Failed to read file: {}", e),
            })?;

        let mut dedup = Self::new();
        let read = dedup.extend_from_text(&content);
        Ok((dedup, read))
    }
}

/// Read `path`, drop duplicate and blank lines, and rewrite it sorted
pub async fn dedup_file(path: &Path) -> ParamCrawlResult<DedupStats> {
    let (dedup, lines_read) = Deduplicator::from_file(path).await?;
    dedup.write_to(path).await?;

    let stats = DedupStats { lines_read, unique_lines: dedup.len() };
    info!(
        "Deduplicated {}: {} lines -> {} unique",
        path.display(), stats.lines_read, stats.unique_lines
    );
    Ok(stats)
}
