use std::fmt;
use std::path::Path;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ParamCrawlError, ParamCrawlResult};

/// A single URL to probe
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target(String);

impl Target {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where the run's targets come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSource {
    Single(String),
    List(std::path::PathBuf),
}

impl TargetSource {
    /// Build a source from the mutually exclusive single-target and list-file options
    pub fn from_options(single: Option<String>, list: Option<std::path::PathBuf>) -> ParamCrawlResult<Self> {
        match (single, list) {
            (Some(target), None) => Ok(TargetSource::Single(target)),
            (None, Some(path)) => Ok(TargetSource::List(path)),
            (Some(_), Some(_)) => Err(ParamCrawlError::InvalidInput(
                "a single target and a target list are mutually exclusive".to_string()
            )),
            (None, None) => Err(ParamCrawlError::InvalidInput(
                "either a single target or a target list is required".to_string()
            )),
        }
    }

    /// Resolve the source into the list of targets to probe
    pub async fn load(&self) -> ParamCrawlResult<Vec<Target>> {
        match self {
            TargetSource::Single(url) => Ok(parse_targets(url)),
            TargetSource::List(path) => load_targets(path).await,
        }
    }
}

/// Read a newline-delimited list of targets
pub async fn load_targets(path: &Path) -> ParamCrawlResult<Vec<Target>> {
    debug!("Loading targets from {}", path.display());

    let content = tokio::fs::read_to_string(path).await
        .map_err(|e| ParamCrawlError::FileError {
            path: path.to_path_buf(),
            message: format!("Failed to read target list: {}", e),
        })?;

    let targets = parse_targets(&content);
    info!("Loaded {} targets from {}", targets.len(), path.display());
    Ok(targets)
}

/// Split raw input into targets, one per non-blank line.
/// Lines that are not absolute URLs are skipped.
pub fn parse_targets(content: &str) -> Vec<Target> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| match Url::parse(line) {
            Ok(_) => true,
            Err(e) => {
                warn!("Skipping invalid target {:?}: {}", line, e);
                false
            }
        })
        .map(Target::new)
        .collect()
}
