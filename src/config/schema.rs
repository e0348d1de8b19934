use serde::{Serialize, Deserialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub probe: ProbeConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Per-request settings shared by every prober
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProbeConfig {
    pub timeout_secs: u64,
    /// Seconds to sleep before each request. Only honoured when greater than 1.
    pub delay_secs: u64,
    pub user_agent: Option<String>,
    /// Raw `Name: Value` strings, validated by each prober.
    pub headers: Vec<String>,
    /// Emit an empty, error-carrying result for targets whose fetch failed.
    pub include_errors: bool,
    /// Upper bound on in-flight probers. Unbounded when unset.
    pub max_concurrency: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FilterConfig {
    /// Literal substrings that mark a candidate as noise on top of the built-in set.
    pub extra_noise_tokens: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    pub path: Option<PathBuf>,
    /// Merge with lines already present in `path` instead of truncating it.
    pub append: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            delay_secs: 0,
            user_agent: None,
            headers: Vec::new(),
            include_errors: false,
            max_concurrency: None,
        }
    }
}
