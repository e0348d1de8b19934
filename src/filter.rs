// src/filter.rs - Noise classification and entity-artifact cleanup

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use crate::config::FilterConfig;

/// Scheme tokens, quotes, whitespace and punctuation that never appear in a bare parameter name
static NOISE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"http:?|tel:?|"|\s|-|\.|@|\+|\$|#|'|/"#).expect("noise pattern is valid")
});

/// Entity-encoding leftovers stripped from signal strings, in removal order
pub const ENTITY_ARTIFACTS: &[&str] = &[
    "&lt;", "lt;", "&gt;", "gt", "amp;", "&amp;", "&quot;", "quot;", "apos;", "&apos;", "&nbsp;", "nbsp;",
];

/// Whether `candidate` looks like a URL, path or sentence fragment rather than a parameter name
pub fn is_noise(candidate: &str) -> bool {
    NOISE_PATTERN.is_match(candidate)
}

/// Remove every entity artifact from `candidate`.
///
/// Passes repeat until nothing changes, so removing one artifact can never
/// leave another behind (`"ggtt"` becomes `""`, not `"gt"`).
pub fn clean(candidate: &str) -> String {
    let mut current = candidate.to_string();
    loop {
        let next = ENTITY_ARTIFACTS
            .iter()
            .fold(current.clone(), |acc, artifact| acc.replace(artifact, ""));
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Noise filter with optional user-supplied tokens on top of the built-in set
#[derive(Debug, Clone, Default)]
pub struct NoiseFilter {
    extra_tokens: Vec<String>,
}

impl NoiseFilter {
    pub fn new(config: &FilterConfig) -> Self {
        Self {
            extra_tokens: config
                .extra_noise_tokens
                .iter()
                .filter(|t| !t.is_empty())
                .cloned()
                .collect(),
        }
    }

    pub fn is_noise(&self, candidate: &str) -> bool {
        is_noise(candidate) || self.extra_tokens.iter().any(|t| candidate.contains(t.as_str()))
    }

    /// Filter then clean. Returns `None` for noise and for values that clean down to nothing.
    pub fn accept(&self, candidate: &str) -> Option<String> {
        if self.is_noise(candidate) {
            trace!("Rejected noise candidate {:?}", candidate);
            return None;
        }

        let cleaned = clean(candidate);
        if cleaned.is_empty() {
            trace!("Candidate {:?} cleaned to nothing", candidate);
            return None;
        }
        Some(cleaned)
    }
}
