// src/probe.rs - Per-target fetch, extract and filter
use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::config::ProbeConfig;
use crate::input::{parse_headers, Header, Target};
use crate::error::ParamCrawlResult;
use crate::extract::Extractor;
use crate::filter::NoiseFilter;

/// Status line and decoded body of a successful fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub status_line: String,
    pub body: String,
}

/// Single-shot page retrieval
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, url: &str, headers: &[Header]) -> ParamCrawlResult<FetchedPage>;
}

/// One discovered value, or one failed fetch when errors are kept
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub target: Target,
    pub status_line: String,
    pub value: String,
    pub error: Option<String>,
}

impl ProbeResult {
    fn failed(target: Target, error: String) -> Self {
        Self {
            target,
            status_line: String::new(),
            value: String::new(),
            error: Some(error),
        }
    }
}

/// Lifecycle of a single probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeState {
    Pending,
    HeadersApplied,
    Delayed,
    Requesting,
    Succeeded,
    Failed,
    /// A configured header was malformed; nothing was sent.
    Aborted,
}

/// How a probe ended and how many results it sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub target: Target,
    pub state: ProbeState,
    pub emitted: usize,
}

/// Settings every probe in a run shares
#[derive(Debug, Clone, Default)]
pub struct ProbeSettings {
    pub headers: Vec<String>,
    pub delay_secs: u64,
    pub include_errors: bool,
}

impl From<&ProbeConfig> for ProbeSettings {
    fn from(config: &ProbeConfig) -> Self {
        Self {
            headers: config.headers.clone(),
            delay_secs: config.delay_secs,
            include_errors: config.include_errors,
        }
    }
}

impl ProbeSettings {
    /// Delay before each request; short delays of one second or less are ignored
    pub fn delay(&self) -> Option<Duration> {
        (self.delay_secs > 1).then(|| Duration::from_secs(self.delay_secs))
    }
}

/// Runs the fetch, extract, filter pipeline for one target at a time
#[derive(Clone)]
pub struct Prober {
    fetcher: Arc<dyn Fetch>,
    extractor: Arc<Extractor>,
    filter: Arc<NoiseFilter>,
    settings: Arc<ProbeSettings>,
}

impl Prober {
    pub fn new(
        fetcher: Arc<dyn Fetch>,
        extractor: Extractor,
        filter: NoiseFilter,
        settings: ProbeSettings,
    ) -> Self {
        Self {
            fetcher,
            extractor: Arc::new(extractor),
            filter: Arc::new(filter),
            settings: Arc::new(settings),
        }
    }

    /// Probe `target`, sending every surviving value on `results`.
    ///
    /// `results` is consumed: dropping it when the probe returns is what
    /// tells the collector this target is finished.
    pub async fn probe(&self, target: Target, results: mpsc::Sender<ProbeResult>) -> ProbeOutcome {
        let mut outcome = ProbeOutcome {
            target: target.clone(),
            state: ProbeState::Pending,
            emitted: 0,
        };

        let headers = match parse_headers(&self.settings.headers) {
            Ok(headers) => headers,
            Err(e) => {
                error!("Not probing {}: {}", target, e);
                outcome.state = ProbeState::Aborted;
                return outcome;
            }
        };
        self.transition(&mut outcome, ProbeState::HeadersApplied);

        if let Some(delay) = self.settings.delay() {
            self.transition(&mut outcome, ProbeState::Delayed);
            tokio::time::sleep(delay).await;
        }

        self.transition(&mut outcome, ProbeState::Requesting);
        let page = match self.fetcher.fetch(target.as_str(), &headers).await {
            Ok(page) => page,
            Err(e) => {
                if e.is_fetch_error() {
                    warn!("Probe of {} failed: {}", target, e);
                } else {
                    error!("Probe of {} failed: {}", target, e);
                }
                self.transition(&mut outcome, ProbeState::Failed);
                if self.settings.include_errors
                    && results.send(ProbeResult::failed(target, e.to_string())).await.is_ok()
                {
                    outcome.emitted = 1;
                }
                return outcome;
            }
        };

        // Filter synchronously so the regex iterators never live across an await
        let values: Vec<String> = self
            .extractor
            .extract(&page.body)
            .filter_map(|candidate| self.filter.accept(candidate.text))
            .collect();

        debug!("{} yielded {} values", target, values.len());

        for value in values {
            let result = ProbeResult {
                target: target.clone(),
                status_line: page.status_line.clone(),
                value,
                error: None,
            };
            if results.send(result).await.is_err() {
                warn!("Result channel closed while probing {}", target);
                break;
            }
            outcome.emitted += 1;
        }

        self.transition(&mut outcome, ProbeState::Succeeded);
        info!("{} [{}] -> {} values", target, page.status_line, outcome.emitted);
        outcome
    }

    fn transition(&self, outcome: &mut ProbeOutcome, next: ProbeState) {
        debug!("{}: {:?} -> {:?}", outcome.target, outcome.state, next);
        outcome.state = next;
    }
}
