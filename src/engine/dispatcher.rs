// src/engine/dispatcher.rs
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::config::Config;
use crate::input::Target;
use crate::error::ParamCrawlResult;
use crate::extract::Extractor;
use crate::filter::NoiseFilter;
use crate::probe::{ProbeOutcome, ProbeResult, ProbeSettings, Prober};
use crate::utils::http::HttpClient;

/// Room for results queued between the probers and the collector
const RESULT_CHANNEL_CAPACITY: usize = 1024;

/// Launches one prober task per target
pub struct Dispatcher {
    prober: Prober,
    semaphore: Option<Arc<Semaphore>>,
}

impl Dispatcher {
    /// Create a dispatcher. `max_concurrency` caps in-flight probes; `None` runs every target at once.
    pub fn new(prober: Prober, max_concurrency: Option<usize>) -> Self {
        Self {
            prober,
            semaphore: max_concurrency
                .filter(|&n| n > 0)
                .map(|n| Arc::new(Semaphore::new(n))),
        }
    }

    /// Build the HTTP client, extractor and filter a run needs from configuration
    pub fn from_config(config: &Config) -> ParamCrawlResult<Self> {
        let client = HttpClient::new(config.probe.user_agent.clone(), config.probe.timeout_secs)?;
        match client.timeout() {
            Some(timeout) => debug!("HTTP client as {} with a {}s timeout", client.user_agent(), timeout.as_secs()),
            None => debug!("HTTP client as {} with no timeout", client.user_agent()),
        }
        let prober = Prober::new(
            Arc::new(client),
            Extractor::new()?,
            NoiseFilter::new(&config.filter),
            ProbeSettings::from(&config.probe),
        );
        Ok(Self::new(prober, config.probe.max_concurrency))
    }

    /// Spawn a prober for every target.
    ///
    /// The returned receiver yields results as they arrive and closes once
    /// the last prober has finished. The join set holds each prober's outcome.
    pub fn dispatch(&self, targets: Vec<Target>) -> (mpsc::Receiver<ProbeResult>, JoinSet<ProbeOutcome>) {
        let (tx, rx) = mpsc::channel(RESULT_CHANNEL_CAPACITY);
        let mut tasks = JoinSet::new();

        match &self.semaphore {
            Some(semaphore) => info!("Dispatching {} targets, at most {} at a time", targets.len(), semaphore.available_permits()),
            None => info!("Dispatching {} targets", targets.len()),
        }

        for target in targets {
            let prober = self.prober.clone();
            let tx = tx.clone();
            let semaphore = self.semaphore.clone();

            tasks.spawn(async move {
                let _permit = match semaphore {
                    Some(semaphore) => semaphore.acquire_owned().await.ok(),
                    None => None,
                };
                debug!("Starting probe of {}", target);
                prober.probe(target, tx).await
            });
        }

        (rx, tasks)
    }
}
