mod collector;
mod dispatcher;

pub use collector::{collect, CollectStats};
pub use dispatcher::Dispatcher;

use tracing::{error, info};

use crate::input::Target;
use crate::error::ParamCrawlResult;
use crate::output::ResultSink;
use crate::probe::{ProbeOutcome, ProbeState};

/// Totals for one crawl
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub targets: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub aborted: usize,
    pub values_received: usize,
    pub errors_received: usize,
    pub unique_values: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: &ProbeOutcome) {
        match outcome.state {
            ProbeState::Succeeded => self.succeeded += 1,
            ProbeState::Aborted => self.aborted += 1,
            _ => self.failed += 1,
        }
    }
}

/// Probe every target, stream the results into `sink`, then finalize it.
///
/// Per-target failures are counted, never propagated. A sink failure
/// aborts the remaining probes and is returned.
pub async fn run(
    dispatcher: &Dispatcher,
    targets: Vec<Target>,
    sink: &mut dyn ResultSink,
) -> ParamCrawlResult<RunSummary> {
    let mut summary = RunSummary { targets: targets.len(), ..Default::default() };

    let (results, mut tasks) = dispatcher.dispatch(targets);

    let stats = match collect(results, sink).await {
        Ok(stats) => stats,
        Err(e) => {
            error!("Stopping run: {}", e);
            tasks.abort_all();
            return Err(e);
        }
    };

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(outcome) => summary.record(&outcome),
            Err(e) => {
                error!("Probe task failed: {}", e);
                summary.failed += 1;
            }
        }
    }

    summary.values_received = stats.values;
    summary.errors_received = stats.errors;
    summary.unique_values = sink.finish().await?;

    info!(
        "Probed {} targets ({} succeeded, {} failed, {} aborted): {} values, {} errors, {} unique",
        summary.targets, summary.succeeded, summary.failed, summary.aborted,
        summary.values_received, summary.errors_received, summary.unique_values
    );

    Ok(summary)
}
