// src/engine/collector.rs
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::ParamCrawlResult;
use crate::output::ResultSink;
use crate::probe::ProbeResult;

/// What the collector saw on the result stream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectStats {
    pub values: usize,
    pub errors: usize,
}

/// Drain `results` into `sink` in arrival order until every sender is gone.
///
/// Error-carrying results are counted and logged but never recorded.
/// A sink failure stops collection immediately.
pub async fn collect(
    mut results: mpsc::Receiver<ProbeResult>,
    sink: &mut dyn ResultSink,
) -> ParamCrawlResult<CollectStats> {
    let mut stats = CollectStats::default();

    while let Some(result) = results.recv().await {
        if let Some(error) = &result.error {
            warn!("{}: {}", result.target, error);
            stats.errors += 1;
            continue;
        }

        debug!("{} -> {}", result.target, result.value);
        sink.record(result.value).await?;
        stats.values += 1;
    }

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::input::Target;
    use crate::error::ParamCrawlError;
    use std::path::PathBuf;

    #[derive(Default)]
    struct VecSink {
        values: Vec<String>,
        fail_after: Option<usize>,
    }

    #[async_trait]
    impl ResultSink for VecSink {
        async fn record(&mut self, value: String) -> ParamCrawlResult<()> {
            if self.fail_after == Some(self.values.len()) {
                return Err(ParamCrawlError::SinkError { path: PathBuf::from("mem"), message: "full".to_string() });
            }
            self.values.push(value);
            Ok(())
        }

        async fn finish(&mut self) -> ParamCrawlResult<usize> {
            Ok(self.values.len())
        }
    }

    fn value(v: &str) -> ProbeResult {
        ProbeResult {
            target: Target::new("https://a.test"),
            status_line: "200 OK".to_string(),
            value: v.to_string(),
            error: None,
        }
    }

    #[tokio::test]
    async fn test_records_in_arrival_order_and_skips_errors() {
        let (tx, rx) = mpsc::channel(8);
        tx.send(value("b")).await.unwrap();
        tx.send(ProbeResult {
            target: Target::new("https://down.test"),
            status_line: String::new(),
            value: String::new(),
            error: Some("connection refused".to_string()),
        }).await.unwrap();
        tx.send(value("a")).await.unwrap();
        tx.send(value("b")).await.unwrap();
        drop(tx);

        let mut sink = VecSink::default();
        let stats = collect(rx, &mut sink).await.unwrap();
        assert_eq!(stats, CollectStats { values: 3, errors: 1 });
        assert_eq!(sink.values, vec!["b", "a", "b"]);
    }

    #[tokio::test]
    async fn test_sink_error_stops_collection() {
        let (tx, rx) = mpsc::channel(8);
        for v in ["a", "b", "c"] {
            tx.send(value(v)).await.unwrap();
        }
        drop(tx);

        let mut sink = VecSink { fail_after: Some(1), ..Default::default() };
        assert!(matches!(collect(rx, &mut sink).await, Err(ParamCrawlError::SinkError { .. })));
        assert_eq!(sink.values, vec!["a"]);
    }
}
