pub mod cli;
pub mod config;
pub mod input;
pub mod dedup;
pub mod engine;
pub mod error;
pub mod extract;
pub mod filter;
pub mod output;
pub mod probe;
pub mod utils;

// Re-export main types for easier access
pub use crate::config::Config;
pub use input::{Header, Target, TargetSource};
pub use dedup::{dedup_file, Deduplicator};
pub use engine::{Dispatcher, RunSummary};
pub use error::{ParamCrawlError, ParamCrawlResult};
pub use extract::{Candidate, Extractor};
pub use filter::{clean, is_noise, NoiseFilter};
pub use output::{FileSink, ResultSink, StdoutSink};
pub use probe::{Fetch, FetchedPage, ProbeOutcome, ProbeResult, ProbeState, Prober};
