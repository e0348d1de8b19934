use std::path::{Path, PathBuf};
use anyhow::Result;
use clap::{ArgGroup, Parser, Subcommand};
use tracing::{info, warn};

use crate::config::Config;
use crate::input::{parse_headers, TargetSource};
use crate::dedup::dedup_file;
use crate::engine::{self, Dispatcher};
use crate::output::{FileSink, ResultSink, StdoutSink};

#[derive(Parser)]
#[command(name = "paramcrawl")]
#[command(about = "Discover parameter and field names exposed by web pages")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, short, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(long, short, global = true, help = "Path to a configuration file")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch targets and extract parameter names
    Crawl(CrawlArgs),

    /// Remove duplicate lines from an existing output file
    Dedup {
        #[arg(help = "File to deduplicate in place")]
        file: PathBuf,
    },

    /// Write the default configuration file
    Init {
        #[arg(short, long, help = "Force overwrite existing configuration")]
        force: bool,

        #[arg(long, help = "Where to write the configuration (defaults to ~/.paramcrawl/config.toml)")]
        path: Option<PathBuf>,
    },
}

#[derive(clap::Args, Debug, Default)]
#[command(group(ArgGroup::new("input").required(true).args(["target", "list"])))]
pub struct CrawlArgs {
    #[arg(short = 'u', long, visible_aliases = ["domain", "host"], help = "Single target URL")]
    pub target: Option<String>,

    #[arg(short, long, visible_aliases = ["lists", "hosts"], help = "File with one target URL per line")]
    pub list: Option<PathBuf>,

    #[arg(short = 'H', long = "header", help = "Header sent with every request, e.g. 'Cookie: session=abc' (repeatable)")]
    pub headers: Vec<String>,

    #[arg(short, long, help = "Per-request timeout in seconds, 0 for none [default: 10]")]
    pub timeout: Option<u64>,

    #[arg(short, long, help = "Seconds to wait before each request (only applied when greater than 1)")]
    pub delay: Option<u64>,

    #[arg(short, long, help = "File to write the unique parameter names to")]
    pub output: Option<PathBuf>,

    #[arg(long, help = "Maximum number of targets probed at once [default: unbounded]")]
    pub concurrency: Option<usize>,

    #[arg(long, help = "Report failed fetches on the result stream")]
    pub include_errors: bool,

    #[arg(long, help = "Merge with values already present in the output file")]
    pub append: bool,
}

impl CrawlArgs {
    /// Layer command-line values over the loaded configuration
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(timeout) = self.timeout {
            config.probe.timeout_secs = timeout;
        }
        if let Some(delay) = self.delay {
            config.probe.delay_secs = delay;
        }
        if let Some(concurrency) = self.concurrency {
            config.probe.max_concurrency = Some(concurrency).filter(|&n| n > 0);
        }
        if self.include_errors {
            config.probe.include_errors = true;
        }
        config.probe.headers.extend(self.headers.iter().cloned());

        if let Some(output) = &self.output {
            config.output.path = Some(output.clone());
        }
        if self.append {
            config.output.append = true;
        }
    }
}

pub async fn execute_command(args: &Args) -> Result<()> {
    match &args.command {
        Commands::Crawl(crawl) => handle_crawl_command(crawl, args.config.as_deref()).await,
        Commands::Dedup { file } => handle_dedup_command(file).await,
        Commands::Init { force, path } => handle_init_command(*force, path.as_deref()),
    }
}

async fn handle_crawl_command(crawl: &CrawlArgs, config_path: Option<&Path>) -> Result<()> {
    let mut config = Config::load(config_path)?;
    crawl.apply_to(&mut config);

    if let Err(e) = parse_headers(&config.probe.headers) {
        warn!("{}; every probe will be skipped", e);
    }

    let source = TargetSource::from_options(crawl.target.clone(), crawl.list.clone())?;
    let targets = source.load().await?;

    // Open the sink before any request so an unwritable path fails fast
    let mut sink: Box<dyn ResultSink> = match &config.output.path {
        Some(path) => Box::new(FileSink::open(path, config.output.append).await?),
        None => Box::new(StdoutSink::new()),
    };

    let dispatcher = Dispatcher::from_config(&config)?;
    let summary = engine::run(&dispatcher, targets, sink.as_mut()).await?;

    if let Some(path) = &config.output.path {
        info!("Saved {} unique values to {}", summary.unique_values, path.display());
    }

    Ok(())
}

async fn handle_dedup_command(file: &Path) -> Result<()> {
    let stats = dedup_file(file).await?;
    println!("{}: {} lines, {} unique", file.display(), stats.lines_read, stats.unique_lines);
    Ok(())
}

fn handle_init_command(force: bool, path: Option<&Path>) -> Result<()> {
    let config_path = Config::init(path, force)?;
    println!("Configuration initialized at {}", config_path.display());
    Ok(())
}
