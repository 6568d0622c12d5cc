//! apicheck - contract tests for a JSON API endpoint
//!
//! Fetches one target (`--url`) or every target listed in a file (`--file`),
//! validates each response against the fixed rule set, and writes one verdict
//! line per target to stdout and to a per-run log file.
//!
//! ## Exit status
//!
//! - `0`: every target was processed (validation failures included, unless `--strict`)
//! - `1`: setup failure, aborted run, or `--strict` with failing targets

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, Level};

use apicheck_core::{
    create_log_file, init_tracing, write_summary_json, BatchError, BatchRunner,
    FetchFailurePolicy, HttpFetcher, LineSink, ProbeConfig, TargetSource, COMPONENT_NAME,
};

#[derive(Parser, Debug)]
#[command(name = "apicheck")]
#[command(version = apicheck_core::VERSION)]
#[command(about = "Run a series of contract tests on a JSON API", long_about = None)]
#[command(group(ArgGroup::new("input").required(true).args(["url", "file"])))]
struct Cli {
    /// URL to be tested
    #[arg(short, long)]
    url: Option<String>,

    /// Path to a file listing URLs to test, one per line
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Folder for log files (default: ./logs)
    #[arg(short, long, env = "APICHECK_LOG_DIR")]
    logpath: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, env = "APICHECK_TIMEOUT_SECS", default_value_t = apicheck_core::DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Record unreachable targets as failures instead of aborting the run
    #[arg(long)]
    keep_going: bool,

    /// Exit non-zero when any target fails validation
    #[arg(long)]
    strict: bool,

    /// Write the batch summary as JSON to this path
    #[arg(long)]
    summary_json: Option<PathBuf>,

    /// Enable verbose diagnostics on stderr
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted diagnostics
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn probe_config(&self) -> ProbeConfig {
        let mut config = ProbeConfig::default().with_timeout_secs(self.timeout_secs);
        if let Some(dir) = &self.logpath {
            config = config.with_log_dir(dir);
        }
        if self.keep_going {
            config = config.with_fetch_failure_policy(FetchFailurePolicy::Continue);
        }
        config
    }

    fn target_source(&self) -> TargetSource {
        // The required "input" group guarantees exactly one of the two is set.
        match &self.url {
            Some(url) => TargetSource::Single(url.clone()),
            None => TargetSource::List(self.file.clone().unwrap_or_default()),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    init_tracing(cli.json, level);

    run(cli).await
}

/// Load targets, set up the log destination, and run the batch.
///
/// Any `Err` here becomes exit status 1.
async fn run(cli: Cli) -> Result<()> {
    let started_at = chrono::Utc::now();
    let config = cli.probe_config();

    let targets = cli
        .target_source()
        .load()
        .context("Failed to load targets")?;

    let (log_path, log_file) = create_log_file(&config.log_dir, started_at)
        .context("Failed to set up log destination")?;
    info!(log_file = %log_path.display(), targets = targets.len(), "Starting run");

    let fetcher = HttpFetcher::new(&config).context("Failed to set up HTTP client")?;
    let sink = LineSink::console_and_file(COMPONENT_NAME, log_file);
    let runner = BatchRunner::new(Arc::new(fetcher), Arc::new(sink))
        .with_policy(config.fetch_failure_policy);

    let summary = match runner.run(&targets).await {
        Ok(summary) => summary,
        Err(BatchError::Aborted { error, summary }) => {
            if let Some(path) = &cli.summary_json {
                write_summary_json(path, &summary)?;
            }
            error!(error = %error, "Run aborted");
            return Err(error).context("Run aborted on fetch failure");
        }
        Err(e) => return Err(e).context("Failed to record results"),
    };

    if let Some(path) = &cli.summary_json {
        write_summary_json(path, &summary)?;
    }

    if cli.strict && !summary.all_passed() {
        anyhow::bail!(
            "{} of {} target(s) failed validation",
            summary.failed_count(),
            summary.total()
        );
    }

    Ok(())
}
