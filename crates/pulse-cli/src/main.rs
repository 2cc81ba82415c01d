use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use pulse_sync::{ConfigOverrides, SyncConfig, SyncPipeline};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "pulse-cli")]
#[command(about = "Subreddit Political Pulse sync and export")]
struct Cli {
    #[command(flatten)]
    overrides: OverrideArgs,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Args)]
struct OverrideArgs {
    /// Source data file (overrides PULSE_SOURCE_PATH)
    #[arg(long, global = true)]
    source: Option<PathBuf>,
    /// Name of the exported binding in the source file
    #[arg(long, global = true)]
    binding: Option<String>,
    /// Export destination (overrides PULSE_OUTPUT_PATH)
    #[arg(long, global = true)]
    output: Option<PathBuf>,
    /// Year applied to every M/D date (overrides PULSE_DATA_YEAR)
    #[arg(long, global = true)]
    year: Option<i32>,
}

impl From<OverrideArgs> for ConfigOverrides {
    fn from(args: OverrideArgs) -> Self {
        Self {
            year: args.year,
            source_path: args.source,
            binding: args.binding,
            output_path: args.output,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Load, upsert, and export in one transaction
    Sync,
    /// Create the metrics table and indexes if missing
    Migrate,
    /// Parse and normalize the source without a database
    Check,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = SyncConfig::from_env()
        .and_then(|config| config.with_overrides(cli.overrides.into()))
        .context("resolving configuration")?;
    tracing::debug!(
        year = config.year,
        source = %config.source_path.display(),
        "configuration resolved"
    );
    let pipeline = SyncPipeline::new(config);

    match cli.command.unwrap_or(Commands::Sync) {
        Commands::Sync => {
            let summary = pipeline.run_once().await.context("sync failed")?;
            println!(
                "sync complete: run_id={} processed={} exported={} output={} sha256={}",
                summary.run_id,
                summary.processed,
                summary.exported,
                summary.output_path,
                summary.export_sha256
            );
        }
        Commands::Migrate => {
            pipeline.migrate().await.context("migrate failed")?;
            println!("migrate complete");
        }
        Commands::Check => {
            let summary = pipeline.check().context("check failed")?;
            let range = match (summary.earliest, summary.latest) {
                (Some(earliest), Some(latest)) => format!(" range={earliest}..{latest}"),
                _ => String::new(),
            };
            println!(
                "check complete: subreddits={} entries={}{range}",
                summary.subreddits, summary.entries
            );
        }
    }

    Ok(())
}
