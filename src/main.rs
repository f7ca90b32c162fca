//! Salon-Harvest main entry point
//!
//! This is the command-line interface for the Salon-Harvest crawler.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use salon_harvest::config::{load_config_or_default, Config};
use salon_harvest::output::{
    default_export_filename, print_statistics, to_csv, write_rows, HarvestEvent, JobStatistics,
};
use salon_harvest::state::JobTracker;
use salon_harvest::{CollectTarget, Coordinator, JobCheckpoint};
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// Salon-Harvest: a resumable salon directory crawler
///
/// Salon-Harvest searches the salon directory for a keyword, visits each
/// listing's detail and contact pages, and exports the merged records as CSV.
#[derive(Parser, Debug)]
#[command(name = "salon-harvest")]
#[command(version)]
#[command(about = "A resumable salon directory crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(short, long, global = true, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarize the first results page for a keyword
    Search {
        keyword: String,
    },

    /// Collect listings and write a checkpoint for chunked processing
    Collect {
        keyword: String,

        /// Maximum number of result pages to visit
        #[arg(short, long, conflicts_with = "count")]
        pages: Option<u32>,

        /// Number of salons to collect, from as many pages as needed
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Where to write the checkpoint
        #[arg(long, default_value = "harvest-checkpoint.json")]
        checkpoint: PathBuf,
    },

    /// Process the next chunk of a checkpoint and append it to a CSV file
    Chunk {
        /// Checkpoint written by `collect` or a previous `chunk`
        #[arg(long, default_value = "harvest-checkpoint.json")]
        checkpoint: PathBuf,

        /// CSV file the chunk is appended to
        #[arg(short, long)]
        out: PathBuf,
    },

    /// Run a whole job and export the result
    Run {
        keyword: String,

        /// Maximum number of result pages to visit
        #[arg(short, long, conflicts_with = "count")]
        pages: Option<u32>,

        /// Number of salons to collect, from as many pages as needed
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Output CSV path (defaults to a timestamped name)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Execution mode
        #[arg(long, value_enum, default_value_t = Mode::Continuous)]
        mode: Mode,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    /// Round-robin worker pool
    Continuous,
    /// One listing at a time with progress events on stdout
    Streaming,
    /// Bounded chunks driven in-process
    Chunked,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config =
        load_config_or_default(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(path) = &cli.config {
        tracing::info!("Configuration loaded from: {}", path.display());
    }

    match cli.command {
        Command::Search { keyword } => handle_search(config, &keyword).await,
        Command::Collect {
            keyword,
            pages,
            count,
            checkpoint,
        } => {
            let target = collect_target(&config, pages, count);
            handle_collect(config, &keyword, target, &checkpoint).await
        }
        Command::Chunk { checkpoint, out } => handle_chunk(config, &checkpoint, &out).await,
        Command::Run {
            keyword,
            pages,
            count,
            out,
            mode,
        } => {
            let target = collect_target(&config, pages, count);
            handle_run(config, &keyword, target, out, mode).await
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so streamed events and summaries on stdout stay clean.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("salon_harvest=info,warn"),
            1 => EnvFilter::new("salon_harvest=debug,info"),
            2 => EnvFilter::new("salon_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// A salon count wins; otherwise the page limit, defaulting from config
fn collect_target(config: &Config, pages: Option<u32>, count: Option<usize>) -> CollectTarget {
    match count {
        Some(count) => CollectTarget::Listings(count),
        None => CollectTarget::Pages(pages.unwrap_or(config.crawler.default_page_limit)),
    }
}

/// Handles `search`: prints what a job for the keyword would cover
async fn handle_search(config: Config, keyword: &str) -> anyhow::Result<()> {
    let coordinator = Coordinator::new(config)?;
    let summary = coordinator.search(keyword).await?;

    println!("=== Search: {} ===\n", summary.keyword);
    println!("  Total salons: {}", summary.total_count);
    println!("  Total pages: {}", summary.total_pages);
    println!("  Listings per page: {}", summary.per_page_count);

    if !summary.preview.is_empty() {
        println!("\nPreview:");
        for listing in &summary.preview {
            println!("  - {} ({})", listing.name, listing.url);
        }
    }

    Ok(())
}

/// Handles `collect`: phase one of a chunked job
async fn handle_collect(
    config: Config,
    keyword: &str,
    target: CollectTarget,
    checkpoint_path: &Path,
) -> anyhow::Result<()> {
    let coordinator = Coordinator::new(config)?;

    let listings = coordinator.collect_target(keyword, target).await?;
    let checkpoint = JobCheckpoint::new(keyword.trim(), listings);
    checkpoint
        .save(checkpoint_path)
        .with_context(|| format!("Failed to write checkpoint {}", checkpoint_path.display()))?;

    let chunks = checkpoint
        .items
        .len()
        .div_ceil(coordinator.config().crawler.chunk_size);
    println!(
        "✓ Collected {} listings into {} ({} chunks)",
        checkpoint.items.len(),
        checkpoint_path.display(),
        chunks
    );

    Ok(())
}

/// Handles `chunk`: phase two of a chunked job, one invocation per chunk
///
/// The checkpoint is rewritten with the advanced cursor, or removed once the
/// job completes.
async fn handle_chunk(config: Config, checkpoint_path: &Path, out: &Path) -> anyhow::Result<()> {
    let checkpoint = JobCheckpoint::load(checkpoint_path)
        .with_context(|| format!("Failed to read checkpoint {}", checkpoint_path.display()))?;
    let coordinator = Coordinator::new(config)?;

    let outcome = coordinator.process_checkpoint(&checkpoint).await?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(out)
        .with_context(|| format!("Failed to open {}", out.display()))?;
    let mut writer = BufWriter::new(file);
    write_rows(&mut writer, &outcome.results, checkpoint.cursor == 0)?;
    writer.flush()?;

    let processed = checkpoint.cursor + outcome.results.len();
    let total = checkpoint.items.len();

    match checkpoint.advance(outcome.next_cursor) {
        Some(next) => {
            next.save(checkpoint_path)?;
            println!(
                "Processed {}/{} listings; run `chunk` again to continue",
                processed, total
            );
        }
        None => {
            std::fs::remove_file(checkpoint_path)?;
            println!("✓ All {} listings processed into {}", total, out.display());
        }
    }

    Ok(())
}

/// Handles `run`: a whole job in one process
async fn handle_run(
    config: Config,
    keyword: &str,
    target: CollectTarget,
    out: Option<PathBuf>,
    mode: Mode,
) -> anyhow::Result<()> {
    let coordinator = Coordinator::new(config)?;
    tracing::info!("Starting {:?} run for '{}' ({:?})", mode, keyword.trim(), target);
    let started = Instant::now();

    let (csv, stats) = match mode {
        Mode::Continuous => {
            let listings = coordinator.collect_target(keyword, target).await?;
            let records = coordinator.run_continuous(listings).await;
            (to_csv(&records), JobStatistics::from_records(&records))
        }
        Mode::Chunked => {
            let mut tracker = JobTracker::new();
            let records = coordinator
                .run_chunked(keyword, target, &mut tracker, |checkpoint, outcome| {
                    tracing::info!(
                        "Chunk at cursor {}: {} records",
                        checkpoint.cursor,
                        outcome.results.len()
                    );
                })
                .await?;
            (to_csv(&records), JobStatistics::from_records(&records))
        }
        Mode::Streaming => {
            let (count, csv) = stream_to_stdout(&coordinator, keyword, target).await?;
            let stats = JobStatistics {
                total: count,
                ..JobStatistics::default()
            };
            (csv, stats)
        }
    };
    let stats = stats.with_elapsed(started.elapsed());

    let out = out.unwrap_or_else(|| {
        PathBuf::from(default_export_filename(keyword, &chrono::Local::now()))
    });
    std::fs::write(&out, csv).with_context(|| format!("Failed to write {}", out.display()))?;

    if mode == Mode::Streaming {
        println!("Fetched {} records in {:.1}s", stats.total, stats.elapsed.as_secs_f64());
    } else {
        print_statistics(&stats);
    }
    println!("\n✓ Exported {} records to {}", stats.total, out.display());

    Ok(())
}

/// Prints each progress event as a JSON line until the stream ends
///
/// Returns the record count and CSV export carried by the `complete` event.
async fn stream_to_stdout(
    coordinator: &Coordinator,
    keyword: &str,
    target: CollectTarget,
) -> anyhow::Result<(usize, String)> {
    let mut events = coordinator.run_streaming(keyword, target);

    while let Some(event) = events.recv().await {
        match event {
            HarvestEvent::Complete {
                count,
                csv,
                elapsed_ms,
            } => {
                tracing::info!("Streaming job took {:?}", Duration::from_millis(elapsed_ms));
                return Ok((count, csv));
            }
            HarvestEvent::Error { message } => bail!("Streaming job failed: {}", message),
            progress => println!("{}", progress.to_json_line()?),
        }
    }

    bail!("Streaming job ended without a result")
}
