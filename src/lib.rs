pub mod config;
pub mod dataset;
pub mod output;
pub mod search;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Result, bail};
use clap::{CommandFactory, Parser, Subcommand};
use tracing::info;

use config::SearchOptions;
use dataset::Dataset;

/// Descriptor width produced by the image summarizer (8x8 patches, 3 channels).
pub const DEFAULT_DIMENSION: usize = 192;

/// Command-line interface.
#[derive(Parser, Debug)]
#[command(
    name = "neardup",
    version,
    about = "Parallel brute-force similarity join over fixed-width image descriptors"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Find all descriptor pairs closer than the threshold
    Search {
        /// Descriptor table (count and dimension header, then rows)
        input: PathBuf,

        /// Write matches here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Maximum distance for a pair to qualify (exclusive)
        #[arg(long)]
        threshold: Option<f32>,

        /// Number of worker threads
        #[arg(long)]
        workers: Option<usize>,

        /// Expected descriptor width; the input header must agree
        #[arg(long, default_value_t = DEFAULT_DIMENSION)]
        dimension: usize,
    },
    /// Generate shell completions to stdout
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Search {
            input,
            output,
            threshold,
            workers,
            dimension,
        } => run_search(input, output, threshold, workers, dimension),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "neardup", &mut std::io::stdout());
            Ok(())
        }
    }
}

fn run_search(
    input: PathBuf,
    output: Option<PathBuf>,
    threshold: Option<f32>,
    workers: Option<usize>,
    dimension: usize,
) -> Result<()> {
    let mut options = SearchOptions::from_env();
    if let Some(threshold) = threshold {
        options.threshold = threshold;
    }
    if let Some(workers) = workers {
        options.workers = workers;
    }
    options.validate()?;

    let started = Instant::now();
    let dataset = Dataset::load(&input)?;
    if dataset.dimension() != dimension {
        bail!(
            "dataset dimension {} does not match the expected descriptor width {dimension}",
            dataset.dimension()
        );
    }
    info!(
        rows = dataset.len(),
        dimension = dataset.dimension(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "dataset loaded"
    );

    let matches = search::engine::search(&dataset, &options)?;

    match output {
        Some(path) => output::write_matches_to_path(&path, &matches)?,
        None => output::write_matches(std::io::stdout().lock(), &matches)?,
    }
    info!(matches = matches.len(), "matches written");
    Ok(())
}
