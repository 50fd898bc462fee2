use clap::{Parser, Subcommand};
use std::path::PathBuf;
use anyhow::{Result, Context};

mod config;
mod commands;
mod deterministic;
mod error;

use commands::align::ReadSource;
use config::Config;
use error::{print_error_and_exit, CliError};

#[derive(Parser)]
#[command(name = "svmap")]
#[command(about = "SVMap - optical-map read aligner with structural variation calling")]
#[command(version)]
#[command(long_about = "
SVMap places optical-map reads (ordered distances between restriction sites)
on a reference contig and reports the structural variations along the path:
missing sites, extra sites, inversions and long deletes.

Examples:
  svmap align --cmap hg19_BspQI.cmap --contig 10 --read 1200,3400,800,2100
  svmap align --cmap hg19_BspQI.cmap --contig 10 --reads reads.txt --out hits.jsonl
  svmap simulate --cmap hg19_BspQI.cmap --contig 10 --reads 1000 --seed 7
  svmap config --example > svmap.toml
")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable deterministic mode for reproducible results
    #[arg(long, global = true)]
    pub deterministic: bool,

    /// Number of threads to use
    #[arg(short, long, global = true)]
    pub threads: Option<usize>,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Align reads against a reference contig and print one JSON record per read
    Align {
        /// Reference map (.cmap or .cmap.gz)
        #[arg(long)]
        cmap: Option<PathBuf>,

        /// CMapId of the reference contig
        #[arg(long)]
        contig: Option<u32>,

        /// A single read as comma-separated distances
        #[arg(long, conflicts_with = "reads", required_unless_present = "reads")]
        read: Option<String>,

        /// File with one read per line
        #[arg(long)]
        reads: Option<PathBuf>,

        /// Output file (JSON lines, stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Generate reads with known SVs, align them and report accuracy
    Simulate {
        /// Reference map (.cmap or .cmap.gz)
        #[arg(long)]
        cmap: Option<PathBuf>,

        /// CMapId of the reference contig
        #[arg(long)]
        contig: Option<u32>,

        /// Number of reads to generate
        #[arg(long)]
        reads: Option<usize>,

        /// Read generator seed
        #[arg(long)]
        seed: Option<u64>,

        /// Write every read with its truth and guesses as JSON
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Show configuration
    Config {
        /// Print the default configuration as TOML
        #[arg(long)]
        example: bool,
    },
}

fn setup_logging(verbose: u8, quiet: bool) -> Result<()> {
    if quiet {
        std::env::set_var("RUST_LOG", "error");
    } else {
        let level = match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        };
        std::env::set_var("RUST_LOG", level);
    }

    env_logger::Builder::from_default_env()
        .format_timestamp_secs()
        .init();

    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    // Load configuration
    let config = Config::load(cli.config.as_deref())?;
    let deterministic = cli.deterministic || config.general.deterministic;

    let threads = deterministic::resolve_threads(cli.threads, config.general.threads, deterministic);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .context("Failed to set thread count")?;
    log::debug!("Using {} threads", threads);

    match cli.command {
        Commands::Align { cmap, contig, read, reads, out } => {
            let source = ReadSource::from_args(read, reads)?;
            commands::align::execute(&config, cmap, contig, source, out)?;
        }

        Commands::Simulate { cmap, contig, reads, seed, out } => {
            commands::simulate::execute(&config, deterministic, cmap, contig, reads, seed, out)?;
        }

        Commands::Config { example } => {
            let content = if example {
                Config::example_toml()?
            } else {
                toml::to_string_pretty(&config).map_err(CliError::from)?
            };
            print!("{}", content);
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    setup_logging(cli.verbose, cli.quiet)?;

    if let Err(err) = run(cli) {
        if let Some(cli_err) = err.downcast_ref::<CliError>() {
            print_error_and_exit(cli_err);
        }
        return Err(err);
    }

    Ok(())
}
