//! cnsampler - Command Line Operations for the Complex Normal Sampler
//!
//! # Commands
//!
//! - `cnsampler sweep` - Propagate visibility errors over a decreasing SNR grid
//! - `cnsampler moments` - Summarise the moments of the cached distributions
//! - `cnsampler sum` - Compare naive and compensated summation
//! - `cnsampler check` - Build the cache and re-verify every entry
//!
//! # Architecture
//!
//! As the **S**ervice layer, this crate owns logging and configuration
//! loading and only orchestrates `sampler_core`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;

pub use error::{CliError, Result};

/// Complex normal sampler CLI
#[derive(Parser)]
#[command(name = "cnsampler")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output (debug diagnostics)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path (TOML)
    #[arg(short, long, global = true, default_value = "cnsampler.toml")]
    config: PathBuf,

    /// Number of distributions to prepare
    #[arg(long, global = true, env = "CNSAMPLER_CAPACITY")]
    capacity: Option<usize>,

    /// Base seed for reproducible caches
    #[arg(long, global = true, env = "CNSAMPLER_SEED")]
    seed: Option<u64>,

    /// Rejection-sampling cap per distribution
    #[arg(long, global = true)]
    max_iterations: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for tabular results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Table,
    /// One JSON document
    Json,
}

/// Observables swept by the `sweep` command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ObservableArg {
    /// Visibility amplitude |V|
    Visamp,
    /// Squared visibility |V|²
    Vis2,
    /// Both observables
    Both,
}

#[derive(Subcommand)]
enum Commands {
    /// Propagate visibility errors over a decreasing SNR grid
    Sweep {
        /// Reference visibility amplitude
        #[arg(short, long, default_value = "0.00137")]
        amplitude: f64,

        /// Observable to sample
        #[arg(short = 'b', long, value_enum, default_value = "vis2")]
        observable: ObservableArg,

        /// Use freshly drawn, unvalidated samples instead of the cache
        #[arg(long)]
        fresh: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Summarise the moments of the cached distributions
    Moments {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Compare naive and compensated summation
    Sum {
        /// Number of values (the first one is 1.0)
        #[arg(short, long, default_value_t = 10 * 1024 * 1024)]
        len: usize,

        /// Addends filling the rest of the array
        #[arg(short, long, value_delimiter = ',', default_value = "1e-8,1,1e8")]
        addends: Vec<f64>,
    },

    /// Build the cache and re-verify every entry
    Check,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let overrides = config::Overrides {
        capacity: cli.capacity,
        seed: cli.seed,
        max_iterations: cli.max_iterations,
    };

    match cli.command {
        Commands::Sweep {
            amplitude,
            observable,
            fresh,
            format,
        } => {
            let config = config::load(&cli.config, &overrides)?;
            commands::sweep::run(config, amplitude, observable, fresh, format)
        }
        Commands::Moments { format } => {
            let config = config::load(&cli.config, &overrides)?;
            commands::moments::run(config, format)
        }
        Commands::Sum { len, addends } => commands::sum::run(len, &addends),
        Commands::Check => {
            let config = config::load(&cli.config, &overrides)?;
            commands::check::run(config)
        }
    }
}
