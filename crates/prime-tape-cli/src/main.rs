//! Prime Tape CLI
//!
//! Samples glyph tapes through an embedding model and prints the prime
//! activations and Gödel encodings.
//!
//! # Commands
//!
//! - `registry`: Print the ten intrinsic primes
//! - `tokenize`: Hash-tokenize a tape
//! - `sample`: Full pipeline for one model
//! - `variance`: Cross-model variance of the universal anchor
//! - `godel-raw`: Raw prime product of a tape
//!
//! Logs go to stderr; results go to stdout. Exit code 1 on sampling or
//! configuration failure, 2 on usage errors.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use prime_tape_core::{SamplerConfig, SamplerResult, TapeSampler};
use tracing::error;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod error;

use error::exit_code_for_error;

/// Prime Tape - glyph tape sampling over intrinsic primes
#[derive(Parser)]
#[command(name = "prime-tape")]
#[command(version)]
#[command(about = "Sample glyph tapes through embedding models and encode them as Gödel numbers")]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the intrinsic prime registry
    Registry(commands::registry::RegistryArgs),
    /// Hash-tokenize a tape
    Tokenize(commands::tokenize::TokenizeArgs),
    /// Sample a tape through one model
    Sample(commands::sample::SampleArgs),
    /// Compare the universal anchor across models
    ///
    /// Every model is sampled concurrently against the same tape; the
    /// output reports the mean, population variance and per-model drift
    /// of the prime-2 activation.
    Variance(commands::variance::VarianceArgs),
    /// Raw prime product of a tape (no activation weighting)
    GodelRaw(commands::godel_raw::GodelRawArgs),
}

fn load_config(path: Option<&PathBuf>) -> SamplerResult<SamplerConfig> {
    let config = match path {
        Some(path) => SamplerConfig::from_file(path)?,
        None => SamplerConfig::default(),
    };
    Ok(config.with_env_overrides())
}

fn init_logging(verbose: u8, default_level: &str) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(default_level))
            .unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_ref());
    let level = config
        .as_ref()
        .map(|c| c.logging.level.clone())
        .unwrap_or_else(|_| "warn".to_string());
    init_logging(cli.verbose, &level);

    let sampler = match config.and_then(TapeSampler::from_config) {
        Ok(s) => Arc::new(s),
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(exit_code_for_error(&e).into());
        }
    };

    let exit_code = match cli.command {
        Commands::Registry(args) => commands::registry::handle_registry(args),
        Commands::Tokenize(args) => commands::tokenize::handle_tokenize(&sampler, args).await,
        Commands::Sample(args) => commands::sample::handle_sample(&sampler, args).await,
        Commands::Variance(args) => commands::variance::handle_variance(sampler, args).await,
        Commands::GodelRaw(args) => commands::godel_raw::handle_godel_raw(&sampler, args),
    };

    std::process::exit(exit_code);
}
