//! selectkit CLI - inspect manifests and replay interaction scripts.

#![allow(
    clippy::needless_pass_by_value,
    clippy::uninlined_format_args,
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::doc_markdown,
    clippy::needless_raw_string_hashes
)]

mod commands;
mod value;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commands::Manifest;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "selectkit")]
#[command(about = "Inspect selection-control manifests and replay interaction scripts")]
#[command(version)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the filtered, grouped option list for a query
    Filter {
        /// Path to manifest file
        manifest: PathBuf,

        /// Search text
        #[arg(default_value = "")]
        query: String,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Replay an interaction script, printing one render model per step
    Replay {
        /// Path to manifest file
        manifest: PathBuf,

        /// Path to script file
        script: PathBuf,

        /// Pretty-print each render model
        #[arg(long)]
        pretty: bool,
    },

    /// Check manifest validity
    Check {
        /// Path to manifest file
        #[arg(default_value = "select.yaml")]
        manifest: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load(path: &Path) -> Result<Manifest> {
    let manifest =
        Manifest::load(path).with_context(|| format!("failed to load {}", path.display()))?;
    info!(path = %path.display(), options = manifest.options.len(), "loaded manifest");
    Ok(manifest)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let output = match cli.command {
        Commands::Filter {
            manifest,
            query,
            json,
        } => commands::filter_view(&load(&manifest)?, &query, json)?,
        Commands::Replay {
            manifest,
            script,
            pretty,
        } => {
            let text = std::fs::read_to_string(&script)
                .with_context(|| format!("failed to read {}", script.display()))?;
            commands::replay(load(&manifest)?, &text, pretty)?
        }
        Commands::Check { manifest } => commands::check(load(&manifest)?)?,
    };
    print!("{output}");
    Ok(())
}
