//! Command line arguments.

use clap::Parser;
use std::path::PathBuf;

use alacify_core::Config;

/// Mirror an audio library as Apple Lossless files.
#[derive(Debug, Parser)]
#[command(name = "alacify", version, about)]
pub struct Args {
    /// Configuration file.
    #[arg(short, long, env = "ALACIFY_CONFIG", default_value = "config.toml")]
    pub config: PathBuf,

    /// Override `conversion.source_path`.
    #[arg(long)]
    pub source: Option<PathBuf>,

    /// Override `conversion.destination_path`.
    #[arg(long)]
    pub destination: Option<PathBuf>,

    /// Override `conversion.format`.
    #[arg(long)]
    pub format: Option<String>,

    /// Override `conversion.thread_count`.
    #[arg(long, allow_negative_numbers = true)]
    pub threads: Option<i64>,

    /// Override `encoder.path`.
    #[arg(long)]
    pub encoder: Option<PathBuf>,

    /// Write the run report as JSON to this path.
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Print the chunk plan and destinations without converting anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Emit logs as JSON lines.
    #[arg(long)]
    pub json_logs: bool,
}

impl Args {
    /// Applies command line overrides on top of the loaded configuration.
    pub fn apply_overrides(&self, config: &mut Config) {
        let conversion = &mut config.conversion;
        if let Some(source) = &self.source {
            conversion.source_path = source.clone();
        }
        if let Some(destination) = &self.destination {
            conversion.destination_path = destination.clone();
        }
        if let Some(format) = &self.format {
            conversion.format = format.clone();
        }
        if let Some(threads) = self.threads {
            conversion.thread_count = threads;
        }
        if let Some(encoder) = &self.encoder {
            config.encoder.path = encoder.clone();
        }
    }
}
