mod args;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use alacify_core::{
    destination_for, load_config, locate_encoder, plan_chunks, scan_source, validate_config,
    CancellationToken, ConversionScheduler, FfmpegEncoder, RunReport, RunSettings,
};

use args::Args;

/// Exit code when some file failed or the run was cancelled.
const EXIT_INCOMPLETE: i32 = 2;

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(args.json_logs);

    match run(args).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(EXIT_INCOMPLETE),
        Err(e) => {
            error!("Fatal error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());

    // stdout is reserved for the dry-run plan
    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
        }))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();
}

/// Returns whether every file was converted or skipped.
async fn run(args: Args) -> Result<bool> {
    // Load configuration
    info!("Loading configuration from {:?}", args.config);
    let mut config = load_config(&args.config)
        .with_context(|| format!("Failed to load config from {:?}", args.config))?;
    args.apply_overrides(&mut config);

    validate_config(&config).context("Configuration validation failed")?;
    let settings = RunSettings::from_config(&config).context("Invalid run settings")?;

    info!("Source: {:?}", settings.source_root);
    info!("Destination: {:?}", settings.destination_root);
    info!(
        "Target format: {}, concurrency: {}",
        settings.format, settings.concurrency
    );

    // Resolve the encoder before touching anything
    let encoder = if args.dry_run {
        None
    } else {
        let binary =
            locate_encoder(&config.encoder.path).context("Cannot convert without ffmpeg")?;
        info!("Using encoder {:?}", binary);
        Some(FfmpegEncoder::from_config(binary, &config.encoder))
    };

    // Collect input files
    let files = scan_source(&settings.source_root, Some(&settings.destination_root))
        .context("Failed to scan source library")?;

    let Some(encoder) = encoder else {
        print_plan(&settings, &files);
        return Ok(true);
    };

    let cancel = CancellationToken::new();
    let signal_task = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            shutdown_signal().await;
            warn!("Shutdown signal received, stopping conversions");
            cancel.cancel();
        }
    });

    let scheduler = ConversionScheduler::new(encoder, settings);
    let report = scheduler.start(&files, cancel).await;
    signal_task.abort();

    if let Some(path) = &args.report {
        write_report(&report, path).await?;
    }

    if report.cancelled {
        warn!("Run cancelled");
    }

    Ok(report.is_success())
}

/// Prints every chunk with the destination of each of its files.
fn print_plan(settings: &RunSettings, files: &[PathBuf]) {
    for (index, chunk) in plan_chunks(files, settings.concurrency).enumerate() {
        println!("chunk {} ({} files)", index, chunk.len());
        for input in chunk {
            match destination_for(
                &settings.source_root,
                &settings.destination_root,
                input,
                &settings.format,
            ) {
                Ok(destination) => {
                    println!("  {} -> {}", input.display(), destination.display())
                }
                Err(e) => println!("  {} -> error: {}", input.display(), e),
            }
        }
    }
}

async fn write_report(report: &RunReport, path: &Path) -> Result<()> {
    let json = report
        .to_json_pretty()
        .context("Failed to serialize run report")?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write report to {:?}", path))?;
    info!("Report written to {:?}", path);
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
