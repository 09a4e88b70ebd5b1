//! Batch indexer for received GOES products.
//!
//! Meant to run from cron next to the receiver:
//! - `update` indexes new sidecars into the catalog
//! - `clean` evicts past-quota records and prunes emptied directories
//! - `timelapse` prints an ffconcat playlist for a product series

mod config;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use catalog::{ArtifactRole, Catalog, RecordFilter};
use ingestion::{Pipeline, PipelineConfig};

use config::IndexerConfig;

#[derive(Parser, Debug)]
#[command(name = "indexer")]
#[command(about = "Batch indexer for received GOES products")]
struct Args {
    /// Configuration file
    #[arg(short, long, env = "GOESDEX_CONFIG", default_value = "indexer.yaml")]
    config: PathBuf,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Index new sidecars under the product root
    Update,
    /// Evict past-quota records and prune empty directories
    Clean {
        /// Report what would be removed without touching anything
        #[arg(long, short = 'n')]
        dry_run: bool,
    },
    /// Print an ffconcat playlist of an image series, oldest first
    Timelapse {
        #[arg(long)]
        source: String,
        #[arg(long)]
        region: String,
        #[arg(long)]
        channel: String,
        /// Use thumbnails instead of full-size frames
        #[arg(long)]
        thumbnails: bool,
    },
}

/// Seconds of playlist time per second of capture time.
const TIMELAPSE_RATE: f64 = 1.0 / (8.0 * 60.0 * 60.0);

/// Seconds to hold the last frame.
const TIMELAPSE_POSTROLL: f64 = 5.0;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = IndexerConfig::load(&args.config)?;
    let catalog = Catalog::connect(&config.database).await?;
    catalog.migrate().await?;

    let pipeline = Pipeline::new(
        catalog.clone(),
        PipelineConfig {
            root: config.files.clone(),
            quota_bytes: config.quota,
            thumbnail_max_dim: config.thumbnail,
        },
    );

    match args.command {
        Command::Update => {
            let summary = pipeline.update().await?;
            info!(
                updated = summary.updated,
                skipped = summary.skipped,
                failed = summary.failed,
                "update finished"
            );
        }
        Command::Clean { dry_run } => {
            let summary = pipeline.clean(dry_run).await?;
            info!(
                deleted_records = summary.deleted_records,
                deleted_bytes = summary.deleted_bytes,
                pruned_dirs = summary.pruned_dirs,
                dry_run,
                "clean finished"
            );
        }
        Command::Timelapse {
            source,
            region,
            channel,
            thumbnails,
        } => {
            print_timelapse(&catalog, source, region, channel, thumbnails).await?;
        }
    }

    Ok(())
}

/// Print an ffconcat playlist for a product series, with frame
/// durations proportional to the capture intervals. Feed the output to
/// `ffmpeg -f concat`.
async fn print_timelapse(
    catalog: &Catalog,
    source: String,
    region: String,
    channel: String,
    thumbnails: bool,
) -> Result<()> {
    let filter = RecordFilter {
        kind: Some("image".to_string()),
        source: Some(source),
        region: Some(region),
        channel: Some(channel),
        ..Default::default()
    };
    let records = catalog
        .records_by_capture(&filter, true, u32::MAX, 0)
        .await?;

    let wanted = if thumbnails {
        ArtifactRole::Thumbnail
    } else {
        ArtifactRole::Main
    };

    println!("ffconcat version 1.0");
    let mut last_captured: Option<chrono::DateTime<chrono::Utc>> = None;
    for record in records {
        let artifacts = catalog.record_artifacts(record.id).await?;
        let frame = match artifacts.iter().find(|a| a.role == wanted) {
            Some(artifact) => artifact,
            None => continue,
        };
        if let Some(last) = last_captured {
            let gap = (record.captured_at - last).num_seconds() as f64;
            println!("duration {}", gap * TIMELAPSE_RATE);
        }
        println!("file {}", frame.path);
        last_captured = Some(record.captured_at);
    }
    println!("duration {TIMELAPSE_POSTROLL}");

    Ok(())
}
