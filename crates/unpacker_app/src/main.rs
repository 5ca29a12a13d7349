//! unpack - batch extension unpacking CLI.
//!
//! Unpacks browser extensions (manifest v2 or v3) and extracts their
//! manifest, content scripts, background scripts/page, and
//! web-accessible-resource scripts into a per-extension directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::bail;
use clap::Parser;
use unpacker_engine::{
    unpack_tree, DistributorSettings, ExtractionPipeline, JsBeautify, UnpackOutcome, MAX_WORKERS,
};

mod logging;

#[derive(Debug, Parser)]
#[command(
    name = "unpack",
    about = "Unpacks browser extensions (manifest v2 or v3) and extracts their \
             manifest, content scripts, background scripts/page, and WARs"
)]
struct Cli {
    /// Packed extension to unpack, or a directory scanned recursively for
    /// archives.
    #[arg(short, long, value_name = "PATH")]
    source: PathBuf,

    /// Root directory for the extracted components (a folder per extension
    /// is created inside it). Defaults to each archive's own directory.
    #[arg(short, long, value_name = "PATH")]
    destination: Option<PathBuf>,

    /// Number of worker threads used when the source is a directory.
    #[arg(short = 'p', long, default_value_t = 1, value_name = "N")]
    process_count: usize,

    /// Log wall-clock timing for the run.
    #[arg(short, long)]
    benchmark: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::initialize(logging::LogDestination::Both);

    if !cli.source.exists() {
        bail!("source {} does not exist", cli.source.display());
    }
    if cli.process_count > MAX_WORKERS {
        log::warn!("process count {} exceeds the maximum, using {MAX_WORKERS}", cli.process_count);
    }

    let pipeline = Arc::new(ExtractionPipeline::new(Arc::new(JsBeautify::default())));
    let started = Instant::now();

    if cli.source.is_dir() {
        log::info!("unpacking extensions under {}", cli.source.display());
        let settings = DistributorSettings {
            worker_count: cli.process_count,
            destination: cli.destination.clone(),
        };
        let report = unpack_tree(pipeline, &cli.source, &settings);
        log::info!(
            "processed {} archives: {} extracted, {} skipped, {} failed",
            report.discovered,
            report.extracted,
            report.skipped,
            report.failed
        );
    } else {
        log::info!("unpacking extension {}", cli.source.display());
        let dest_root = cli
            .destination
            .clone()
            .or_else(|| cli.source.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."));
        match pipeline.unpack(&cli.source, &dest_root)? {
            UnpackOutcome::Extracted(summary) => log::info!(
                "extracted {} into {}",
                summary.extension_id,
                summary.destination.display()
            ),
            UnpackOutcome::Skipped(reason) => {
                log::warn!("skipped {}: {reason}", cli.source.display());
            }
        }
    }

    if cli.benchmark {
        log::info!("execution time: {:?}", started.elapsed());
    }
    Ok(())
}
