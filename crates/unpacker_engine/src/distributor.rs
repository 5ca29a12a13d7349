use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use engine_logging::{engine_error, engine_info, engine_warn};
use walkdir::WalkDir;

use crate::pipeline::ExtractionPipeline;
use crate::types::UnpackOutcome;

/// Upper bound on the worker pool size.
pub const MAX_WORKERS: usize = 10;

const ARCHIVE_SUFFIX: &str = ".crx";

#[derive(Debug, Clone)]
pub struct DistributorSettings {
    /// Worker pool size, clamped to `1..=MAX_WORKERS`.
    pub worker_count: usize,
    /// Output root for every job; defaults to each archive's parent
    /// directory when absent.
    pub destination: Option<PathBuf>,
}

impl Default for DistributorSettings {
    fn default() -> Self {
        Self {
            worker_count: 1,
            destination: None,
        }
    }
}

/// Final accounting for one batch run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UnpackReport {
    /// Archives found under the root.
    pub discovered: usize,
    /// Packages that passed manifest validation and were written out.
    pub extracted: usize,
    /// Packages set aside (unreadable archive, theme, bad version).
    pub skipped: usize,
    /// Packages that failed after validation (IO errors and the like).
    pub failed: usize,
}

/// Walks `root` for package archives and distributes them over a fixed
/// worker pool.
///
/// One producer thread feeds an unbounded channel and then drops its sender;
/// each worker drains a cloned receiver until the channel is empty and
/// disconnected. Closing the channel this way lets every worker observe
/// end-of-input from a single event, so all threads terminate regardless of
/// scheduling order. Per-job failures are logged and counted, never fatal to
/// the pool.
pub fn unpack_tree(
    pipeline: Arc<ExtractionPipeline>,
    root: &Path,
    settings: &DistributorSettings,
) -> UnpackReport {
    let (job_tx, job_rx) = crossbeam_channel::unbounded::<PathBuf>();

    let producer_root = root.to_path_buf();
    let producer = thread::Builder::new()
        .name("unpack-producer".to_string())
        .spawn(move || -> usize {
            let mut discovered = 0;
            for entry in WalkDir::new(&producer_root)
                .into_iter()
                .filter_map(Result::ok)
            {
                if !entry.file_type().is_file() {
                    continue;
                }
                if !entry.file_name().to_string_lossy().ends_with(ARCHIVE_SUFFIX) {
                    continue;
                }
                discovered += 1;
                if job_tx.send(entry.into_path()).is_err() {
                    break;
                }
            }
            // Dropping the sender here closes the channel for all workers.
            discovered
        })
        .expect("spawn producer thread");

    let extracted = Arc::new(AtomicUsize::new(0));
    let skipped = Arc::new(AtomicUsize::new(0));
    let failed = Arc::new(AtomicUsize::new(0));

    let worker_count = settings.worker_count.clamp(1, MAX_WORKERS);
    let mut workers = Vec::with_capacity(worker_count);
    for worker_id in 0..worker_count {
        let job_rx = job_rx.clone();
        let pipeline = pipeline.clone();
        let destination = settings.destination.clone();
        let extracted = extracted.clone();
        let skipped = skipped.clone();
        let failed = failed.clone();
        let worker = thread::Builder::new()
            .name(format!("unpack-worker-{worker_id}"))
            .spawn(move || {
                for archive_path in job_rx.iter() {
                    let dest_root = destination.clone().unwrap_or_else(|| {
                        archive_path
                            .parent()
                            .unwrap_or_else(|| Path::new("."))
                            .to_path_buf()
                    });
                    match pipeline.unpack(&archive_path, &dest_root) {
                        Ok(UnpackOutcome::Extracted(summary)) => {
                            extracted.fetch_add(1, Ordering::Relaxed);
                            engine_info!(
                                "finished {} ({} content, {} background, {} war scripts)",
                                summary.extension_id,
                                summary.content_scripts,
                                summary.background_scripts,
                                summary.war_scripts
                            );
                        }
                        Ok(UnpackOutcome::Skipped(_)) => {
                            // Reason already logged at the pipeline boundary.
                            skipped.fetch_add(1, Ordering::Relaxed);
                        }
                        Err(err) => {
                            failed.fetch_add(1, Ordering::Relaxed);
                            engine_error!("failed to unpack {}: {err}", archive_path.display());
                        }
                    }
                }
            })
            .expect("spawn worker thread");
        workers.push(worker);
    }
    drop(job_rx);

    let discovered = producer.join().unwrap_or_else(|_| {
        engine_warn!("producer thread panicked, discovery count is unknown");
        0
    });
    for worker in workers {
        let _ = worker.join();
    }

    UnpackReport {
        discovered,
        extracted: extracted.load(Ordering::Relaxed),
        skipped: skipped.load(Ordering::Relaxed),
        failed: failed.load(Ordering::Relaxed),
    }
}
