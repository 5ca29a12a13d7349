use std::path::PathBuf;

use thiserror::Error;
use unpacker_core::ManifestError;

use crate::persist::PersistError;

/// Why a package was set aside without producing any output.
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error("unreadable archive: {0}")]
    UnreadableArchive(String),
    #[error("unsupported manifest: {0}")]
    UnsupportedManifest(#[from] ManifestError),
}

/// Per-package result of one pipeline pass.
#[derive(Debug)]
pub enum UnpackOutcome {
    Extracted(ExtractionSummary),
    Skipped(SkipReason),
}

/// What one successful extraction produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionSummary {
    pub extension_id: String,
    pub destination: PathBuf,
    /// Retained scripts per output artifact, inline fragments included.
    pub content_scripts: usize,
    pub background_scripts: usize,
    pub war_scripts: usize,
}

/// A failure after manifest validation succeeded. Contained to the
/// offending package; the worker pool keeps running.
#[derive(Debug, Error)]
pub enum UnpackError {
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
}
