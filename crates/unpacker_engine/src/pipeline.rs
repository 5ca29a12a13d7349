use std::path::{Path, PathBuf};
use std::sync::Arc;

use engine_logging::{engine_info, engine_warn};
use unpacker_core::{Manifest, ScriptFilter};

use crate::archive::PackageArchive;
use crate::beautify::{Formatter, ScriptBeautifier};
use crate::harvest::ScriptHarvester;
use crate::persist::AtomicFileWriter;
use crate::types::{ExtractionSummary, SkipReason, UnpackError, UnpackOutcome};

const MANIFEST_ENTRY: &str = "manifest.json";
const ARCHIVE_EXTENSION: &str = ".crx";

/// Extracts one package into the canonical four-artifact layout consumed by
/// the downstream analysis engine:
///
/// ```text
/// <dest>/<extensionId>/manifest.json
/// <dest>/<extensionId>/contentscript.js
/// <dest>/<extensionId>/background.js
/// <dest>/<extensionId>/wars.js
/// ```
///
/// Shared read-only across workers; each invocation owns its archive and
/// manifest instances.
pub struct ExtractionPipeline {
    beautifier: ScriptBeautifier,
    filter: ScriptFilter,
}

impl ExtractionPipeline {
    pub fn new(formatter: Arc<dyn Formatter>) -> Self {
        Self {
            beautifier: ScriptBeautifier::new(formatter),
            filter: ScriptFilter::default(),
        }
    }

    pub fn with_filter(mut self, filter: ScriptFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Overrides the staging directory used for beautification.
    pub fn with_temp_dir(mut self, temp_dir: impl Into<PathBuf>) -> Self {
        self.beautifier = self.beautifier.with_temp_dir(temp_dir);
        self
    }

    /// Unpacks one archive into `dest_root/<extensionId>/`.
    ///
    /// Packages that fail to open or to classify are reported as
    /// `Skipped` without creating any directory or file. Once the manifest
    /// validates, all four artifacts are written (atomically, each).
    pub fn unpack(
        &self,
        archive_path: &Path,
        dest_root: &Path,
    ) -> Result<UnpackOutcome, UnpackError> {
        let extension_id = extension_id(archive_path);

        let mut archive = match PackageArchive::open(archive_path) {
            Ok(archive) => archive,
            Err(reason) => {
                engine_warn!("skipping {}: {reason}", archive_path.display());
                return Ok(UnpackOutcome::Skipped(reason));
            }
        };

        let manifest_bytes = archive.read_entry(MANIFEST_ENTRY);
        let manifest = match Manifest::parse(&manifest_bytes) {
            Ok(manifest) => manifest,
            Err(err) => {
                engine_warn!("skipping {}: {err}", archive_path.display());
                return Ok(UnpackOutcome::Skipped(SkipReason::UnsupportedManifest(err)));
            }
        };

        let destination = dest_root.join(&extension_id);
        let writer = AtomicFileWriter::new(destination.clone());
        writer.write("manifest.json", &manifest.to_pretty_json())?;

        let harvester = ScriptHarvester::new(&self.beautifier, &self.filter);

        let content = harvester.content_scripts(&manifest, &mut archive);
        writer.write("contentscript.js", &content.body)?;

        let background = harvester.background(&manifest, &mut archive);
        writer.write("background.js", &background.body)?;

        let wars = harvester.wars(&manifest, &mut archive);
        writer.write_bytes("wars.js", wars.body.as_bytes())?;

        engine_info!(
            "extracted the components of {} into {}",
            archive_path.display(),
            destination.display()
        );
        Ok(UnpackOutcome::Extracted(ExtractionSummary {
            extension_id,
            destination,
            content_scripts: content.scripts,
            background_scripts: background.scripts,
            war_scripts: wars.scripts,
        }))
    }
}

/// The archive's base name with the packaging extension removed.
fn extension_id(archive_path: &Path) -> String {
    let name = archive_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.strip_suffix(ARCHIVE_EXTENSION) {
        Some(stem) => stem.to_string(),
        None => name,
    }
}
