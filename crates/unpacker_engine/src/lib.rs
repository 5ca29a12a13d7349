//! Unpacker engine: archive access, component harvesting, and batch
//! distribution.
mod archive;
mod beautify;
mod distributor;
mod harvest;
mod html;
mod persist;
mod pipeline;
mod types;

pub use archive::PackageArchive;
pub use beautify::{Formatter, FormatterError, JsBeautify, ScriptBeautifier};
pub use distributor::{unpack_tree, DistributorSettings, UnpackReport, MAX_WORKERS};
pub use harvest::{HarvestOutput, ScriptHarvester};
pub use html::{extract_page_scripts, PageScripts};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use pipeline::ExtractionPipeline;
pub use types::{ExtractionSummary, SkipReason, UnpackError, UnpackOutcome};
