//! Unpacker core: manifest model, script bundles, and resource matching.
mod bundle;
mod filter;
mod manifest;
mod resources;

pub use bundle::ScriptBundle;
pub use filter::ScriptFilter;
pub use manifest::{Manifest, ManifestError, ManifestVersion};
pub use resources::ResourceMatcher;
