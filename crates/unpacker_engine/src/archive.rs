use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use engine_logging::engine_warn;
use zip::ZipArchive;

use crate::types::SkipReason;

/// An opened extension package (zip container) plus its entry-name index.
///
/// Owned by a single pipeline invocation; dropped after one extraction pass.
pub struct PackageArchive {
    path: PathBuf,
    archive: ZipArchive<File>,
    names: Vec<String>,
    lowercase: Option<HashMap<String, String>>,
}

impl PackageArchive {
    /// Opens a packed extension. Anything that is not a readable zip
    /// container is reported as a skip, not a hard failure.
    pub fn open(path: &Path) -> Result<Self, SkipReason> {
        let file =
            File::open(path).map_err(|err| SkipReason::UnreadableArchive(err.to_string()))?;
        let mut archive =
            ZipArchive::new(file).map_err(|err| SkipReason::UnreadableArchive(err.to_string()))?;
        let mut names = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            match archive.by_index_raw(index) {
                Ok(entry) => names.push(entry.name().to_string()),
                Err(err) => return Err(SkipReason::UnreadableArchive(err.to_string())),
            }
        }
        Ok(Self {
            path: path.to_path_buf(),
            archive,
            names,
            lowercase: None,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Entry names in archive order.
    pub fn entry_names(&self) -> &[String] {
        &self.names
    }

    /// Reads an entry's bytes.
    ///
    /// The requested name is normalized (leading `./`, trailing `?query`),
    /// looked up exactly, then case-insensitively via a lazily-built index.
    /// Missing or unreadable entries yield empty bytes so extraction can
    /// continue with that component treated as absent.
    pub fn read_entry(&mut self, name: &str) -> Vec<u8> {
        let wanted = normalize_entry_name(name);
        if let Some(bytes) = self.read_exact(&wanted) {
            return bytes;
        }
        if self.lowercase.is_none() {
            self.lowercase = Some(
                self.names
                    .iter()
                    .map(|name| (name.to_lowercase(), name.clone()))
                    .collect(),
            );
        }
        let actual = self
            .lowercase
            .as_ref()
            .and_then(|index| index.get(&wanted.to_lowercase()))
            .cloned();
        if let Some(actual) = actual {
            if let Some(bytes) = self.read_exact(&actual) {
                return bytes;
            }
        }
        engine_warn!(
            "entry {wanted:?} missing from {}, treating as empty",
            self.path.display()
        );
        Vec::new()
    }

    fn read_exact(&mut self, name: &str) -> Option<Vec<u8>> {
        let mut entry = self.archive.by_name(name).ok()?;
        let mut bytes = Vec::with_capacity(entry.size() as usize);
        match entry.read_to_end(&mut bytes) {
            Ok(_) => Some(bytes),
            Err(err) => {
                engine_warn!("failed to read entry {name:?}: {err}");
                None
            }
        }
    }
}

fn normalize_entry_name(name: &str) -> String {
    let mut name = name;
    while let Some(rest) = name.strip_prefix("./") {
        name = rest;
    }
    let name = name.strip_prefix('/').unwrap_or(name);
    match name.split_once('?') {
        Some((head, _)) => head.to_string(),
        None => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::normalize_entry_name;

    #[test]
    fn strips_leading_dot_slash_and_query() {
        assert_eq!(normalize_entry_name("./js/app.js?v=2"), "js/app.js");
        assert_eq!(normalize_entry_name("././js/app.js"), "js/app.js");
        assert_eq!(normalize_entry_name("/js/app.js"), "js/app.js");
        assert_eq!(normalize_entry_name("js/app.js"), "js/app.js");
    }
}
