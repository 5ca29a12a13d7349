use serde_json::Value;
use thiserror::Error;

/// Manifest schema generations this pipeline knows how to harvest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestVersion {
    V2,
    V3,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManifestError {
    #[error("manifest is not valid JSON: {0}")]
    Syntax(String),
    #[error("manifest is not a JSON object")]
    NotAnObject,
    #[error("theme packages carry no analyzable scripts")]
    Theme,
    #[error("only manifest versions 2 and 3 are supported")]
    UnsupportedVersion(Option<i64>),
}

/// A parsed extension manifest.
///
/// Keeps the raw JSON document alongside the classified schema version.
/// Accessors read the document defensively: sections with unexpected types
/// are treated as absent, never as errors. A malformed optional section
/// must not sink the whole package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    version: ManifestVersion,
    raw: Value,
}

impl Manifest {
    /// Parses and classifies a manifest document.
    ///
    /// Rejects documents that are not JSON objects, theme packages, and any
    /// `manifest_version` other than the integers 2 or 3.
    pub fn parse(bytes: &[u8]) -> Result<Self, ManifestError> {
        let raw: Value =
            serde_json::from_slice(bytes).map_err(|err| ManifestError::Syntax(err.to_string()))?;
        let doc = raw.as_object().ok_or(ManifestError::NotAnObject)?;
        if doc.contains_key("theme") {
            return Err(ManifestError::Theme);
        }
        let declared = doc.get("manifest_version").and_then(Value::as_i64);
        let version = match declared {
            Some(2) => ManifestVersion::V2,
            Some(3) => ManifestVersion::V3,
            other => return Err(ManifestError::UnsupportedVersion(other)),
        };
        Ok(Self { version, raw })
    }

    pub fn version(&self) -> ManifestVersion {
        self.version
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Re-serializes the raw document with 2-space indentation.
    /// Re-parsing the output yields a document equal to the input.
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(&self.raw).unwrap_or_default()
    }

    /// Script paths declared across all `content_scripts` groups, in
    /// declaration order. Non-object groups and non-string entries are
    /// ignored. Duplicates are preserved here; deduplication is the
    /// bundle's job.
    pub fn content_script_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        if let Some(groups) = self.raw.get("content_scripts").and_then(Value::as_array) {
            for group in groups {
                if let Some(scripts) = group.get("js").and_then(Value::as_array) {
                    for script in scripts {
                        if let Some(path) = script.as_str() {
                            paths.push(path.to_string());
                        }
                    }
                }
            }
        }
        paths
    }

    /// Static `background.scripts` list (manifest v2). Non-string entries
    /// are ignored.
    pub fn background_scripts(&self) -> Vec<String> {
        let mut scripts = Vec::new();
        if let Some(declared) = self
            .raw
            .get("background")
            .and_then(|background| background.get("scripts"))
            .and_then(Value::as_array)
        {
            for script in declared {
                if let Some(path) = script.as_str() {
                    scripts.push(path.to_string());
                }
            }
        }
        scripts
    }

    /// The declared `background.page` (manifest v2), if present and non-empty.
    pub fn background_page(&self) -> Option<String> {
        self.raw
            .get("background")
            .and_then(|background| background.get("page"))
            .and_then(Value::as_str)
            .filter(|page| !page.is_empty())
            .map(str::to_string)
    }

    /// The declared `background.service_worker` (manifest v3), if it is a
    /// string.
    pub fn service_worker(&self) -> Option<String> {
        self.raw
            .get("background")
            .and_then(|background| background.get("service_worker"))
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    /// Web-accessible-resource glob patterns, normalized across schema
    /// versions: v2 declares a flat pattern list, v3 wraps patterns in rule
    /// objects with a `resources` list each.
    pub fn war_patterns(&self) -> Vec<String> {
        let mut patterns = Vec::new();
        let declared = match self
            .raw
            .get("web_accessible_resources")
            .and_then(Value::as_array)
        {
            Some(declared) => declared,
            None => return patterns,
        };
        match self.version {
            ManifestVersion::V2 => {
                for pattern in declared {
                    if let Some(pattern) = pattern.as_str() {
                        patterns.push(pattern.to_string());
                    }
                }
            }
            ManifestVersion::V3 => {
                for rule in declared {
                    if let Some(resources) = rule.get("resources").and_then(Value::as_array) {
                        for pattern in resources {
                            if let Some(pattern) = pattern.as_str() {
                                patterns.push(pattern.to_string());
                            }
                        }
                    }
                }
            }
        }
        patterns
    }
}
