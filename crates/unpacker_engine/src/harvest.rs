use engine_logging::engine_debug;
use unpacker_core::{Manifest, ManifestVersion, ResourceMatcher, ScriptBundle, ScriptFilter};

use crate::archive::PackageArchive;
use crate::beautify::ScriptBeautifier;
use crate::html::{extract_page_scripts, strip_query_and_fragment};

/// One harvested output artifact: the concatenated body plus how many
/// scripts (inline fragments included) it retained.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HarvestOutput {
    pub scripts: usize,
    pub body: String,
}

/// Collects the ordered, deduplicated script set for each manifest section
/// and renders it into one concatenated, beautified body per artifact.
pub struct ScriptHarvester<'a> {
    beautifier: &'a ScriptBeautifier,
    filter: &'a ScriptFilter,
}

impl<'a> ScriptHarvester<'a> {
    pub fn new(beautifier: &'a ScriptBeautifier, filter: &'a ScriptFilter) -> Self {
        Self { beautifier, filter }
    }

    /// Scripts declared across all `content_scripts` groups.
    pub fn content_scripts(
        &self,
        manifest: &Manifest,
        archive: &mut PackageArchive,
    ) -> HarvestOutput {
        let mut bundle = ScriptBundle::new();
        for path in manifest.content_script_paths() {
            bundle.push(path);
        }
        let (scripts, body) = self.pack_and_beautify(&bundle, archive);
        HarvestOutput { scripts, body }
    }

    /// Background logic: v2 static scripts plus scripts discovered on the
    /// background page, v3 the service worker. Inline page fragments are
    /// prepended to the packed bundle.
    pub fn background(&self, manifest: &Manifest, archive: &mut PackageArchive) -> HarvestOutput {
        let mut bundle = ScriptBundle::new();
        let mut inline = String::new();
        let mut inline_count = 0;
        match manifest.version() {
            ManifestVersion::V2 => {
                for script in manifest.background_scripts() {
                    bundle.push(script);
                }
                if let Some(page) = manifest.background_page() {
                    let page_entry = strip_query_and_fragment(&page).to_string();
                    inline_count +=
                        self.harvest_page(archive, &page_entry, &mut bundle, &mut inline);
                }
            }
            ManifestVersion::V3 => {
                if let Some(worker) = manifest.service_worker() {
                    bundle.push(worker);
                }
            }
        }
        let (packed, body) = self.pack_and_beautify(&bundle, archive);
        HarvestOutput {
            scripts: inline_count + packed,
            body: format!("{inline}{body}"),
        }
    }

    /// Web-accessible resources: every `.htm`-named entry matching the
    /// declared patterns (minus the background page itself) is scanned for
    /// scripts exactly like the background page.
    pub fn wars(&self, manifest: &Manifest, archive: &mut PackageArchive) -> HarvestOutput {
        let matcher = ResourceMatcher::new(manifest.war_patterns());
        if matcher.is_empty() {
            return HarvestOutput::default();
        }
        let background_page = manifest.background_page();
        let mut bundle = ScriptBundle::new();
        let mut inline = String::new();
        let mut inline_count = 0;
        let entries: Vec<String> = archive.entry_names().to_vec();
        for entry in entries {
            if !entry.contains(".htm") {
                continue;
            }
            if background_page.as_deref() == Some(entry.as_str()) {
                continue;
            }
            if !matcher.matches(&entry) {
                continue;
            }
            inline_count += self.harvest_page(archive, &entry, &mut bundle, &mut inline);
        }
        let (packed, body) = self.pack_and_beautify(&bundle, archive);
        HarvestOutput {
            scripts: inline_count + packed,
            body: format!("{inline}{body}"),
        }
    }

    /// Parses one packaged HTML page, pushing `<script src>` references into
    /// `bundle` and appending beautified inline bodies to `inline`. Returns
    /// the number of inline fragments captured.
    fn harvest_page(
        &self,
        archive: &mut PackageArchive,
        page_entry: &str,
        bundle: &mut ScriptBundle,
        inline: &mut String,
    ) -> usize {
        let bytes = archive.read_entry(page_entry);
        if bytes.is_empty() {
            return 0;
        }
        let html = String::from_utf8_lossy(&bytes);
        let scripts = extract_page_scripts(&html, page_entry);
        for src in scripts.external {
            bundle.push(src);
        }
        let suffix = archive.path().to_string_lossy().into_owned();
        let mut count = 0;
        for body in scripts.inline {
            inline.push_str(&format!("// New inline (from {page_entry})\n"));
            inline.push_str(&self.beautifier.beautify(&body, &suffix));
            inline.push('\n');
            count += 1;
        }
        count
    }

    /// Renders a bundle into its concatenated body: each retained script is
    /// tagged with its path, normalized, and beautified. Empty reads
    /// contribute nothing.
    fn pack_and_beautify(
        &self,
        bundle: &ScriptBundle,
        archive: &mut PackageArchive,
    ) -> (usize, String) {
        let suffix = archive.path().to_string_lossy().into_owned();
        let mut packed = 0;
        let mut all_content = String::new();
        for script in bundle.iter() {
            if !self.filter.retains(script) {
                continue;
            }
            let bytes = archive.read_entry(script);
            if bytes.is_empty() {
                engine_debug!("script {script} is empty or missing, nothing to pack");
                continue;
            }
            // The downstream parser cannot handle strict-mode pragmas or
            // spread syntax.
            let content = String::from_utf8_lossy(&bytes)
                .replace("use strict", "")
                .replace("...", "");
            all_content.push_str(&format!("// New file: {script}\n"));
            all_content.push_str(&self.beautifier.beautify(&content, &suffix));
            all_content.push('\n');
            packed += 1;
        }
        (packed, all_content)
    }
}
