#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::Path;

use unpacker_engine::{Formatter, FormatterError};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Writes a zip archive with the given (name, content) entries.
pub fn write_archive(path: &Path, entries: &[(&str, &str)]) {
    let file = File::create(path).expect("create archive");
    let mut writer = ZipWriter::new(file);
    for (name, content) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .expect("start entry");
        writer.write_all(content.as_bytes()).expect("write entry");
    }
    writer.finish().expect("finish archive");
}

/// A formatter that leaves staged files untouched, so assertions can match
/// script bodies verbatim.
pub struct NoopFormatter;

impl Formatter for NoopFormatter {
    fn format_in_place(&self, _path: &Path) -> Result<(), FormatterError> {
        Ok(())
    }
}
