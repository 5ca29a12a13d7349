use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::sync::Arc;

use engine_logging::engine_warn;
use sha2::{Digest, Sha256};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormatterError {
    #[error("failed to run {command}: {source}")]
    Launch { command: String, source: io::Error },
    #[error("{command} exited with {status}")]
    NonZero { command: String, status: ExitStatus },
}

/// Capability interface over the external script formatter, so it can be
/// substituted or mocked in tests.
pub trait Formatter: Send + Sync {
    /// Reformats the file at `path` in place.
    fn format_in_place(&self, path: &Path) -> Result<(), FormatterError>;
}

/// Shells out to the `js-beautify` CLI (npm package js-beautify).
#[derive(Debug, Clone)]
pub struct JsBeautify {
    command: String,
}

impl Default for JsBeautify {
    fn default() -> Self {
        Self {
            command: "js-beautify".to_string(),
        }
    }
}

impl JsBeautify {
    pub fn with_command(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Formatter for JsBeautify {
    fn format_in_place(&self, path: &Path) -> Result<(), FormatterError> {
        let status = Command::new(&self.command)
            .arg("-t")
            .arg("-r")
            .arg(path)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|source| FormatterError::Launch {
                command: self.command.clone(),
                source,
            })?;
        if !status.success() {
            return Err(FormatterError::NonZero {
                command: self.command.clone(),
                status,
            });
        }
        Ok(())
    }
}

/// Normalizes script bodies through the external formatter, staging each one
/// in a content-addressed temporary file.
///
/// Suffix uniqueness across concurrent jobs is the caller's contract: the
/// pipeline passes the archive's own path, which is unique per job.
pub struct ScriptBeautifier {
    formatter: Arc<dyn Formatter>,
    temp_dir: PathBuf,
}

impl ScriptBeautifier {
    pub fn new(formatter: Arc<dyn Formatter>) -> Self {
        Self {
            formatter,
            temp_dir: std::env::temp_dir(),
        }
    }

    pub fn with_temp_dir(mut self, temp_dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = temp_dir.into();
        self
    }

    /// Returns the formatted text, or `content` unchanged when staging or
    /// formatting fails. The staging file is removed on every exit path.
    pub fn beautify(&self, content: &str, suffix: &str) -> String {
        let file_name = format!("{}_{}", content_hash(content), flatten_suffix(suffix));
        let staged = self.temp_dir.join(file_name);
        if let Err(err) = fs::write(&staged, content) {
            engine_warn!("could not stage script at {}: {err}", staged.display());
            return content.to_string();
        }
        let _guard = RemoveOnDrop(&staged);

        if let Err(err) = self.formatter.format_in_place(&staged) {
            engine_warn!("beautifier failed, keeping unformatted content: {err}");
            return content.to_string();
        }
        match fs::read_to_string(&staged) {
            Ok(formatted) => formatted,
            Err(err) => {
                engine_warn!(
                    "could not read back {}, keeping unformatted content: {err}",
                    staged.display()
                );
                content.to_string()
            }
        }
    }
}

struct RemoveOnDrop<'a>(&'a Path);

impl Drop for RemoveOnDrop<'_> {
    fn drop(&mut self) {
        let _ = fs::remove_file(self.0);
    }
}

/// Short hex digest of the script body, keeping staged file names stable for
/// identical content.
fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(32);
    for byte in digest.iter().take(16) {
        use std::fmt::Write;
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}

/// Collapses the suffix into a single path segment.
fn flatten_suffix(suffix: &str) -> String {
    suffix.replace(['/', '\\'], "_")
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;
    use std::sync::Arc;

    use super::{Formatter, FormatterError, ScriptBeautifier};

    struct Noop;

    impl Formatter for Noop {
        fn format_in_place(&self, _path: &Path) -> Result<(), FormatterError> {
            Ok(())
        }
    }

    struct Rewriting;

    impl Formatter for Rewriting {
        fn format_in_place(&self, path: &Path) -> Result<(), FormatterError> {
            fs::write(path, "formatted").map_err(|source| FormatterError::Launch {
                command: "rewriting".to_string(),
                source,
            })
        }
    }

    struct Failing;

    impl Formatter for Failing {
        fn format_in_place(&self, _path: &Path) -> Result<(), FormatterError> {
            Err(FormatterError::Launch {
                command: "missing-formatter".to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not installed"),
            })
        }
    }

    fn temp_is_empty(dir: &Path) -> bool {
        fs::read_dir(dir).unwrap().next().is_none()
    }

    #[test]
    fn returns_formatted_text_and_cleans_up() {
        let temp = tempfile::TempDir::new().unwrap();
        let beautifier =
            ScriptBeautifier::new(Arc::new(Rewriting)).with_temp_dir(temp.path());
        assert_eq!(beautifier.beautify("var x=1;", "/data/demo.crx"), "formatted");
        assert!(temp_is_empty(temp.path()));
    }

    #[test]
    fn noop_formatter_round_trips_content() {
        let temp = tempfile::TempDir::new().unwrap();
        let beautifier = ScriptBeautifier::new(Arc::new(Noop)).with_temp_dir(temp.path());
        assert_eq!(beautifier.beautify("var x=1;", "demo.crx"), "var x=1;");
        assert!(temp_is_empty(temp.path()));
    }

    #[test]
    fn formatter_failure_falls_back_to_input() {
        let temp = tempfile::TempDir::new().unwrap();
        let beautifier = ScriptBeautifier::new(Arc::new(Failing)).with_temp_dir(temp.path());
        assert_eq!(beautifier.beautify("var x=1;", "demo.crx"), "var x=1;");
        // The staged file must not leak on the failure path either.
        assert!(temp_is_empty(temp.path()));
    }
}
