//! Output sinks for rendered reports.
//!
//! The harness asks a [`ReportSink`] for a fresh artifact each time a report is
//! generated. [`NumberedFileSink`] implements the on-disk naming policy
//! (`{run}/{base}{NNN}`); [`MemorySink`] keeps artifacts in memory.

use std::cell::RefCell;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Extension appended when the base name has none.
pub const DEFAULT_EXTENSION: &str = "html";

/// A freshly created, empty output target.
pub struct Artifact {
    /// Human-readable location (a path for files).
    pub location: String,
    pub writer: Box<dyn Write>,
}

/// Capability to create a new, never-before-used output target.
pub trait ReportSink {
    fn create(&mut self) -> io::Result<Artifact>;
}

/// Writes `{root}/{run_name}/{stem}{NNN}.{ext}`, advancing `NNN` from `000`
/// until an unused name is claimed.
#[derive(Debug, Clone)]
pub struct NumberedFileSink {
    dir: PathBuf,
    stem: String,
    extension: String,
}

impl NumberedFileSink {
    #[must_use]
    pub fn new(root: impl AsRef<Path>, run_name: &str, base_name: &str) -> Self {
        let (stem, extension) = split_base_name(base_name);
        Self {
            dir: root.as_ref().join(run_name),
            stem,
            extension,
        }
    }

    /// Directory artifacts are written to.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path for counter value `n`.
    #[must_use]
    pub fn candidate(&self, n: u32) -> PathBuf {
        self.dir
            .join(format!("{}{:03}.{}", self.stem, n, self.extension))
    }
}

impl ReportSink for NumberedFileSink {
    fn create(&mut self) -> io::Result<Artifact> {
        fs::create_dir_all(&self.dir)?;
        for n in 0..=u32::MAX {
            let path = self.candidate(n);
            // `create_new` claims the name atomically; an existing file means "taken".
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => {
                    return Ok(Artifact {
                        location: path.display().to_string(),
                        writer: Box::new(io::BufWriter::new(file)),
                    });
                }
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {}
                Err(err) => return Err(err),
            }
        }
        Err(io::Error::other(format!(
            "no unused artifact name left in {}",
            self.dir.display()
        )))
    }
}

fn split_base_name(base_name: &str) -> (String, String) {
    match base_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
            (stem.to_string(), ext.to_string())
        }
        _ => (base_name.to_string(), DEFAULT_EXTENSION.to_string()),
    }
}

/// Cloneable in-memory byte buffer implementing [`Write`].
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Contents decoded as UTF-8 (lossy).
    #[must_use]
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Keeps every created artifact in memory. Clones share the same store.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    artifacts: Rc<RefCell<Vec<SharedBuffer>>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Contents of every artifact created so far, oldest first.
    #[must_use]
    pub fn artifacts(&self) -> Vec<String> {
        self.artifacts
            .borrow()
            .iter()
            .map(SharedBuffer::contents)
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.artifacts.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.artifacts.borrow().is_empty()
    }
}

impl ReportSink for MemorySink {
    fn create(&mut self) -> io::Result<Artifact> {
        let buffer = SharedBuffer::new();
        let mut artifacts = self.artifacts.borrow_mut();
        let location = format!("memory://{:03}", artifacts.len());
        artifacts.push(buffer.clone());
        Ok(Artifact {
            location,
            writer: Box::new(buffer),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_name_extension_goes_after_counter() {
        let sink = NumberedFileSink::new("/tmp/x", "Test_Program", "output.html");
        assert_eq!(
            sink.candidate(0),
            PathBuf::from("/tmp/x/Test_Program/output000.html")
        );
        assert_eq!(
            sink.candidate(12),
            PathBuf::from("/tmp/x/Test_Program/output012.html")
        );
    }

    #[test]
    fn bare_base_name_gets_default_extension() {
        let sink = NumberedFileSink::new("root", "run", "report");
        assert_eq!(sink.candidate(1), PathBuf::from("root/run/report001.html"));
    }

    #[test]
    fn dotfile_base_name_is_treated_as_stem() {
        let sink = NumberedFileSink::new("root", "run", ".hidden");
        assert_eq!(sink.candidate(0), PathBuf::from("root/run/.hidden000.html"));
    }

    #[test]
    fn memory_sink_numbers_artifacts() {
        let mut sink = MemorySink::new();
        let mut first = sink.create().unwrap();
        first.writer.write_all(b"one").unwrap();
        let second = sink.create().unwrap();
        assert_eq!(first.location, "memory://000");
        assert_eq!(second.location, "memory://001");
        assert_eq!(sink.artifacts(), vec!["one".to_string(), String::new()]);
    }

    #[test]
    fn shared_buffer_clones_share_storage() {
        let buffer = SharedBuffer::new();
        let mut writer = buffer.clone();
        writer.write_all(b"abc").unwrap();
        assert_eq!(buffer.contents(), "abc");
        assert!(!buffer.is_empty());
    }
}
