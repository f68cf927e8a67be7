//! File target.

use crate::layout::Layout;
use logshim_types::{LogEvent, LogShimError, Result, Target};
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Appends one line per event to a file.
///
/// The file is opened on the first write, creating missing parent
/// directories. After a failed write the handle is dropped and the next
/// write reopens it.
#[derive(Debug)]
pub struct FileTarget {
    name: String,
    path: PathBuf,
    layout: Layout,
    auto_flush: bool,
    writer: Mutex<Option<BufWriter<File>>>,
}

impl FileTarget {
    /// Create a file target. Nothing is opened yet.
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, layout: Layout, auto_flush: bool) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            layout,
            auto_flush,
            writer: Mutex::new(None),
        }
    }

    /// Path being written.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> std::io::Result<BufWriter<File>> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        Ok(BufWriter::new(file))
    }

    fn append(&self, line: &str) -> std::io::Result<()> {
        let mut guard = self.writer.lock();
        if guard.is_none() {
            *guard = Some(self.open()?);
        }
        let Some(writer) = guard.as_mut() else {
            return Ok(());
        };

        let result = writeln!(writer, "{line}").and_then(|_| {
            if self.auto_flush {
                writer.flush()
            } else {
                Ok(())
            }
        });
        if result.is_err() {
            *guard = None;
        }
        result
    }
}

/// Resolve a configured path: `~` expands to the home directory and
/// relative paths are taken relative to `base_dir`.
pub fn resolve_path(path: &Path, base_dir: Option<&Path>) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    match base_dir {
        Some(base) if path.is_relative() => base.join(path),
        _ => path.to_path_buf(),
    }
}

impl Target for FileTarget {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        "file"
    }

    fn write(&self, event: &LogEvent) -> Result<()> {
        let line = self.layout.render(event);
        self.append(&line).map_err(|e| LogShimError::sink(&self.name, e))
    }

    fn flush(&self) -> Result<()> {
        match self.writer.lock().as_mut() {
            Some(writer) => writer.flush().map_err(|e| LogShimError::sink(&self.name, e)),
            None => Ok(()),
        }
    }
}

impl Drop for FileTarget {
    fn drop(&mut self) {
        if let Some(writer) = self.writer.get_mut().as_mut() {
            let _ = writer.flush();
        }
    }
}
