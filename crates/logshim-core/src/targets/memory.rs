//! In-memory target, mostly useful for tests and diagnostics.

use crate::layout::Layout;
use logshim_types::{LogEvent, Result, Target};
use parking_lot::Mutex;

/// Keeps every rendered line.
#[derive(Debug)]
pub struct MemoryTarget {
    name: String,
    layout: Layout,
    lines: Mutex<Vec<String>>,
}

impl MemoryTarget {
    /// Create a memory target with the given layout.
    pub fn new(name: impl Into<String>, layout: Layout) -> Self {
        Self {
            name: name.into(),
            layout,
            lines: Mutex::new(Vec::new()),
        }
    }

    /// Copy of the lines written so far.
    pub fn logs(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    /// Number of lines written so far.
    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    /// Whether nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }

    /// Forget all lines.
    pub fn clear(&self) {
        self.lines.lock().clear();
    }
}

impl Target for MemoryTarget {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        "memory"
    }

    fn write(&self, event: &LogEvent) -> Result<()> {
        let line = self.layout.render(event);
        self.lines.lock().push(line);
        Ok(())
    }
}
