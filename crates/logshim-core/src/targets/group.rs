//! Compound targets that forward to children.

use logshim_types::{LogEvent, Result, Target};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Forwards every event to all children.
pub struct SplitGroupTarget {
    name: String,
    children: Vec<Arc<dyn Target>>,
}

impl SplitGroupTarget {
    /// Create a split group.
    pub fn new(name: impl Into<String>, children: Vec<Arc<dyn Target>>) -> Self {
        Self {
            name: name.into(),
            children,
        }
    }

    /// Child targets.
    pub fn children(&self) -> &[Arc<dyn Target>] {
        &self.children
    }
}

impl Target for SplitGroupTarget {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        "split"
    }

    /// Every child is written even if an earlier one fails; the first
    /// failure is returned.
    fn write(&self, event: &LogEvent) -> Result<()> {
        let mut first_error = None;
        for child in &self.children {
            if let Err(e) = child.write(event) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn flush(&self) -> Result<()> {
        let mut first_error = None;
        for child in &self.children {
            if let Err(e) = child.flush() {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

/// Forwards each event to the next child in turn.
pub struct RoundRobinTarget {
    name: String,
    children: Vec<Arc<dyn Target>>,
    next: AtomicUsize,
}

impl RoundRobinTarget {
    /// Create a round-robin group.
    pub fn new(name: impl Into<String>, children: Vec<Arc<dyn Target>>) -> Self {
        Self {
            name: name.into(),
            children,
            next: AtomicUsize::new(0),
        }
    }

    /// Child targets.
    pub fn children(&self) -> &[Arc<dyn Target>] {
        &self.children
    }
}

impl Target for RoundRobinTarget {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        "round-robin"
    }

    fn write(&self, event: &LogEvent) -> Result<()> {
        if self.children.is_empty() {
            return Ok(());
        }
        let slot = self.next.fetch_add(1, Ordering::Relaxed) % self.children.len();
        self.children[slot].write(event)
    }

    fn flush(&self) -> Result<()> {
        self.children.iter().try_for_each(|child| child.flush())
    }
}
