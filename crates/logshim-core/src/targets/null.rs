//! Target that discards everything.

use logshim_types::{LogEvent, Result, Target};

/// Accepts and drops every event.
#[derive(Debug)]
pub struct NullTarget {
    name: String,
}

impl NullTarget {
    /// Create a null target.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Target for NullTarget {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        "null"
    }

    fn write(&self, _event: &LogEvent) -> Result<()> {
        Ok(())
    }
}
