//! Console target.

use crate::layout::Layout;
use colored::Colorize;
use logshim_types::config::ConsoleStream;
use logshim_types::{Level, LogEvent, LogShimError, Result, Target};
use std::io::{self, Write};

/// Writes one line per event to stdout or stderr.
#[derive(Debug)]
pub struct ConsoleTarget {
    name: String,
    stream: ConsoleStream,
    colored: bool,
    layout: Layout,
}

impl ConsoleTarget {
    /// Create a console target.
    pub fn new(name: impl Into<String>, stream: ConsoleStream, colored: bool, layout: Layout) -> Self {
        Self {
            name: name.into(),
            stream,
            colored,
            layout,
        }
    }

    fn paint(&self, line: String, level: Level) -> String {
        if !self.colored {
            return line;
        }
        match level {
            Level::Fatal => line.red().bold().to_string(),
            Level::Error => line.red().to_string(),
            Level::Warn => line.yellow().to_string(),
            Level::Info => line,
            Level::Debug | Level::Trace => line.dimmed().to_string(),
        }
    }

    fn emit(&self, line: &str) -> io::Result<()> {
        // The lock keeps concurrent lines from interleaving.
        match self.stream {
            ConsoleStream::Stdout => writeln!(io::stdout().lock(), "{line}"),
            ConsoleStream::Stderr => writeln!(io::stderr().lock(), "{line}"),
        }
    }
}

impl Target for ConsoleTarget {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        "console"
    }

    fn write(&self, event: &LogEvent) -> Result<()> {
        let line = self.paint(self.layout.render(event), event.level);
        self.emit(&line).map_err(|e| LogShimError::sink(&self.name, e))
    }

    fn flush(&self) -> Result<()> {
        let result = match self.stream {
            ConsoleStream::Stdout => io::stdout().flush(),
            ConsoleStream::Stderr => io::stderr().flush(),
        };
        result.map_err(|e| LogShimError::sink(&self.name, e))
    }
}
