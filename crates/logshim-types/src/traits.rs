//! Core trait definitions.

use crate::errors::Result;
use crate::LogEvent;

/// A destination for formatted log events.
///
/// Implementations are shared between every thread that logs through a
/// configuration, so they must serialize access to any sink that is not
/// itself safe for concurrent use. A failed write is reported through the
/// returned error; the caller of `Logger::log` never sees it.
pub trait Target: Send + Sync {
    /// Name of the target, unique within its configuration.
    fn name(&self) -> &str;

    /// Short type name (e.g. "console", "file").
    fn kind(&self) -> &'static str;

    /// Render and write one event.
    fn write(&self, event: &LogEvent) -> Result<()>;

    /// Push buffered output to the underlying sink.
    fn flush(&self) -> Result<()> {
        Ok(())
    }
}
