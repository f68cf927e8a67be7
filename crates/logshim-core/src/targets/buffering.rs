//! Buffering wrapper.

use crate::diagnostics;
use logshim_types::{LogEvent, Result, Target};
use parking_lot::Mutex;
use std::sync::Arc;

/// Holds events back and hands them to the wrapped target in batches of
/// `buffer_size`.
///
/// Whatever is still held is written on [`flush`](Target::flush) and when
/// the wrapper is dropped.
pub struct BufferingTarget {
    name: String,
    wrapped: Arc<dyn Target>,
    buffer_size: usize,
    pending: Mutex<Vec<LogEvent>>,
}

impl BufferingTarget {
    /// Wrap `wrapped`. A `buffer_size` of zero behaves like one.
    pub fn new(name: impl Into<String>, wrapped: Arc<dyn Target>, buffer_size: usize) -> Self {
        let buffer_size = buffer_size.max(1);
        Self {
            name: name.into(),
            wrapped,
            buffer_size,
            pending: Mutex::new(Vec::with_capacity(buffer_size)),
        }
    }

    /// The wrapped target.
    pub fn wrapped(&self) -> &Arc<dyn Target> {
        &self.wrapped
    }

    /// Batch size.
    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Events held back so far.
    pub fn pending(&self) -> usize {
        self.pending.lock().len()
    }

    // Called with the buffer locked so that batches reach the child in order.
    fn drain(&self, pending: &mut Vec<LogEvent>) -> Result<()> {
        let mut first_error = None;
        for event in pending.drain(..) {
            if let Err(e) = self.wrapped.write(&event) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

impl Target for BufferingTarget {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &'static str {
        "buffering"
    }

    fn write(&self, event: &LogEvent) -> Result<()> {
        let mut pending = self.pending.lock();
        pending.push(event.clone());
        if pending.len() < self.buffer_size {
            return Ok(());
        }
        self.drain(&mut pending)
    }

    fn flush(&self) -> Result<()> {
        let mut pending = self.pending.lock();
        let drained = self.drain(&mut pending);
        drop(pending);
        drained.and(self.wrapped.flush())
    }
}

impl Drop for BufferingTarget {
    fn drop(&mut self) {
        let mut pending = std::mem::take(self.pending.get_mut());
        if let Err(e) = self.drain(&mut pending) {
            diagnostics::sink_failure(&self.name, &e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Layout;
    use crate::targets::MemoryTarget;
    use logshim_types::Level;

    fn event(message: &str) -> LogEvent {
        LogEvent::new(Level::Info, "buffered".into(), message)
    }

    fn wrap(size: usize) -> (BufferingTarget, Arc<MemoryTarget>) {
        let mem = Arc::new(MemoryTarget::new("mem", Layout::parse("${message}")));
        (BufferingTarget::new("buf", mem.clone(), size), mem)
    }

    #[test]
    fn test_holds_events_until_buffer_is_full() {
        let (buf, mem) = wrap(3);
        buf.write(&event("1")).unwrap();
        buf.write(&event("2")).unwrap();
        assert!(mem.is_empty());
        assert_eq!(buf.pending(), 2);

        buf.write(&event("3")).unwrap();
        assert_eq!(mem.logs(), vec!["1", "2", "3"]);
        assert_eq!(buf.pending(), 0);
    }

    #[test]
    fn test_flush_writes_partial_batch() {
        let (buf, mem) = wrap(19);
        buf.write(&event("a")).unwrap();
        buf.flush().unwrap();
        assert_eq!(mem.logs(), vec!["a"]);
    }

    #[test]
    fn test_drop_writes_pending_events() {
        let (buf, mem) = wrap(10);
        buf.write(&event("x")).unwrap();
        buf.write(&event("y")).unwrap();
        drop(buf);
        assert_eq!(mem.logs(), vec!["x", "y"]);
    }

    #[test]
    fn test_zero_size_passes_through() {
        let (buf, mem) = wrap(0);
        assert_eq!(buf.buffer_size(), 1);
        buf.write(&event("now")).unwrap();
        assert_eq!(mem.logs(), vec!["now"]);
    }
}
