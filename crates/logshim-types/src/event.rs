//! The log event handed to targets.

use chrono::{DateTime, Local};
use std::cell::Cell;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use crate::Level;

static NEXT_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static NEXT_THREAD_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static THREAD_ID: Cell<u64> = const { Cell::new(0) };
}

/// Small, stable per-thread number used by `${threadid}`.
pub fn current_thread_id() -> u64 {
    THREAD_ID.with(|id| {
        if id.get() == 0 {
            id.set(NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed));
        }
        id.get()
    })
}

/// A formatted message on its way to the targets.
#[derive(Debug, Clone)]
pub struct LogEvent {
    /// Severity
    pub level: Level,
    /// Name of the logger that produced the event
    pub logger_name: Arc<str>,
    /// Fully formatted message text
    pub message: String,
    /// Creation time
    pub timestamp: DateTime<Local>,
    /// Process-wide increasing event number
    pub sequence_id: u64,
    /// Number of the calling thread, see [`current_thread_id`]
    pub thread_id: u64,
    /// Name of the calling thread, if it has one
    pub thread_name: Option<String>,
}

impl LogEvent {
    /// Capture a new event on the calling thread.
    pub fn new(level: Level, logger_name: Arc<str>, message: impl Into<String>) -> Self {
        let thread = std::thread::current();
        Self {
            level,
            logger_name,
            message: message.into(),
            timestamp: Local::now(),
            sequence_id: NEXT_SEQUENCE.fetch_add(1, Ordering::Relaxed),
            thread_id: current_thread_id(),
            thread_name: thread.name().map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_ids_increase() {
        let a = LogEvent::new(Level::Info, Arc::from("a"), "one");
        let b = LogEvent::new(Level::Info, Arc::from("a"), "two");
        assert!(b.sequence_id > a.sequence_id);
    }

    #[test]
    fn test_thread_id_is_stable_per_thread() {
        let here = current_thread_id();
        assert_eq!(here, current_thread_id());
        let there = std::thread::spawn(current_thread_id).join().unwrap();
        assert_ne!(here, there);
    }
}
