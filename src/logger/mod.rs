//! Activity logging: a sink trait, the JSONL file writer and an in-memory log.

pub mod jsonl;

use jsonl::{EventType, LogEntry};

/// Sink for dashboard activity events. Recording never fails; sinks degrade
/// internally instead.
pub trait ActivityLog {
    fn record(&mut self, entry: LogEntry);
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLog;

impl ActivityLog for NullLog {
    fn record(&mut self, _entry: LogEntry) {}
}

/// Keeps entries in memory, for headless hosts and tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryLog {
    entries: Vec<LogEntry>,
}

impl MemoryLog {
    #[must_use]
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Number of recorded entries of `event`.
    #[must_use]
    pub fn count(&self, event: EventType) -> usize {
        self.entries.iter().filter(|e| e.event == event).count()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl ActivityLog for MemoryLog {
    fn record(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }
}

impl<L: ActivityLog + ?Sized> ActivityLog for Box<L> {
    fn record(&mut self, entry: LogEntry) {
        (**self).record(entry);
    }
}
