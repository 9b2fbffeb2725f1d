use crate::state::Shared;
use chrono::{DateTime, Utc};
use medisim_engine::LogEntry;
use std::collections::VecDeque;

pub const DEFAULT_CAPACITY: usize = 50;

/// Receives status-change entries. Failures are reported to the caller,
/// which logs them and carries on.
pub trait LogSink: Send + Sync {
    fn record(&self, entry: LogEntry) -> anyhow::Result<()>;
}

/// Bounded activity feed, newest entry first.
#[derive(Debug, Clone)]
pub struct LogFeed {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl LogFeed {
    /// New feed holding the bootstrap entry.
    pub fn new(capacity: usize, now: DateTime<Utc>) -> Self {
        let capacity = capacity.max(1);
        let mut entries = VecDeque::with_capacity(capacity);
        entries.push_front(LogEntry::bootstrap(now));
        Self { entries, capacity }
    }

    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl LogSink for Shared<LogFeed> {
    fn record(&self, entry: LogEntry) -> anyhow::Result<()> {
        self.lock().push(entry);
        Ok(())
    }
}
