//! In-memory ring buffer sink
//!
//! Keeps the most recent entries in memory, for display in an application or
//! for inspecting output in tests.

use std::collections::VecDeque;
use std::io;
use std::sync::RwLock;

use chrono::{DateTime, Local};

use crate::field::Field;
use crate::level::Level;

use super::{Entry, Sink};

/// An owned copy of an entry
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Timestamp when the entry was recorded
    pub timestamp: DateTime<Local>,
    pub level: Level,
    /// Caller location, `file:line`
    pub caller: Option<String>,
    pub message: String,
    pub fields: Vec<Field>,
}

impl Record {
    /// Value of the first field named `key`
    pub fn field(&self, key: &str) -> Option<&serde_json::Value> {
        self.fields.iter().find(|f| f.key == key).map(|f| &f.value)
    }

    /// Keys of all fields, in order
    pub fn keys(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.key.as_str()).collect()
    }
}

impl From<&Entry<'_>> for Record {
    fn from(entry: &Entry<'_>) -> Self {
        Self {
            timestamp: entry.time,
            level: entry.level,
            caller: entry.caller_display(),
            message: entry.message.to_string(),
            fields: entry.fields.to_vec(),
        }
    }
}

/// Thread-safe ring buffer of recorded entries
#[derive(Debug)]
pub struct BufferSink {
    /// Most recent records, oldest first
    entries: RwLock<VecDeque<Record>>,
    /// Maximum records to keep
    max_entries: usize,
}

impl BufferSink {
    /// Create a buffer keeping at most `max_entries` records
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(VecDeque::with_capacity(max_entries.min(1024))),
            max_entries,
        }
    }

    /// Push a record, evicting the oldest when full
    pub fn push(&self, record: Record) {
        if self.max_entries == 0 {
            return;
        }
        if let Ok(mut entries) = self.entries.write() {
            if entries.len() >= self.max_entries {
                entries.pop_front();
            }
            entries.push_back(record);
        }
    }

    /// Get all records as a vector
    pub fn records(&self) -> Vec<Record> {
        self.entries
            .read()
            .map(|e| e.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Most recent record, if any
    pub fn last(&self) -> Option<Record> {
        self.entries.read().ok().and_then(|e| e.back().cloned())
    }

    /// Get the number of records in the buffer
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    /// Check if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every record
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }
}

impl Default for BufferSink {
    fn default() -> Self {
        Self::new(10_000)
    }
}

impl Sink for BufferSink {
    fn write(&self, entry: &Entry<'_>) -> io::Result<()> {
        self.push(Record::from(entry));
        Ok(())
    }
}
