//! Bounded log of past computations, newest first, persisted as JSON under
//! [`HISTORY_KEY`](crate::store::HISTORY_KEY).

use crate::error::{Error, Result};
use crate::format::{format_display, format_number};
use crate::store::{KeyValueStore, HISTORY_KEY};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, warn};

/// Number of entries kept when nothing else is configured.
pub const DEFAULT_CAPACITY: usize = 50;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One successful computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Text of the computation, e.g. `7 + 3` or `sin(90)`
    pub expression: String,
    /// Numeric result
    pub result: f64,
    /// Local time of the computation
    pub timestamp: String,
}

impl HistoryEntry {
    /// The result as the display would show it.
    pub fn formatted_result(&self) -> String {
        format_display(&format_number(self.result))
    }
}

/// The history log. Every mutation is written back to the store.
#[derive(Debug)]
pub struct HistoryLog<S> {
    store: S,
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl<S: KeyValueStore> HistoryLog<S> {
    /// Load the log from `store`, keeping at most `capacity` entries. An
    /// absent, unreadable or malformed log starts empty.
    pub fn load(store: S, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut entries = match store.get(HISTORY_KEY) {
            Ok(Some(text)) => match serde_json::from_str::<VecDeque<HistoryEntry>>(&text) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!(error = %err, "discarding malformed history");
                    VecDeque::new()
                }
            },
            Ok(None) => VecDeque::new(),
            Err(err) => {
                warn!(error = %err, "cannot read history");
                VecDeque::new()
            }
        };
        entries.truncate(capacity);
        debug!(entries = entries.len(), capacity, "loaded history");
        Self {
            store,
            entries,
            capacity,
        }
    }

    /// Record a computation stamped with the current local time. The oldest
    /// entry is evicted once the log is full.
    pub fn append(&mut self, expression: impl Into<String>, result: f64) -> &HistoryEntry {
        let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
        self.push(HistoryEntry {
            expression: expression.into(),
            result,
            timestamp,
        })
    }

    fn push(&mut self, entry: HistoryEntry) -> &HistoryEntry {
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
        self.persist();
        &self.entries[0]
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.persist();
    }

    /// The entry at `index`, 0 being the newest.
    pub fn get(&self, index: usize) -> Result<&HistoryEntry> {
        self.entries.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.entries.len(),
        })
    }

    /// Entries from newest to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True without entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most entries kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Writes are best effort: a failure is logged and the log in memory
    /// stays authoritative.
    fn persist(&self) {
        let result = serde_json::to_string(&self.entries)
            .map_err(|err| Error::Storage(err.to_string()))
            .and_then(|text| self.store.set(HISTORY_KEY, &text));
        if let Err(err) = result {
            warn!(error = %err, "cannot save history");
        }
    }
}
