//! Status history trimming

use chrono::{DateTime, Utc};
use model_store::models::{Settings, Status, StatusDoc, StatusHistoryDoc};
use serde::{Deserialize, Serialize};

/// Number of status history entries exported per entity
pub const STATUS_HISTORY_CAP: usize = 20;

/// A status value at one point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEntry {
    /// Status value
    pub value: Status,
    /// Message
    pub message: String,
    /// Structured data
    pub data: Settings,
    /// When it was set
    pub updated: DateTime<Utc>,
    /// Insertion order, breaks timestamp ties
    #[serde(default)]
    pub seq: u64,
}

impl From<StatusHistoryDoc> for StatusEntry {
    fn from(doc: StatusHistoryDoc) -> Self {
        Self {
            value: doc.status,
            message: doc.message,
            data: doc.data,
            updated: doc.updated,
            seq: doc.seq,
        }
    }
}

impl From<StatusDoc> for StatusEntry {
    fn from(doc: StatusDoc) -> Self {
        Self {
            value: doc.status,
            message: doc.message,
            data: doc.data,
            updated: doc.updated,
            seq: 0,
        }
    }
}

/// The newest `cap` entries, newest first.
///
/// Entries are ordered by `(updated, seq)`, so equal timestamps keep their
/// insertion order. Input order does not matter, and trimming a trimmed
/// result returns it unchanged.
pub fn trim_status_history(mut entries: Vec<StatusEntry>, cap: usize) -> Vec<StatusEntry> {
    entries.sort_by(|a, b| (b.updated, b.seq).cmp(&(a.updated, a.seq)));
    entries.truncate(cap);
    entries
}
