//! Bounded, newest-first log of past analyses.
//!
//! Records live as one JSON array under a fixed key in a string key-value
//! store. Storage problems never reach the caller: they are logged and the
//! affected record is dropped.

use anyhow::Result;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

pub mod sqlite;

pub const HISTORY_KEY: &str = "prd_analysis_history";
pub const HISTORY_CAPACITY: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: String,
    pub label: String,
    pub report: String,
    pub timestamp: DateTime<Utc>,
}

impl AnalysisRecord {
    pub fn new(label: &str, report: &str) -> Self {
        let timestamp = Utc::now();
        let suffix = Uuid::new_v4().simple().to_string();
        Self {
            id: format!("{}-{}", timestamp.timestamp_millis(), &suffix[..8]),
            label: label.to_string(),
            report: report.to_string(),
            timestamp,
        }
    }
}

/// Persisted string store scoped to this installation.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

pub trait HistoryStore: Send + Sync {
    /// Front-insert a record and truncate to capacity. `None` if it could not be persisted.
    fn append(&self, label: &str, report: &str) -> Option<AnalysisRecord>;
    fn list(&self) -> Vec<AnalysisRecord>;
    fn get(&self, id: &str) -> Option<AnalysisRecord>;
    fn clear(&self);
}

pub struct KvHistory<K: KvStore> {
    kv: K,
    capacity: usize,
    // serializes the read-modify-write in `append`
    write_lock: Mutex<()>,
}

impl<K: KvStore> KvHistory<K> {
    pub fn new(kv: K) -> Self {
        Self::with_capacity(kv, HISTORY_CAPACITY)
    }

    pub fn with_capacity(kv: K, capacity: usize) -> Self {
        Self { kv, capacity, write_lock: Mutex::new(()) }
    }

    fn read(&self) -> Vec<AnalysisRecord> {
        let raw = match self.kv.get(HISTORY_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), "could not read analysis history");
                return Vec::new();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(error = %e, "stored analysis history is unreadable; treating as empty");
                Vec::new()
            }
        }
    }
}

impl<K: KvStore> HistoryStore for KvHistory<K> {
    fn append(&self, label: &str, report: &str) -> Option<AnalysisRecord> {
        let _guard = self.write_lock.lock();
        let record = AnalysisRecord::new(label, report);
        let mut records = self.read();
        records.insert(0, record.clone());
        records.truncate(self.capacity);

        let encoded = match serde_json::to_string(&records) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, "could not encode analysis history");
                return None;
            }
        };
        match self.kv.set(HISTORY_KEY, &encoded) {
            Ok(()) => {
                tracing::debug!(id = %record.id, total = records.len(), "analysis recorded");
                Some(record)
            }
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), label, "failed to persist analysis history");
                None
            }
        }
    }

    fn list(&self) -> Vec<AnalysisRecord> {
        self.read()
    }

    fn get(&self, id: &str) -> Option<AnalysisRecord> {
        self.read().into_iter().find(|r| r.id == id)
    }

    fn clear(&self) {
        let _guard = self.write_lock.lock();
        if let Err(e) = self.kv.remove(HISTORY_KEY) {
            tracing::warn!(error = %format!("{e:#}"), "failed to clear analysis history");
        }
    }
}

#[derive(Default)]
pub struct MemoryKv {
    map: Mutex<HashMap<String, String>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.map.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.map.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.map.lock().remove(key);
        Ok(())
    }
}

/// In-memory history, used when no durable store is wanted.
pub fn in_memory() -> KvHistory<MemoryKv> {
    KvHistory::new(MemoryKv::new())
}
