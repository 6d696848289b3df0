// src/store.rs
//! Persistence collaborators: the signature baseline and the full event snapshot.

use anyhow::{Context, Result};
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use crate::event::{Event, EventRecord};

/// Signatures seen by the previous run.
pub trait SignatureStore: Send + Sync {
    /// Missing or unreadable state is an empty set (first run).
    fn load(&self) -> HashSet<String>;
    /// Replaces the stored set.
    fn save(&self, signatures: &HashSet<String>) -> Result<()>;
}

/// Every event of the current run, for downstream consumers.
pub trait EventStore: Send + Sync {
    fn save(&self, events: &[Event]) -> Result<()>;
}

fn write_json_file(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Sorted JSON array of signature strings.
#[derive(Debug, Clone)]
pub struct JsonSignatureStore {
    path: PathBuf,
}

impl JsonSignatureStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SignatureStore for JsonSignatureStore {
    fn load(&self) -> HashSet<String> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(e) => {
                tracing::info!(path = %self.path.display(), "no signature baseline ({e}); first run");
                return HashSet::new();
            }
        };
        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(v) => v.into_iter().collect(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "corrupt signature baseline, ignoring: {e}");
                HashSet::new()
            }
        }
    }

    fn save(&self, signatures: &HashSet<String>) -> Result<()> {
        let sorted: BTreeSet<&String> = signatures.iter().collect();
        let bytes = serde_json::to_vec_pretty(&sorted).context("serializing signatures")?;
        write_json_file(&self.path, &bytes)
    }
}

#[derive(Debug, Default)]
pub struct MemorySignatureStore {
    inner: Mutex<HashSet<String>>,
}

impl MemorySignatureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_signatures<I: IntoIterator<Item = String>>(items: I) -> Self {
        Self {
            inner: Mutex::new(items.into_iter().collect()),
        }
    }

    pub fn snapshot(&self) -> HashSet<String> {
        lock(&self.inner).clone()
    }
}

impl SignatureStore for MemorySignatureStore {
    fn load(&self) -> HashSet<String> {
        self.snapshot()
    }

    fn save(&self, signatures: &HashSet<String>) -> Result<()> {
        *lock(&self.inner) = signatures.clone();
        Ok(())
    }
}

/// Pretty JSON array of [`EventRecord`]s (the calendar page reads this).
#[derive(Debug, Clone)]
pub struct JsonEventStore {
    path: PathBuf,
}

impl JsonEventStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl EventStore for JsonEventStore {
    fn save(&self, events: &[Event]) -> Result<()> {
        let records: Vec<EventRecord> = events.iter().map(Event::to_record).collect();
        let bytes = serde_json::to_vec_pretty(&records).context("serializing events")?;
        write_json_file(&self.path, &bytes)
    }
}

#[derive(Debug, Default)]
pub struct MemoryEventStore {
    saves: Mutex<Vec<Vec<EventRecord>>>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// One entry per `save` call.
    pub fn saves(&self) -> Vec<Vec<EventRecord>> {
        lock(&self.saves).clone()
    }
}

impl EventStore for MemoryEventStore {
    fn save(&self, events: &[Event]) -> Result<()> {
        lock(&self.saves).push(events.iter().map(Event::to_record).collect());
        Ok(())
    }
}
