use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::candidates::{BoardColumns, Candidate};

/// Where the current contents of an entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryOrigin {
    /// Last written by a fetch; matches server truth as of `updated_at`.
    Fetched,
    /// Last written by a local projection not yet confirmed by the server.
    Optimistic,
}

/// Cached candidate collection of one job.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub candidates: Vec<Candidate>,
    /// Bumped on every optimistic write and every replacement.
    pub version: u64,
    /// Set by invalidation, cleared by the next successful replacement.
    pub stale: bool,
    pub origin: EntryOrigin,
    /// Error of the most recent failed load, if it has not been superseded.
    pub last_error: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl CacheEntry {
    fn empty() -> Self {
        Self {
            candidates: Vec::new(),
            version: 0,
            stale: true,
            origin: EntryOrigin::Fetched,
            last_error: None,
            updated_at: Utc::now(),
        }
    }
}

/// Keyed, versioned cache of candidate collections (key = job id).
///
/// Cloning yields another handle to the same entries. Writes are
/// last-writer-wins; there is a single writer per job (its board session).
#[derive(Debug, Clone, Default)]
pub struct CandidateStore {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl CandidateStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of a job's entry.
    pub fn entry(&self, job_id: &str) -> Option<CacheEntry> {
        self.read().get(job_id).cloned()
    }

    /// Snapshot of a job's collection.
    pub fn candidates(&self, job_id: &str) -> Option<Vec<Candidate>> {
        self.read().get(job_id).map(|entry| entry.candidates.clone())
    }

    /// The job's collection grouped into sorted columns (empty when unknown).
    pub fn columns(&self, job_id: &str) -> BoardColumns {
        match self.read().get(job_id) {
            Some(entry) => BoardColumns::from_candidates(&entry.candidates),
            None => BoardColumns::from_candidates(&[]),
        }
    }

    /// Current version of a job's entry, 0 when there is none.
    pub fn version(&self, job_id: &str) -> u64 {
        self.read().get(job_id).map_or(0, |entry| entry.version)
    }

    /// Whether the job's data must be refetched. A job without an entry is
    /// stale.
    pub fn is_stale(&self, job_id: &str) -> bool {
        self.read().get(job_id).map_or(true, |entry| entry.stale)
    }

    /// Writes a local projection in place of the job's collection.
    /// Returns the new version.
    pub fn set_optimistic(&self, job_id: &str, candidates: Vec<Candidate>) -> u64 {
        let mut entries = self.write();
        let entry = entries
            .entry(job_id.to_string())
            .or_insert_with(CacheEntry::empty);
        entry.candidates = candidates;
        entry.version += 1;
        entry.origin = EntryOrigin::Optimistic;
        entry.updated_at = Utc::now();
        debug!("Optimistic write for job {} (v{})", job_id, entry.version);
        entry.version
    }

    /// Replaces the job's collection wholesale with fetched data, discarding
    /// any optimistic state. Returns the new version.
    pub fn replace(&self, job_id: &str, candidates: Vec<Candidate>) -> u64 {
        let mut entries = self.write();
        let entry = entries
            .entry(job_id.to_string())
            .or_insert_with(CacheEntry::empty);
        entry.candidates = candidates;
        entry.version += 1;
        entry.stale = false;
        entry.origin = EntryOrigin::Fetched;
        entry.last_error = None;
        entry.updated_at = Utc::now();
        debug!(
            "Replaced collection for job {} with {} candidate(s) (v{})",
            job_id,
            entry.candidates.len(),
            entry.version
        );
        entry.version
    }

    /// Marks the job's data stale. Returns false if the job had no entry.
    pub fn invalidate(&self, job_id: &str) -> bool {
        match self.write().get_mut(job_id) {
            Some(entry) => {
                entry.stale = true;
                true
            }
            None => false,
        }
    }

    /// Records a failed load. The last-known collection is kept.
    pub fn record_load_error(&self, job_id: &str, message: impl Into<String>) {
        let mut entries = self.write();
        let entry = entries
            .entry(job_id.to_string())
            .or_insert_with(CacheEntry::empty);
        entry.last_error = Some(message.into());
    }

    /// Drops the job's entry.
    pub fn remove(&self, job_id: &str) -> Option<CacheEntry> {
        self.write().remove(job_id)
    }
}
