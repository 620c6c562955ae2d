//! Time-limited cache of ranked query results.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use super::SearchResult;
use crate::clock::Clock;

/// Identity of a query: its text plus the sorted directory scope.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    query: String,
    directories: Vec<String>,
}

impl CacheKey {
    pub fn new(query: &str, directories: &[PathBuf]) -> Self {
        let mut directories: Vec<String> = directories
            .iter()
            .map(|dir| dir.to_string_lossy().into_owned())
            .collect();
        directories.sort();

        Self {
            query: query.to_string(),
            directories,
        }
    }
}

struct CacheEntry {
    results: Arc<Vec<SearchResult>>,
    stored_at: Instant,
}

/// Full ranked result lists keyed by [`CacheKey`].
///
/// Entries expire lazily: a lookup older than the TTL misses and drops the
/// entry. Nothing sweeps the map in the background.
pub struct QueryCache {
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl QueryCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    /// Cached results younger than the TTL.
    pub fn get(&self, key: &CacheKey) -> Option<Arc<Vec<SearchResult>>> {
        let now = self.clock.now();
        let mut entries = self.lock();

        let entry = entries.get(key)?;
        if now.saturating_duration_since(entry.stored_at) < self.ttl {
            return Some(Arc::clone(&entry.results));
        }

        entries.remove(key);
        None
    }

    /// Store a ranked result list, replacing any previous entry.
    pub fn insert(&self, key: CacheKey, results: Arc<Vec<SearchResult>>) {
        let stored_at = self.clock.now();
        self.lock().insert(key, CacheEntry { results, stored_at });
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CacheKey, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
