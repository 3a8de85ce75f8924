//! Time-bounded in-memory cache for profile lookups.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};

use crate::types::ProfileResult;

/// Storage for completed profile lookups.
pub trait ProfileCache: Send + Sync {
    /// A fresh entry for `key`. Stale entries are removed and reported as
    /// missing.
    fn get(&self, key: &str) -> Option<ProfileResult>;

    fn set(&self, key: String, value: ProfileResult);

    /// Entries currently held, stale ones included until they are read.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Cache key for a lookup: lowercased name plus institution scope.
#[must_use]
pub fn cache_key(name: &str, include_all_institutions: bool) -> String {
    let scope = if include_all_institutions { "all" } else { "scoped" };
    format!("{}|{scope}", name.trim().to_lowercase())
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: ProfileResult,
    stored_at_utc: DateTime<Utc>,
}

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// [`ProfileCache`] with a fixed TTL and lazy eviction on read.
pub struct TtlCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
    clock: Clock,
}

impl TtlCache {
    #[must_use]
    pub fn new(ttl: std::time::Duration) -> Self {
        Self::with_clock(ttl, Arc::new(Utc::now))
    }

    /// Build a cache that reads time from `clock`.
    #[must_use]
    pub fn with_clock(ttl: std::time::Duration, clock: Clock) -> Self {
        Self {
            ttl: Duration::from_std(ttl).unwrap_or(Duration::MAX),
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        // A panic while holding the lock cannot leave the map half-written.
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl ProfileCache for TtlCache {
    fn get(&self, key: &str) -> Option<ProfileResult> {
        let now = (self.clock)();
        let mut entries = self.entries();
        let entry = entries.get(key)?;
        if now - entry.stored_at_utc > self.ttl {
            entries.remove(key);
            tracing::debug!(key, "evicted stale profile cache entry");
            return None;
        }
        Some(entry.value.clone())
    }

    fn set(&self, key: String, value: ProfileResult) {
        let stored_at_utc = (self.clock)();
        self.entries().insert(
            key,
            CacheEntry {
                value,
                stored_at_utc,
            },
        );
    }

    fn len(&self) -> usize {
        self.entries().len()
    }
}
