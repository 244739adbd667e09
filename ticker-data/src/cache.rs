//! Keyed time-to-live cache.
//!
//! Entries are stamped with the instant they were inserted and treated as absent once `ttl` has
//! elapsed. Expiry is the only invalidation: nothing is evicted early.

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;
use std::{collections::HashMap, hash::Hash};

#[derive(Debug)]
struct Entry<V> {
    stored_at: DateTime<Utc>,
    value: V,
}

/// Keyed cache with a fixed expiry, shareable by reference.
#[derive(Debug)]
pub struct TtlCache<K, V> {
    ttl: TimeDelta,
    entries: Mutex<HashMap<K, Entry<V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(ttl: TimeDelta) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Return the cached value if it was stored less than `ttl` before `now`.
    pub fn get(&self, key: &K, now: DateTime<Utc>) -> Option<V> {
        let entries = self.entries.lock();
        entries
            .get(key)
            .filter(|entry| now.signed_duration_since(entry.stored_at) < self.ttl)
            .map(|entry| entry.value.clone())
    }

    pub fn insert(&self, key: K, value: V, now: DateTime<Utc>) {
        self.entries.lock().insert(
            key,
            Entry {
                stored_at: now,
                value,
            },
        );
    }

    /// Drop every entry that has expired as of `now`, returning how many were removed.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, entry| now.signed_duration_since(entry.stored_at) < self.ttl);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
