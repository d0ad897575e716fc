//! TTL-bounded result cache keyed by canonical query
//!
//! Entries are replaced wholesale, never patched. The cache can be persisted
//! as a JSON snapshot so results survive restarts; loaded entries keep their
//! original timestamps and go stale on schedule.

use crate::error::Result;
use crate::query::normalize_query;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tcg_common::CardCandidate;

/// Cache key `<logic version>:<normalized query>`
pub fn canonical_key(logic_version: &str, query: &str) -> String {
    format!("{}:{}", logic_version, normalize_query(query))
}

/// Results of one search and when they were computed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub timestamp: DateTime<Utc>,
    pub results: Vec<CardCandidate>,
    /// `max_results` the list was cut to. Zero when unknown.
    #[serde(default)]
    pub limit: usize,
}

impl CacheEntry {
    /// Whether this entry can answer a request for `max_results` items: the
    /// request asks for no more than was computed, or the list came up short
    /// of its limit and so already holds every match.
    pub fn covers(&self, max_results: usize) -> bool {
        max_results <= self.limit || self.results.len() < self.limit
    }

    /// An entry is stale once its age reaches `ttl`. Entries stamped in the
    /// future (clock skew) count as fresh.
    pub fn is_stale(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        (now - self.timestamp)
            .to_std()
            .map(|age| age >= ttl)
            .unwrap_or(false)
    }
}

/// Outcome of a cache lookup
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup {
    Fresh(Vec<CardCandidate>),
    Stale(Vec<CardCandidate>),
    Miss,
}

/// On-disk snapshot format
#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheSnapshot {
    entries: HashMap<String, CacheEntry>,
}

/// Query result cache, owned by the aggregator
#[derive(Debug)]
pub struct SearchCache {
    entries: HashMap<String, CacheEntry>,
    ttl: Duration,
    capacity: usize,
}

impl SearchCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            capacity: capacity.max(1),
        }
    }

    /// Default snapshot path: ~/.cache/card_search/search_cache.json
    pub fn default_path() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("card_search")
            .join("search_cache.json")
    }

    /// Load a snapshot, or start empty if it is missing or unreadable
    pub fn load(path: &Path, ttl: Duration, capacity: usize) -> Self {
        let mut cache = Self::new(ttl, capacity);
        if !path.exists() {
            log::info!("Starting with empty search cache");
            return cache;
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<CacheSnapshot>(&content) {
                Ok(snapshot) => {
                    cache.entries = snapshot.entries;
                    cache.evict_over_capacity();
                    log::info!("Loaded search cache with {} entries", cache.len());
                }
                Err(e) => {
                    log::warn!("Failed to parse search cache file, starting fresh: {}", e);
                }
            },
            Err(e) => {
                log::warn!("Failed to read search cache file, starting fresh: {}", e);
            }
        }
        cache
    }

    /// Write a snapshot, creating parent directories if needed
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let snapshot = CacheSnapshot {
            entries: self.entries.clone(),
        };
        std::fs::write(path, serde_json::to_string_pretty(&snapshot)?)?;

        log::debug!("Saved search cache with {} entries", self.entries.len());
        Ok(())
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Never blocks and never triggers I/O. An entry cut shorter than
    /// `max_results` is a miss.
    pub fn lookup(&self, key: &str, max_results: usize, now: DateTime<Utc>) -> CacheLookup {
        match self.entries.get(key) {
            Some(entry) if !entry.covers(max_results) => CacheLookup::Miss,
            Some(entry) if entry.is_stale(self.ttl, now) => CacheLookup::Stale(entry.results.clone()),
            Some(entry) => CacheLookup::Fresh(entry.results.clone()),
            None => CacheLookup::Miss,
        }
    }

    pub fn entry(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    /// Store results computed at `now` and cut to `limit`. Empty result
    /// lists are not cached; returns whether the entry was written.
    pub fn insert(&mut self, key: String, results: Vec<CardCandidate>, limit: usize, now: DateTime<Utc>) -> bool {
        if results.is_empty() {
            return false;
        }
        self.insert_entry(
            key,
            CacheEntry {
                timestamp: now,
                results,
                limit,
            },
        );
        true
    }

    /// Store a complete entry, replacing any previous one for `key`
    pub fn insert_entry(&mut self, key: String, entry: CacheEntry) {
        self.entries.insert(key, entry);
        self.evict_over_capacity();
    }

    pub fn invalidate(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop oldest entries until within capacity
    fn evict_over_capacity(&mut self) {
        while self.entries.len() > self.capacity {
            let oldest = self
                .entries
                .iter()
                .min_by(|(ka, a), (kb, b)| a.timestamp.cmp(&b.timestamp).then_with(|| ka.cmp(kb)))
                .map(|(key, _)| key.clone());
            match oldest {
                Some(key) => {
                    log::debug!("Evicting cached search: {}", key);
                    self.entries.remove(&key);
                }
                None => break,
            }
        }
    }
}
