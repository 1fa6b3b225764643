use std::{fmt, sync::Arc};

use chrono::{Duration, NaiveDateTime};
use moka::sync::Cache;
use serde::Deserialize;
use tracing::debug;

use crate::{aggregate::AggregateResult, time_buckets::BucketMode};

/// Maximum age of a cached report before it is recomputed.
pub const FRESHNESS_WINDOW_SECS: u64 = 1200;

#[derive(Debug, Clone, Deserialize)]
pub struct StatsCacheConfig {
    #[serde(default = "default_capacity")]
    pub capacity: u64,
    #[serde(default = "default_freshness_secs")]
    pub freshness_secs: u64,
}

impl Default for StatsCacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            freshness_secs: default_freshness_secs(),
        }
    }
}

impl StatsCacheConfig {
    pub fn freshness(&self) -> Duration {
        i64::try_from(self.freshness_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX)
    }
}

fn default_capacity() -> u64 { 64 }
fn default_freshness_secs() -> u64 { FRESHNESS_WINDOW_SECS }

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatsCacheKey {
    pub mode: BucketMode,
    pub limit_days: u32,
}

impl StatsCacheKey {
    pub fn new(mode: BucketMode, limit_days: u32) -> Self {
        Self { mode, limit_days }
    }
}

impl fmt::Display for StatsCacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "statistics:{}:{}", self.mode, self.limit_days)
    }
}

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub result: Arc<AggregateResult>,
    pub computed_at: NaiveDateTime,
}

impl CacheEntry {
    pub fn is_fresh(&self, now: NaiveDateTime, window: Duration) -> bool {
        now - self.computed_at < window
    }
}

/// Computed reports keyed by `(mode, limit)`. Freshness is judged against
/// the caller's clock rather than moka's own expiry so a test clock can
/// drive it.
pub struct StatsCache {
    entries: Cache<StatsCacheKey, CacheEntry>,
    freshness: Duration,
}

impl StatsCache {
    pub fn new(config: &StatsCacheConfig) -> Self {
        Self {
            entries: Cache::builder().max_capacity(config.capacity).build(),
            freshness: config.freshness(),
        }
    }

    pub fn freshness(&self) -> Duration { self.freshness }

    /// The cached report for `key` if it is younger than the freshness
    /// window at `now`. Stale entries are dropped.
    pub fn get_fresh(
        &self, key: &StatsCacheKey, now: NaiveDateTime,
    ) -> Option<Arc<AggregateResult>> {
        let entry = self.entries.get(key)?;
        if entry.is_fresh(now, self.freshness) {
            return Some(entry.result);
        }

        debug!("Dropping stale statistics entry {}", key);
        self.entries.invalidate(key);
        None
    }

    pub fn insert(
        &self, key: StatsCacheKey, result: Arc<AggregateResult>,
        computed_at: NaiveDateTime,
    ) {
        self.entries.insert(key, CacheEntry {
            result,
            computed_at,
        });
    }

    /// Drops every entry computed for `mode`, whatever its limit.
    pub fn invalidate_mode(&self, mode: BucketMode) {
        let keys: Vec<StatsCacheKey> = self
            .entries
            .iter()
            .filter(|(key, _)| key.mode == mode)
            .map(|(key, _)| *key)
            .collect();

        for key in &keys {
            self.entries.invalidate(key);
        }
        debug!("Invalidated {} statistics entries for {}", keys.len(), mode);
    }

    pub fn invalidate_all(&self) {
        self.entries.invalidate_all();
        debug!("Invalidated all statistics entries");
    }
}

impl Default for StatsCache {
    fn default() -> Self { Self::new(&StatsCacheConfig::default()) }
}
