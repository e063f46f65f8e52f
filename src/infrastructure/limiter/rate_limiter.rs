use std::time::Duration;

use chrono::Utc;
use dashmap::DashMap;

/// Per-caller sliding window admission control.
///
/// Each key maps to the epoch-ms timestamps of its admitted submissions.
/// Entries older than the window are pruned lazily on every check; there is
/// no background sweep, so distinct keys accumulate for the process lifetime.
/// That growth is bounded by real traffic and accepted at this volume.
pub struct SlidingWindowLimiter {
    buckets: DashMap<String, Vec<i64>>,
    max_per_window: usize,
    window_ms: i64,
}

impl SlidingWindowLimiter {
    pub fn new(max_per_window: usize, window: Duration) -> Self {
        Self {
            buckets: DashMap::new(),
            max_per_window,
            window_ms: window.as_millis() as i64,
        }
    }

    /// Admit or reject one submission for `key` at the current instant.
    ///
    /// Prune, check and append happen under the key's shard lock, so two
    /// concurrent requests for the same key cannot both squeeze past a full
    /// bucket.
    pub fn check(&self, key: &str) -> bool {
        self.check_at(key, Utc::now().timestamp_millis())
    }

    fn check_at(&self, key: &str, now_ms: i64) -> bool {
        let mut bucket = self.buckets.entry(key.to_string()).or_default();
        let window_start = now_ms - self.window_ms;
        bucket.retain(|ts| *ts > window_start);

        if bucket.len() >= self.max_per_window {
            return false;
        }
        bucket.push(now_ms);
        true
    }

    /// Timestamps currently held for `key`, after pruning. Test hook.
    #[cfg(test)]
    fn occupancy_at(&self, key: &str, now_ms: i64) -> usize {
        let window_start = now_ms - self.window_ms;
        self.buckets
            .get(key)
            .map(|b| b.iter().filter(|ts| **ts > window_start).count())
            .unwrap_or(0)
    }
}
