// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Time-based response cache keyed by request URL
//!
//! Holds at most one copy per URL. An entry older than the freshness window
//! is never served; it stays in the map until the next successful fetch of
//! the same URL overwrites it. There is no capacity bound and no sweep.

use serde_json::Value;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Default freshness window: five minutes
pub const DEFAULT_FRESHNESS: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone)]
struct CacheEntry {
    payload: Value,
    retrieved_at: Instant,
}

/// URL-keyed cache of decoded JSON payloads
#[derive(Debug, Clone)]
pub struct ResponseCache {
    freshness: Duration,
    entries: HashMap<String, CacheEntry>,
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new(DEFAULT_FRESHNESS)
    }
}

impl ResponseCache {
    /// Create an empty cache with the given freshness window
    #[must_use]
    pub fn new(freshness: Duration) -> Self {
        Self {
            freshness,
            entries: HashMap::new(),
        }
    }

    /// The configured freshness window
    #[must_use]
    pub fn freshness(&self) -> Duration {
        self.freshness
    }

    /// Payload stored for `url`, if it was retrieved less than one window before `now`
    #[must_use]
    pub fn fresh(&self, url: &str, now: Instant) -> Option<&Value> {
        let entry = self.entries.get(url)?;
        let age = now.saturating_duration_since(entry.retrieved_at);
        (age < self.freshness).then_some(&entry.payload)
    }

    /// Store `payload` for `url`, replacing any previous entry
    pub fn store(&mut self, url: impl Into<String>, payload: Value, now: Instant) {
        self.entries.insert(
            url.into(),
            CacheEntry {
                payload,
                retrieved_at: now,
            },
        );
    }

    /// Number of stored entries, fresh or stale
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been stored yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
