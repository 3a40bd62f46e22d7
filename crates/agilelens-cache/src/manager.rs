// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of AgileLens.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::CacheConfig;
use crate::entry::CacheEntry;
use crate::remote::RemoteStore;

/// Wildcard that clears everything in both tiers
const CLEAR_ALL: &str = "*";

/// Snapshot of cache counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub local_hits: u64,
    pub remote_hits: u64,
    pub misses: u64,
    pub remote_errors: u64,
}

#[derive(Debug, Default)]
struct Counters {
    local_hits: AtomicU64,
    remote_hits: AtomicU64,
    misses: AtomicU64,
    remote_errors: AtomicU64,
}

impl Counters {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Two-tier TTL cache
///
/// Tier 1 is a lock-protected map owned by this process. Tier 2 is decided
/// once at construction: if the remote store does not answer then, it stays
/// disabled until the process restarts.
///
/// Concurrent misses on the same key are not coalesced; two callers may both
/// fetch upstream and both `set`, the later write wins.
pub struct CacheManager {
    config: CacheConfig,
    local: RwLock<HashMap<String, CacheEntry>>,
    remote: RwLock<Option<Arc<dyn RemoteStore>>>,
    clock: Arc<dyn Clock>,
    counters: Counters,
}

impl fmt::Debug for CacheManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheManager")
            .field("config", &self.config)
            .field("local_entries", &self.local.read().len())
            .field("remote", &self.remote.read().is_some())
            .finish_non_exhaustive()
    }
}

impl CacheManager {
    /// Local-only cache
    pub fn new(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            local: RwLock::new(HashMap::new()),
            remote: RwLock::new(None),
            clock,
            counters: Counters::default(),
        }
    }

    /// Local-only cache on the wall clock
    pub fn local_only(config: CacheConfig) -> Self {
        Self::new(config, Arc::new(SystemClock))
    }

    /// Cache with an already constructed tier-2 store
    ///
    /// The store is probed once; if the probe fails tier 2 stays off.
    pub async fn with_remote(
        config: CacheConfig,
        clock: Arc<dyn Clock>,
        remote: Arc<dyn RemoteStore>,
    ) -> Self {
        let manager = Self::new(config, clock);
        if !manager.config.enabled {
            return manager;
        }

        match remote.ping().await {
            Ok(()) => {
                info!("Remote cache initialized successfully");
                *manager.remote.write() = Some(remote);
            }
            Err(e) => {
                warn!("Failed to initialize remote cache: {e}. Using memory cache only.");
            }
        }
        manager
    }

    /// Cache configured from `config.remote_url`
    ///
    /// A single connection attempt is made; no URL, a failed connect or a
    /// failed probe all leave the cache local-only.
    #[cfg(feature = "redis")]
    pub async fn connect(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        let url = match (&config.remote_url, config.enabled) {
            (Some(url), true) => url.clone(),
            _ => {
                info!("Cache manager initialized (memory only)");
                return Self::new(config, clock);
            }
        };

        match crate::redis_store::RedisStore::connect(&url).await {
            Ok(store) => Self::with_remote(config, clock, Arc::new(store)).await,
            Err(e) => {
                warn!("Failed to initialize Redis cache: {e}. Using memory cache only.");
                Self::new(config, clock)
            }
        }
    }

    /// Release tier 2; later calls behave as local-only
    pub fn close(&self) {
        if self.remote.write().take().is_some() {
            info!("Remote cache connection closed");
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    #[must_use]
    pub fn has_remote(&self) -> bool {
        self.remote.read().is_some()
    }

    #[must_use]
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    fn remote(&self) -> Option<Arc<dyn RemoteStore>> {
        self.remote.read().clone()
    }

    fn effective_ttl(&self, ttl: Option<Duration>) -> Duration {
        // A zero override means "use the default"
        ttl.filter(|t| !t.is_zero())
            .unwrap_or_else(|| self.config.default_ttl())
    }

    /// Look up `key`, tier 1 first, then tier 2
    ///
    /// A tier-2 hit is copied into tier 1 with a fresh full default TTL
    /// (refresh-on-access), regardless of how long the tier-2 copy has left.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        if !self.config.enabled {
            return None;
        }

        let value = self.get_value(key).await?;
        match serde_json::from_value(value) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!("Cached value for {key} has an unexpected shape: {e}");
                None
            }
        }
    }

    async fn get_value(&self, key: &str) -> Option<Value> {
        let now = self.clock.now();
        if let Some(value) = self.local_lookup(key, now) {
            Counters::bump(&self.counters.local_hits);
            debug!("Cache hit (memory): {key}");
            return Some(value);
        }

        if let Some(remote) = self.remote() {
            match remote.get(key).await {
                Ok(Some(raw)) => match serde_json::from_str::<Value>(&raw) {
                    Ok(value) => {
                        Counters::bump(&self.counters.remote_hits);
                        debug!("Cache hit (remote): {key}");
                        self.promote(key, value.clone());
                        return Some(value);
                    }
                    Err(e) => {
                        warn!("Remote cache returned unreadable JSON for {key}: {e}");
                    }
                },
                Ok(None) => {}
                Err(e) => {
                    Counters::bump(&self.counters.remote_errors);
                    warn!("Remote cache get error: {e}");
                }
            }
        }

        Counters::bump(&self.counters.misses);
        debug!("Cache miss: {key}");
        None
    }

    fn local_lookup(&self, key: &str, now: DateTime<Utc>) -> Option<Value> {
        {
            let local = self.local.read();
            match local.get(key) {
                None => return None,
                Some(entry) if !entry.is_expired(now) => return Some(entry.data.clone()),
                Some(_) => {}
            }
        }

        // Re-check under the write lock: a concurrent `set` may have replaced it
        let mut local = self.local.write();
        match local.get(key) {
            Some(entry) if !entry.is_expired(now) => Some(entry.data.clone()),
            Some(_) => {
                local.remove(key);
                debug!("Evicted expired entry: {key}");
                None
            }
            None => None,
        }
    }

    /// Refresh-on-access: tier-2 hits get the full default TTL locally
    fn promote(&self, key: &str, value: Value) {
        self.store_local(key, value, self.config.default_ttl());
    }

    fn store_local(&self, key: &str, value: Value, ttl: Duration) {
        let entry = CacheEntry::new(value, self.clock.now(), ttl);
        self.local.write().insert(key.to_owned(), entry);
        debug!("Cached to memory: {key} (TTL: {}s)", ttl.as_secs());
    }

    /// Store `value` in both tiers
    ///
    /// `ttl` overrides the configured default. A tier-2 failure is logged
    /// and never fails the call.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T, ttl: Option<Duration>) {
        if !self.config.enabled {
            return;
        }

        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(e) => {
                warn!("Skipping cache write for {key}: {e}");
                return;
            }
        };
        let ttl = self.effective_ttl(ttl);
        let remote = self.remote();
        let raw = remote.as_ref().map(|_| value.to_string());

        self.store_local(key, value, ttl);

        if let (Some(remote), Some(raw)) = (remote, raw) {
            match remote.set_ex(key, &raw, ttl).await {
                Ok(()) => debug!("Cached to remote: {key} (TTL: {}s)", ttl.as_secs()),
                Err(e) => {
                    Counters::bump(&self.counters.remote_errors);
                    warn!("Remote cache set error: {e}");
                }
            }
        }
    }

    /// Remove `key` from both tiers
    pub async fn delete(&self, key: &str) {
        if !self.config.enabled {
            return;
        }

        self.local.write().remove(key);

        if let Some(remote) = self.remote()
            && let Err(e) = remote.delete(key).await
        {
            Counters::bump(&self.counters.remote_errors);
            warn!("Remote cache delete error: {e}");
        }
    }

    /// Clear entries matching `pattern`
    ///
    /// `"*"` empties both tiers. Any other pattern is applied per tier:
    /// locally as a substring test with every `*` removed, remotely as the
    /// store's own glob. So `"prices:*:none"` removes local keys containing
    /// `"prices::none"` (usually none) while the remote glob matches keys
    /// such as `"prices:H:none"`.
    pub async fn clear(&self, pattern: &str) {
        if !self.config.enabled {
            return;
        }

        let removed = {
            let mut local = self.local.write();
            let before = local.len();
            if pattern == CLEAR_ALL {
                local.clear();
            } else {
                let needle = pattern.replace('*', "");
                local.retain(|key, _| !key.contains(&needle));
            }
            before - local.len()
        };
        debug!("Cleared {removed} memory entries for pattern {pattern}");

        let Some(remote) = self.remote() else {
            return;
        };
        let result = if pattern == CLEAR_ALL {
            remote.flush().await
        } else {
            remote.delete_matching(pattern).await.map(|count| {
                debug!("Cleared {count} remote entries for pattern {pattern}");
            })
        };
        if let Err(e) = result {
            Counters::bump(&self.counters.remote_errors);
            warn!("Remote cache clear error: {e}");
        }
    }

    /// Drop expired tier-1 entries, returns how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut local = self.local.write();
        let before = local.len();
        local.retain(|_, entry| !entry.is_expired(now));
        before - local.len()
    }

    /// Tier-1 entries, expired ones not yet evicted included
    #[must_use]
    pub fn len(&self) -> usize {
        self.local.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.local.read().is_empty()
    }

    /// Time left for `key` in tier 1, `None` when absent or expired
    #[must_use]
    pub fn remaining_ttl(&self, key: &str) -> Option<Duration> {
        let now = self.clock.now();
        self.local
            .read()
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.remaining(now))
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            local_hits: self.counters.local_hits.load(Ordering::Relaxed),
            remote_hits: self.counters.remote_hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            remote_errors: self.counters.remote_errors.load(Ordering::Relaxed),
        }
    }
}
