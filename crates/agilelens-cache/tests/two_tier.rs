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

use agilelens_cache::{CacheConfig, CacheManager, ManualClock, RemoteError, RemoteStore};
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// In-memory stand-in for Redis with `*`-only glob support
#[derive(Debug, Default)]
struct FakeRemote {
    entries: Mutex<HashMap<String, (String, Duration)>>,
    failing: AtomicBool,
    ping_fails: bool,
}

impl FakeRemote {
    fn unreachable() -> Self {
        Self {
            ping_fails: true,
            ..Self::default()
        }
    }

    fn fail(&self, on: bool) {
        self.failing.store(on, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), RemoteError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(RemoteError::Unavailable("connection reset".to_owned()))
        } else {
            Ok(())
        }
    }

    fn insert(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .insert(key.to_owned(), (value.to_owned(), Duration::from_secs(60)));
    }

    fn ttl_of(&self, key: &str) -> Option<Duration> {
        self.entries.lock().get(key).map(|(_, ttl)| *ttl)
    }

    fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.lock().keys().cloned().collect();
        keys.sort();
        keys
    }
}

fn glob_match(pattern: &str, key: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();
    if parts.len() == 1 {
        return pattern == key;
    }
    let mut rest = key;
    for (i, part) in parts.iter().enumerate() {
        if i == 0 {
            match rest.strip_prefix(part) {
                Some(r) => rest = r,
                None => return false,
            }
        } else if i == parts.len() - 1 {
            return rest.ends_with(part);
        } else {
            match rest.find(part) {
                Some(pos) => rest = &rest[pos + part.len()..],
                None => return false,
            }
        }
    }
    true
}

#[async_trait]
impl RemoteStore for FakeRemote {
    async fn ping(&self) -> Result<(), RemoteError> {
        if self.ping_fails {
            return Err(RemoteError::Unavailable("connection refused".to_owned()));
        }
        self.check()
    }

    async fn get(&self, key: &str) -> Result<Option<String>, RemoteError> {
        self.check()?;
        Ok(self.entries.lock().get(key).map(|(v, _)| v.clone()))
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), RemoteError> {
        self.check()?;
        self.entries
            .lock()
            .insert(key.to_owned(), (value.to_owned(), ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), RemoteError> {
        self.check()?;
        self.entries.lock().remove(key);
        Ok(())
    }

    async fn delete_matching(&self, pattern: &str) -> Result<usize, RemoteError> {
        self.check()?;
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|key, _| !glob_match(pattern, key));
        Ok(before - entries.len())
    }

    async fn flush(&self) -> Result<(), RemoteError> {
        self.check()?;
        self.entries.lock().clear();
        Ok(())
    }
}

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 12, 14, 12, 0, 0).unwrap()
}

async fn two_tier(remote: &Arc<FakeRemote>) -> (CacheManager, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(start()));
    let cache = CacheManager::with_remote(CacheConfig::default(), clock.clone(), remote.clone()).await;
    (cache, clock)
}

#[tokio::test]
async fn test_set_writes_both_tiers_with_same_ttl() {
    let remote = Arc::new(FakeRemote::default());
    let (cache, _clock) = two_tier(&remote).await;
    assert!(cache.has_remote());

    cache
        .set("prices:H:none:none", &vec![10.5, 12.0], Some(Duration::from_secs(120)))
        .await;

    assert_eq!(cache.remaining_ttl("prices:H:none:none"), Some(Duration::from_secs(120)));
    assert_eq!(remote.ttl_of("prices:H:none:none"), Some(Duration::from_secs(120)));
}

#[tokio::test]
async fn test_remote_hit_is_promoted_with_full_default_ttl() {
    let remote = Arc::new(FakeRemote::default());
    remote.insert("consumption:123:none:none", "[0.25,0.5]");
    let (cache, _clock) = two_tier(&remote).await;

    let value: Option<Vec<f64>> = cache.get("consumption:123:none:none").await;
    assert_eq!(value, Some(vec![0.25, 0.5]));
    assert_eq!(cache.stats().remote_hits, 1);
    assert_eq!(
        cache.remaining_ttl("consumption:123:none:none"),
        Some(Duration::from_secs(3600))
    );

    // Second read is served locally
    remote.fail(true);
    let again: Option<Vec<f64>> = cache.get("consumption:123:none:none").await;
    assert_eq!(again, Some(vec![0.25, 0.5]));
    assert_eq!(cache.stats().local_hits, 1);
}

#[tokio::test]
async fn test_expired_local_entry_falls_through_to_remote() {
    let remote = Arc::new(FakeRemote::default());
    let (cache, clock) = two_tier(&remote).await;

    cache.set("k", &7, Some(Duration::from_secs(10))).await;
    clock.advance(TimeDelta::seconds(11));

    // The fake never expires, so tier 2 still answers
    assert_eq!(cache.get::<i32>("k").await, Some(7));
    assert_eq!(cache.stats().remote_hits, 1);
}

#[tokio::test]
async fn test_remote_failures_never_surface() {
    let remote = Arc::new(FakeRemote::default());
    let (cache, _clock) = two_tier(&remote).await;
    remote.fail(true);

    cache.set("k", &1, None).await;
    assert_eq!(cache.get::<i32>("k").await, Some(1));
    assert_eq!(cache.get::<i32>("missing").await, None);
    cache.delete("k").await;
    cache.clear("*").await;

    assert!(cache.is_empty());
    assert!(cache.stats().remote_errors >= 4);
}

#[tokio::test]
async fn test_unreachable_remote_disables_tier_two_for_good() {
    let remote = Arc::new(FakeRemote::unreachable());
    let (cache, _clock) = two_tier(&remote).await;
    assert!(!cache.has_remote());

    cache.set("k", &1, None).await;
    assert!(remote.keys().is_empty());
    assert_eq!(cache.get::<i32>("k").await, Some(1));
}

#[tokio::test]
async fn test_clear_applies_tier_specific_matching() {
    let remote = Arc::new(FakeRemote::default());
    let (cache, _clock) = two_tier(&remote).await;

    cache.set("prices:H:none", &1, None).await;
    cache.set("prices:C:none", &2, None).await;
    cache.set("consumption:1:none", &3, None).await;

    cache.clear("prices:*:none").await;

    // Remote glob removed both price keys
    assert_eq!(remote.keys(), vec!["consumption:1:none".to_owned()]);
    // Local substring "prices::none" matched nothing
    assert_eq!(cache.len(), 3);
}

#[tokio::test]
async fn test_clear_all_flushes_both_tiers() {
    let remote = Arc::new(FakeRemote::default());
    let (cache, _clock) = two_tier(&remote).await;

    cache.set("prices:H:none", &1, None).await;
    cache.set("consumption:1:none", &3, None).await;
    cache.clear("*").await;

    assert!(cache.is_empty());
    assert!(remote.keys().is_empty());
}

#[tokio::test]
async fn test_delete_removes_from_both_tiers() {
    let remote = Arc::new(FakeRemote::default());
    let (cache, _clock) = two_tier(&remote).await;

    cache.set("k", &1, None).await;
    cache.delete("k").await;

    assert_eq!(cache.get::<i32>("k").await, None);
    assert!(remote.keys().is_empty());
}

#[tokio::test]
async fn test_close_drops_tier_two() {
    let remote = Arc::new(FakeRemote::default());
    let (cache, _clock) = two_tier(&remote).await;

    cache.close();
    assert!(!cache.has_remote());

    cache.set("k", &1, None).await;
    assert!(remote.keys().is_empty());
}

#[tokio::test]
async fn test_disabled_config_never_touches_remote() {
    let remote = Arc::new(FakeRemote::default());
    remote.insert("k", "1");
    let clock = Arc::new(ManualClock::new(start()));
    let config = CacheConfig {
        enabled: false,
        ..CacheConfig::default()
    };
    let cache = CacheManager::with_remote(config, clock, remote.clone()).await;

    assert!(!cache.has_remote());
    assert_eq!(cache.get::<i32>("k").await, None);
    cache.clear("*").await;
    assert_eq!(remote.keys(), vec!["k".to_owned()]);
}
