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

use chrono::{DateTime, TimeDelta, Utc};
use serde_json::Value;
use std::time::Duration;

/// A cached payload with its expiry
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub data: Value,
    pub created_at: DateTime<Utc>,
    /// Always strictly after `created_at`
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(data: Value, created_at: DateTime<Utc>, ttl: Duration) -> Self {
        let ttl = TimeDelta::from_std(ttl)
            .unwrap_or(TimeDelta::MAX)
            .max(TimeDelta::milliseconds(1));
        let expires_at = created_at
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self {
            data,
            created_at,
            expires_at,
        }
    }

    /// Expired strictly after `expires_at`
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Lifetime left at `now`, zero once expired
    #[must_use]
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.expires_at - now).to_std().unwrap_or(Duration::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_expiry_boundary() {
        let created = Utc.with_ymd_and_hms(2024, 12, 14, 12, 0, 0).unwrap();
        let entry = CacheEntry::new(json!([1, 2]), created, Duration::from_secs(60));

        assert!(entry.expires_at > entry.created_at);
        assert!(!entry.is_expired(created + TimeDelta::seconds(60)));
        assert!(entry.is_expired(created + TimeDelta::seconds(61)));
        assert_eq!(
            entry.remaining(created + TimeDelta::seconds(45)),
            Duration::from_secs(15)
        );
        assert_eq!(
            entry.remaining(created + TimeDelta::seconds(90)),
            Duration::ZERO
        );
    }

    #[test]
    fn test_zero_ttl_still_expires_after_creation() {
        let created = Utc.with_ymd_and_hms(2024, 12, 14, 12, 0, 0).unwrap();
        let entry = CacheEntry::new(json!(null), created, Duration::ZERO);
        assert!(entry.expires_at > entry.created_at);
    }
}
