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

use serde::{Deserialize, Serialize};
use std::time::Duration;

fn default_true() -> bool {
    true
}

fn default_3600() -> u64 {
    3600
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Master switch; when off every lookup misses and writes are dropped
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// TTL applied when `set` gets no override (seconds)
    #[serde(default = "default_3600")]
    pub default_ttl_secs: u64,

    /// Shared store connection string, e.g. `redis://localhost:6379/0`
    /// Absent means no tier 2 at all
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_ttl_secs: 3600,
            remote_url: None,
        }
    }
}

impl CacheConfig {
    /// Default TTL, never shorter than one second
    #[must_use]
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs.max(1))
    }
}
