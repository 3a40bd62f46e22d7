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

//! Two-tier cache for raw upstream series
//!
//! - **Tier 1**: process-local map, always available
//! - **Tier 2**: optional shared store (Redis), best-effort
//!
//! Lookups go tier 1 → tier 2 → caller (who fetches upstream and calls
//! `set`). Every tier-2 failure is logged and degrades the call to
//! tier-1-only behaviour; nothing from tier 2 is ever returned as an error.

pub mod clock;
pub mod config;
pub mod entry;
pub mod error;
pub mod key;
pub mod manager;
pub mod remote;

#[cfg(feature = "redis")]
pub mod redis_store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::CacheConfig;
pub use entry::CacheEntry;
pub use error::RemoteError;
pub use key::CacheDomain;
pub use manager::{CacheManager, CacheStats};
pub use remote::RemoteStore;

#[cfg(feature = "redis")]
pub use redis_store::RedisStore;
