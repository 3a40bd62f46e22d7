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

use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

use crate::error::RemoteError;

/// Shared key/value store backing tier 2
///
/// Values are JSON text. Key matching in [`RemoteStore::delete_matching`]
/// follows the store's own glob rules, which differ from the local tier's
/// substring matching.
#[async_trait]
pub trait RemoteStore: Send + Sync + fmt::Debug {
    /// Connectivity probe used once at startup
    async fn ping(&self) -> Result<(), RemoteError>;

    async fn get(&self, key: &str) -> Result<Option<String>, RemoteError>;

    /// Store `value` under `key`, expiring after `ttl`
    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), RemoteError>;

    async fn delete(&self, key: &str) -> Result<(), RemoteError>;

    /// Remove every key matching the store-native `pattern`
    /// Returns how many keys were removed
    async fn delete_matching(&self, pattern: &str) -> Result<usize, RemoteError>;

    /// Remove every key in the store's database
    async fn flush(&self) -> Result<(), RemoteError>;
}
