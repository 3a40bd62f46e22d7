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

//! Errors from the shared (tier-2) store
//!
//! These never leave the cache manager: they are logged and the operation
//! falls back to the local tier.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("remote cache unavailable: {0}")]
    Unavailable(String),

    #[error("remote cache backend error: {0}")]
    Backend(String),

    #[error("remote cache timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}

#[cfg(feature = "redis")]
impl From<redis::RedisError> for RemoteError {
    fn from(e: redis::RedisError) -> Self {
        if e.is_connection_refusal() || e.is_connection_dropped() || e.is_io_error() {
            Self::Unavailable(e.to_string())
        } else {
            Self::Backend(e.to_string())
        }
    }
}
