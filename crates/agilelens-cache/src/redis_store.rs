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

//! Redis-backed tier 2

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::MultiplexedConnection;
use std::fmt;
use std::time::Duration;
use tracing::debug;

use crate::error::RemoteError;
use crate::remote::RemoteStore;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Multiplexed connection to a single Redis database
///
/// Cloning is cheap; every operation works on its own handle to the shared
/// connection.
#[derive(Clone)]
pub struct RedisStore {
    conn: MultiplexedConnection,
    url: String,
}

impl fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisStore").field("url", &self.url).finish()
    }
}

impl RedisStore {
    /// Open a connection, a single attempt bounded by a timeout
    pub async fn connect(url: &str) -> Result<Self, RemoteError> {
        let client = redis::Client::open(url)?;
        let conn = tokio::time::timeout(CONNECT_TIMEOUT, client.get_multiplexed_async_connection())
            .await
            .map_err(|_| RemoteError::Timeout {
                timeout_secs: CONNECT_TIMEOUT.as_secs(),
            })??;

        debug!("Connected to Redis at {url}");
        Ok(Self {
            conn,
            url: url.to_owned(),
        })
    }
}

#[async_trait]
impl RemoteStore for RedisStore {
    async fn ping(&self) -> Result<(), RemoteError> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, RemoteError> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), RemoteError> {
        let mut conn = self.conn.clone();
        // SETEX rejects a zero expiry
        let seconds = ttl.as_secs().max(1);
        let _: () = conn.set_ex(key, value, seconds).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), RemoteError> {
        let mut conn = self.conn.clone();
        let _: () = conn.del(key).await?;
        Ok(())
    }

    async fn delete_matching(&self, pattern: &str) -> Result<usize, RemoteError> {
        let mut conn = self.conn.clone();
        let keys: Vec<String> = conn.keys(pattern).await?;
        if keys.is_empty() {
            return Ok(0);
        }
        let _: () = conn.del(&keys).await?;
        Ok(keys.len())
    }

    async fn flush(&self) -> Result<(), RemoteError> {
        let mut conn = self.conn.clone();
        let _: () = redis::cmd("FLUSHDB").query_async(&mut conn).await?;
        Ok(())
    }
}
