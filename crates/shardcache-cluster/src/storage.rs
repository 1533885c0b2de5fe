//! Single-node storage contract
//!
//! This module defines the abstraction the routing layer consumes: one
//! implementation per backend host, typically backed by the cache wire
//! protocol. Implementations must be safe for concurrent use; the cluster
//! never serializes access to a host's handle.

use async_trait::async_trait;
use shardcache_common::{Item, Result};
use std::collections::HashMap;

/// Single-node key/value cache operations.
///
/// Key absence is `Ok(None)` (or omission from a batch result), never an
/// error. Errors mean the host could not serve the request, except for
/// [`Error::KeyNotFound`] and [`Error::NotNumeric`] from [`Storage::incr`],
/// which are definitive answers.
///
/// [`Error::KeyNotFound`]: shardcache_common::Error::KeyNotFound
/// [`Error::NotNumeric`]: shardcache_common::Error::NotNumeric
#[async_trait]
pub trait Storage: Send + Sync {
    /// Fetch the item stored under `key`, if any
    async fn get(&self, key: &str) -> Result<Option<Item>>;

    /// Fetch many keys in one request; missing keys are omitted from the
    /// result map
    async fn get_multi(&self, keys: &[String]) -> Result<HashMap<String, Item>>;

    /// Store `item` under `key`. With `noreply` the implementation may
    /// dispatch the write without waiting for the server's acknowledgement.
    /// Returns whether the write was accepted.
    async fn set(&self, key: &str, item: Item, noreply: bool) -> Result<bool>;

    /// Append `suffix` to the value already stored under `key`.
    /// Returns `Ok(false)` when the key holds no value (a no-op).
    async fn append(&self, key: &str, suffix: &[u8]) -> Result<bool>;

    /// Add `delta` to the ASCII-decimal integer stored under `key` and
    /// return the new value. Fails with `KeyNotFound` when the key is
    /// absent and `NotNumeric` when the body is not a decimal integer.
    async fn incr(&self, key: &str, delta: u64) -> Result<u64>;

    /// Remove `key`. Returns whether a value was actually removed.
    async fn delete(&self, key: &str) -> Result<bool>;
}
