//! In-memory single-node store
//!
//! A [`Storage`] implementation over a locked map. It exercises the exact
//! single-node semantics the cluster depends on (append is a no-op on a
//! missing key, incr parses ASCII-decimal bodies) and serves as the
//! per-host backend in tests and embedded setups.

use crate::storage::Storage;
use async_trait::async_trait;
use bytes::{BufMut, Bytes, BytesMut};
use parking_lot::RwLock;
use shardcache_common::{Error, Item, Result};
use std::collections::HashMap;

/// In-memory [`Storage`] backend
#[derive(Default)]
pub struct MemStore {
    map: RwLock<HashMap<String, Item>>,
}

impl MemStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.read().len()
    }

    /// Whether the store holds no keys
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.read().is_empty()
    }
}

#[async_trait]
impl Storage for MemStore {
    async fn get(&self, key: &str) -> Result<Option<Item>> {
        Ok(self.map.read().get(key).cloned())
    }

    async fn get_multi(&self, keys: &[String]) -> Result<HashMap<String, Item>> {
        let map = self.map.read();
        let mut found = HashMap::new();
        for key in keys {
            if let Some(item) = map.get(key) {
                found.insert(key.clone(), item.clone());
            }
        }
        Ok(found)
    }

    async fn set(&self, key: &str, item: Item, _noreply: bool) -> Result<bool> {
        self.map.write().insert(key.to_string(), item);
        Ok(true)
    }

    async fn append(&self, key: &str, suffix: &[u8]) -> Result<bool> {
        let mut map = self.map.write();
        match map.get_mut(key) {
            Some(item) => {
                let mut body = BytesMut::with_capacity(item.body.len() + suffix.len());
                body.put_slice(&item.body);
                body.put_slice(suffix);
                item.body = body.freeze();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn incr(&self, key: &str, delta: u64) -> Result<u64> {
        let mut map = self.map.write();
        let item = map
            .get_mut(key)
            .ok_or_else(|| Error::KeyNotFound(key.to_string()))?;
        let value = item
            .counter_value()
            .ok_or_else(|| Error::NotNumeric(key.to_string()))?;
        let value = value.saturating_add(delta);
        item.body = Bytes::from(value.to_string());
        Ok(value)
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        Ok(self.map.write().remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let store = MemStore::new();
        assert!(store.get("test").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_get_round_trip() {
        let store = MemStore::new();
        assert!(store
            .set("test", Item::new(&b"value"[..], 2), false)
            .await
            .unwrap());

        let item = store.get("test").await.unwrap().unwrap();
        assert_eq!(&item.body[..], b"value");
        assert_eq!(item.flag, 2);
    }

    #[tokio::test]
    async fn test_get_multi_skips_missing_and_duplicates() {
        let store = MemStore::new();
        store
            .set("test", Item::new(&b"value"[..], 2), false)
            .await
            .unwrap();
        store
            .set("test2", Item::new(&b"value 2"[..], 3), true)
            .await
            .unwrap();

        let keys: Vec<String> = ["test", "test", "test2", "test3"]
            .iter()
            .map(|k| k.to_string())
            .collect();
        let items = store.get_multi(&keys).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(&items["test2"].body[..], b"value 2");
    }

    #[tokio::test]
    async fn test_append() {
        let store = MemStore::new();
        assert!(!store.append("test", b" good").await.unwrap());

        store
            .set("test", Item::new(&b"value"[..], 0), false)
            .await
            .unwrap();
        assert!(store.append("test", b" good").await.unwrap());

        let item = store.get("test").await.unwrap().unwrap();
        assert_eq!(&item.body[..], b"value good");
    }

    #[tokio::test]
    async fn test_incr() {
        let store = MemStore::new();
        assert!(matches!(
            store.incr("test", 5).await,
            Err(Error::KeyNotFound(_))
        ));

        store.set("test", Item::new(&b"3"[..], 4), false).await.unwrap();
        assert_eq!(store.incr("test", 5).await.unwrap(), 8);

        let item = store.get("test").await.unwrap().unwrap();
        assert_eq!(&item.body[..], b"8");
        assert_eq!(item.flag, 4, "incr must not touch the flag");

        store
            .set("word", Item::new(&b"value"[..], 0), false)
            .await
            .unwrap();
        assert!(matches!(
            store.incr("word", 1).await,
            Err(Error::NotNumeric(_))
        ));
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemStore::new();
        store
            .set("test", Item::new(&b"value"[..], 0), false)
            .await
            .unwrap();

        assert!(store.delete("test").await.unwrap());
        assert!(store.get("test").await.unwrap().is_none());
        assert!(!store.delete("test").await.unwrap());
    }

    #[tokio::test]
    async fn test_large_body_round_trip() {
        let store = MemStore::new();
        let body = vec![7u8; 1024 * 1000];
        store
            .set("test_large", Item::new(body.clone(), 3), false)
            .await
            .unwrap();

        let item = store.get("test_large").await.unwrap().unwrap();
        assert_eq!(&item.body[..], &body[..]);
    }
}
