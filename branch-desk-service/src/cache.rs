//! Cache-aside storage for single-application reads.

use async_trait::async_trait;
use moka::future::Cache;
use moka::Expiry;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<Vec<u8>>;

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration);

    async fn invalidate(&self, key: &str);
}

pub fn application_key(id: i64) -> String {
    format!("application:{id}:info")
}

pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, String> {
    let mut cbor = Vec::new();
    ciborium::ser::into_writer(value, &mut cbor).map_err(|e| format!("Failed to encode cache value: {e}"))?;
    Ok(cbor)
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, String> {
    ciborium::de::from_reader(bytes).map_err(|e| format!("Failed to decode cache value: {e}"))
}

#[derive(Clone)]
struct CachedValue {
    bytes: Arc<Vec<u8>>,
    ttl: Duration,
}

struct PerEntryTtl;

impl Expiry<String, CachedValue> for PerEntryTtl {
    fn expire_after_create(&self, _key: &String, value: &CachedValue, _created_at: Instant) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CachedValue,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

pub struct MokaCacheStore {
    entries: Cache<String, CachedValue>,
}

impl MokaCacheStore {
    pub fn new(max_capacity: u64) -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(max_capacity)
                .expire_after(PerEntryTtl)
                .build(),
        }
    }
}

impl Default for MokaCacheStore {
    fn default() -> Self {
        Self::new(10_000)
    }
}

#[async_trait]
impl CacheStore for MokaCacheStore {
    async fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.get(key).await.map(|v| v.bytes.as_ref().clone())
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) {
        let value = CachedValue {
            bytes: Arc::new(value),
            ttl,
        };
        self.entries.insert(key.to_string(), value).await;
    }

    async fn invalidate(&self, key: &str) {
        self.entries.invalidate(key).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        id: i64,
        name: String,
    }

    #[test]
    fn test_application_key() {
        assert_eq!(application_key(42), "application:42:info");
    }

    #[test]
    fn test_cbor_roundtrip_and_garbage() {
        let sample = Sample {
            id: 1,
            name: "Ivan".to_string(),
        };
        let bytes = encode(&sample).unwrap();
        assert_eq!(decode::<Sample>(&bytes).unwrap(), sample);
        assert!(decode::<Sample>(&[0xff, 0x00]).is_err());
    }

    #[tokio::test]
    async fn test_set_get_invalidate() {
        let cache = MokaCacheStore::default();
        cache.set("k", vec![1, 2, 3], Duration::from_secs(60)).await;
        assert_eq!(cache.get("k").await, Some(vec![1, 2, 3]));
        cache.invalidate("k").await;
        assert_eq!(cache.get("k").await, None);
    }

    #[tokio::test]
    async fn test_entries_expire_individually() {
        let cache = MokaCacheStore::default();
        cache.set("short", vec![1], Duration::from_millis(50)).await;
        cache.set("long", vec![2], Duration::from_secs(60)).await;
        tokio::time::sleep(Duration::from_millis(120)).await;
        assert_eq!(cache.get("short").await, None);
        assert_eq!(cache.get("long").await, Some(vec![2]));
    }
}
