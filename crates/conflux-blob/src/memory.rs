use std::collections::BTreeMap;
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use conflux_store::{StoreError, StoreResult};

use crate::client::{BlobClient, ObjectMeta};

struct StoredBlob {
    bytes: Vec<u8>,
    created: DateTime<Utc>,
}

/// In-memory blob client.
///
/// Intended for tests and embedding. Objects live in a `BTreeMap`, so
/// listings come back in name order. Tests can plant objects with chosen
/// creation times via [`MemoryBlobClient::insert_object`] to drive read
/// policies, and an injected latency makes every call slow enough to trip
/// operation timeouts.
#[derive(Default)]
pub struct MemoryBlobClient {
    objects: RwLock<BTreeMap<String, StoredBlob>>,
    latency: Option<Duration>,
}

impl MemoryBlobClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every client call by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Plant an object with an explicit creation time.
    pub fn insert_object(&self, name: impl Into<String>, bytes: Vec<u8>, created: DateTime<Utc>) {
        self.objects
            .write()
            .expect("lock poisoned")
            .insert(name.into(), StoredBlob { bytes, created });
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.read().expect("lock poisoned").len()
    }

    /// Returns `true` if no objects are stored.
    pub fn is_empty(&self) -> bool {
        self.objects.read().expect("lock poisoned").is_empty()
    }

    async fn pause(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl BlobClient for MemoryBlobClient {
    async fn list_objects(&self, prefix: &str) -> StoreResult<Vec<ObjectMeta>> {
        self.pause().await;
        let map = self.objects.read().expect("lock poisoned");
        Ok(map
            .iter()
            .filter(|(name, _)| name.starts_with(prefix))
            .map(|(name, blob)| ObjectMeta::new(name.clone(), blob.created))
            .collect())
    }

    async fn list_prefixes(&self, prefix: &str) -> StoreResult<Vec<String>> {
        self.pause().await;
        let map = self.objects.read().expect("lock poisoned");
        Ok(crate::client::rollup_prefixes(
            map.keys().map(String::as_str),
            prefix,
        ))
    }

    async fn read_object(&self, name: &str) -> StoreResult<Vec<u8>> {
        self.pause().await;
        let map = self.objects.read().expect("lock poisoned");
        map.get(name)
            .map(|blob| blob.bytes.clone())
            .ok_or_else(|| StoreError::Backend(format!("object not found: {name}")))
    }

    async fn write_object(&self, name: &str, bytes: Vec<u8>) -> StoreResult<()> {
        self.pause().await;
        let mut map = self.objects.write().expect("lock poisoned");
        map.insert(
            name.to_owned(),
            StoredBlob {
                bytes,
                created: Utc::now(),
            },
        );
        Ok(())
    }
}
