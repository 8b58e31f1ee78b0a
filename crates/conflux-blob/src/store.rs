use std::future::Future;

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;
use conflux_compress::Compressor;
use conflux_store::{EventStore, StoreError, StoreResult};
use conflux_types::{Context, Message};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::client::BlobClient;
use crate::config::{BlobStoreConfig, Operation};
use crate::path::{compose_path, parse_path};
use crate::policy::ReadPolicy;

/// [`EventStore`] over blob storage.
///
/// Content is compressed, then stored under
/// `[folder/]key/source/<base64url(sha256(compressed))>`. The digest name
/// makes writes collision-free: concurrent persists to one slot land as
/// separate objects, and the read policy picks the winner at read time.
///
/// Every operation runs inside the sooner of its configured budget and the
/// ambient [`Context`] deadline.
pub struct BlobEventStore<C> {
    client: C,
    config: BlobStoreConfig,
    policy: Box<dyn ReadPolicy>,
    compressor: Box<dyn Compressor>,
}

impl<C: BlobClient> BlobEventStore<C> {
    /// Build a store over `client`.
    ///
    /// The read policy and compressor are deliberately explicit arguments:
    /// both change what a reader observes, so the choice belongs to the
    /// deployment, not to a library default.
    pub fn new(
        client: C,
        config: BlobStoreConfig,
        policy: impl ReadPolicy + 'static,
        compressor: impl Compressor + 'static,
    ) -> Self {
        Self {
            client,
            config,
            policy: Box::new(policy),
            compressor: Box::new(compressor),
        }
    }

    pub fn config(&self) -> &BlobStoreConfig {
        &self.config
    }

    /// Run `work` bounded by the operation budget and the ambient deadline.
    async fn bounded<T>(
        &self,
        ctx: &Context,
        operation: Operation,
        work: impl Future<Output = StoreResult<T>>,
    ) -> StoreResult<T> {
        let budget = self.config.timeouts().timeout_for(operation);
        let deadline = tokio::time::Instant::from_std(ctx.deadline_within(budget));
        match tokio::time::timeout_at(deadline, work).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::timeout(operation.to_string())),
        }
    }

    /// List the slot's objects, let the read policy pick one, read and
    /// decompress it. `None` when the slot holds nothing.
    async fn read_slot(&self, slot: &str) -> StoreResult<Option<Vec<u8>>> {
        let prefix = format!("{}/", slot.trim_end_matches('/'));
        let candidates = self.client.list_objects(&prefix).await?;
        let winner = self.policy.select(&mut candidates.into_iter().map(Ok))?;
        let Some(winner) = winner else {
            return Ok(None);
        };
        let compressed = self.client.read_object(&winner.name).await?;
        Ok(Some(self.compressor.decompress(&compressed)?))
    }
}

#[async_trait]
impl<C: BlobClient> EventStore for BlobEventStore<C> {
    async fn persist(
        &self,
        ctx: &Context,
        key: &str,
        source: &str,
        content: &str,
    ) -> StoreResult<()> {
        let slot = compose_path(self.config.folder(), &[key, source]);
        self.bounded(ctx, Operation::Write, async {
            let compressed = self.compressor.compress(content.as_bytes())?;
            let digest = Sha256::digest(&compressed);
            let name = format!("{slot}/{}", URL_SAFE.encode(digest));
            self.client.write_object(&name, compressed).await?;
            debug!(slot = %slot, "event persisted");
            Ok(())
        })
        .await
    }

    async fn look_up(
        &self,
        ctx: &Context,
        key: &str,
        source: &str,
    ) -> StoreResult<Option<Message>> {
        let slot = compose_path(self.config.folder(), &[key, source]);
        let content = self
            .bounded(ctx, Operation::Read, self.read_slot(&slot))
            .await?;
        match content {
            None => Ok(None),
            Some(bytes) => {
                let text = String::from_utf8(bytes).map_err(|e| {
                    StoreError::Backend(format!("stored content is not valid UTF-8: {e}"))
                })?;
                Ok(Some(Message::new(key, source, text)))
            }
        }
    }

    async fn look_up_by_key(&self, ctx: &Context, key: &str) -> StoreResult<Vec<Message>> {
        let sources = self.list_sources_by_key(ctx, key).await?;
        let mut messages = Vec::with_capacity(sources.len());
        for source in sources {
            // A slot listed a moment ago may hold nothing by read time.
            if let Some(message) = self.look_up(ctx, key, &source).await? {
                messages.push(message);
            }
        }
        Ok(messages)
    }

    async fn list_sources_by_key(&self, ctx: &Context, key: &str) -> StoreResult<Vec<String>> {
        let prefix = format!("{}/", compose_path(self.config.folder(), &[key]));
        let listed = self
            .bounded(ctx, Operation::List, self.client.list_prefixes(&prefix))
            .await?;
        let mut sources = Vec::new();
        for entry in listed {
            let (_, source) = parse_path(&entry)?;
            if !sources.contains(&source) {
                sources.push(source);
            }
        }
        Ok(sources)
    }
}
