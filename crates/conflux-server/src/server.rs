use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use conflux_blob::{BlobEventStore, BlobStoreConfig, FsBlobClient, TakeLastCreated};
use conflux_compress::Zstd;
use conflux_handlers::{Cache, Joiner, MatchAll};
use conflux_pipeline::Pipeline;
use conflux_store::{EventStore, InMemoryEventStore};

use crate::config::{ServerConfig, StoreConfig};
use crate::emit::LogEmitter;
use crate::error::{ServerError, ServerResult};
use crate::router::{build_router, AppState};

/// The Conflux ingestion server.
pub struct ConfluxServer {
    config: ServerConfig,
    pipeline: Pipeline,
}

impl ConfluxServer {
    /// Serve an embedder-assembled pipeline.
    pub fn new(config: ServerConfig, pipeline: Pipeline) -> Self {
        Self { config, pipeline }
    }

    /// The stock chain: deduplicate, join once every configured source has
    /// reported, log what composes. Storage follows `config.store`.
    pub fn with_default_pipeline(config: ServerConfig) -> Self {
        let store = build_store(&config.store);
        let condition = MatchAll::new(config.join_sources.iter().cloned());
        let pipeline = Pipeline::new()
            .with_handler(Cache::new(Arc::clone(&store)))
            .with_handler(Joiner::new(condition, store))
            .with_handler(LogEmitter);
        Self::new(config, pipeline)
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Builds the router for this server. Useful for tests that drive the
    /// HTTP surface without binding a socket.
    pub fn router(&self) -> axum::Router {
        build_router(AppState::new(
            self.pipeline.clone(),
            self.config.pipeline_timeout(),
        ))
    }

    /// Binds the configured address and serves until the task is dropped.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        info!("conflux server listening on {}", self.config.bind_addr);
        axum::serve(listener, app)
            .await
            .map_err(|error| ServerError::Internal(error.to_string()))
    }
}

fn build_store(store: &StoreConfig) -> Arc<dyn EventStore> {
    match store {
        StoreConfig::Memory => Arc::new(InMemoryEventStore::new()),
        StoreConfig::Blob { root } => Arc::new(BlobEventStore::new(
            FsBlobClient::new(root),
            BlobStoreConfig::new(),
            TakeLastCreated,
            Zstd::default(),
        )),
    }
}
