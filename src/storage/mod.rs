//! Object store seam for the listing proxy.
//!
//! - `S3Store`: production store over one shared `aws_sdk_s3::Client`
//! - `MemoryStore`: in-process store for local development and tests

pub mod memory;
pub mod s3;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::config::{StorageConfig, StoreBackend};
use crate::types::PageResult;

pub use memory::MemoryStore;
pub use s3::S3Store;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("No bucket is configured for listing")]
    BucketNotConfigured,

    /// Failure reported by the store; the text is relayed to the caller
    #[error("{0}")]
    Service(String),
}

/// A paginated object listing, one page per call.
///
/// Implementations hold no per-request state and are shared across
/// concurrent invocations.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List one page of `bucket`. `None` starts from the beginning; otherwise
    /// the token is passed through to the store unchanged.
    async fn list_page(
        &self,
        bucket: &str,
        continuation_token: Option<&str>,
    ) -> Result<PageResult, StoreError>;
}

/// Construct the configured store once at startup
pub async fn build_store(config: &StorageConfig) -> Arc<dyn ObjectStore> {
    match config.backend {
        StoreBackend::S3 => {
            tracing::info!(
                "Using S3 store (bucket '{}', endpoint {})",
                config.bucket,
                config.endpoint_url.as_deref().unwrap_or("default")
            );
            Arc::new(S3Store::connect(config).await)
        }
        StoreBackend::Memory => {
            tracing::info!("Using in-memory store (page size {})", config.memory_page_size);
            let store = MemoryStore::new(config.memory_page_size);
            if !config.bucket.is_empty() {
                if let Err(e) = store.create_bucket(&config.bucket) {
                    tracing::warn!("Could not create in-memory bucket '{}': {}", config.bucket, e);
                }
            }
            Arc::new(store)
        }
    }
}
