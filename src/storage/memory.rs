use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;
use std::sync::RwLock;

use super::{ObjectStore, StoreError};
use crate::types::{ObjectDescriptor, PageResult};

/// In-process store with S3-like pagination. Keys list in lexicographic
/// order; the continuation token is the last key of the previous page.
#[derive(Debug)]
pub struct MemoryStore {
    buckets: RwLock<HashMap<String, BTreeMap<String, ObjectDescriptor>>>,
    page_size: usize,
}

impl MemoryStore {
    pub fn new(page_size: usize) -> Self {
        Self {
            buckets: RwLock::new(HashMap::new()),
            page_size: page_size.max(1),
        }
    }

    /// Add or replace an object; the bucket is created on first insert
    pub fn insert(&self, bucket: &str, object: ObjectDescriptor) -> Result<(), StoreError> {
        let Some(key) = object.key.clone() else {
            return Err(StoreError::Service("object key is required".to_string()));
        };

        let mut buckets = self
            .buckets
            .write()
            .map_err(|_| StoreError::Service("memory store lock poisoned".to_string()))?;
        buckets.entry(bucket.to_string()).or_default().insert(key, object);
        Ok(())
    }

    pub fn create_bucket(&self, bucket: &str) -> Result<(), StoreError> {
        let mut buckets = self
            .buckets
            .write()
            .map_err(|_| StoreError::Service("memory store lock poisoned".to_string()))?;
        buckets.entry(bucket.to_string()).or_default();
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list_page(
        &self,
        bucket: &str,
        continuation_token: Option<&str>,
    ) -> Result<PageResult, StoreError> {
        if bucket.is_empty() {
            return Err(StoreError::BucketNotConfigured);
        }

        let buckets = self
            .buckets
            .read()
            .map_err(|_| StoreError::Service("memory store lock poisoned".to_string()))?;
        let objects = buckets
            .get(bucket)
            .ok_or_else(|| StoreError::Service("The specified bucket does not exist".to_string()))?;

        let start = match continuation_token {
            Some(token) => Bound::Excluded(token.to_string()),
            None => Bound::Unbounded,
        };

        let mut remaining = objects.range((start, Bound::Unbounded));
        let contents: Vec<ObjectDescriptor> =
            remaining.by_ref().take(self.page_size).map(|(_, o)| o.clone()).collect();

        let next_continuation_token = match remaining.next() {
            Some(_) => contents.last().and_then(|o| o.key.clone()),
            None => None,
        };

        Ok(PageResult {
            contents,
            next_continuation_token,
        })
    }
}
