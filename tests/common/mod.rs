#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use abe_proxy::auth::{IdentityClaims, RolePolicy};
use abe_proxy::storage::{ObjectStore, StoreError};
use abe_proxy::types::{ObjectDescriptor, PageResult};
use abe_proxy::ListingProxy;

pub const BUCKET: &str = "abe-knowledge-test";
pub const SECRET: &str = "integration-test-secret";

/// Store double that records every call and replays a scripted outcome
pub struct RecordingStore {
    outcome: Result<PageResult, StoreError>,
    calls: Mutex<Vec<(String, Option<String>)>>,
}

impl RecordingStore {
    pub fn returning(page: PageResult) -> Arc<Self> {
        Arc::new(Self {
            outcome: Ok(page),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            outcome: Err(StoreError::Service(message.to_string())),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// (bucket, continuation token) for each listing call, in order
    pub fn calls(&self) -> Vec<(String, Option<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for RecordingStore {
    async fn list_page(
        &self,
        bucket: &str,
        continuation_token: Option<&str>,
    ) -> Result<PageResult, StoreError> {
        self.calls
            .lock()
            .unwrap()
            .push((bucket.to_string(), continuation_token.map(str::to_owned)));
        self.outcome.clone()
    }
}

pub fn proxy_over(store: Arc<RecordingStore>) -> ListingProxy {
    ListingProxy::new(store, BUCKET, RolePolicy::default())
}

/// Claims with the role list JSON-encoded under `custom:role`
pub fn claims_with_roles(roles: &[&str]) -> IdentityClaims {
    let encoded = serde_json::to_string(roles).unwrap();
    IdentityClaims::from_iter([
        ("sub".to_string(), json!("user-123")),
        ("custom:role".to_string(), Value::String(encoded)),
    ])
}

pub fn claims_with_raw_role(raw: &str) -> IdentityClaims {
    IdentityClaims::from_iter([("custom:role".to_string(), Value::String(raw.to_string()))])
}

pub fn object(key: &str, size: i64) -> ObjectDescriptor {
    ObjectDescriptor {
        key: Some(key.to_string()),
        last_modified: Some("2024-05-01T12:00:00.000Z".to_string()),
        e_tag: Some(format!("\"etag-{}\"", key)),
        size: Some(size),
        storage_class: Some("STANDARD".to_string()),
    }
}

pub fn two_object_page() -> PageResult {
    PageResult {
        contents: vec![object("policies/a.pdf", 1024), object("policies/b.pdf", 2048)],
        next_continuation_token: None,
    }
}
