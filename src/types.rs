//! Listing types shared by the proxy core, the stores, and both hosting surfaces

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Pagination request recovered from the invocation body.
///
/// Both fields are optional; an absent continuation token means "list from
/// the start". `page_index` is accepted for client compatibility and carries
/// no listing behavior.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continuation_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_index: Option<i64>,
}

impl PageRequest {
    /// Decode a request body. Malformed JSON is logged and degrades to an
    /// empty request rather than failing the invocation. Fields are read one
    /// by one so a bad `pageIndex` never costs the continuation token.
    pub fn from_body(body: Option<&str>) -> Self {
        let Some(body) = body.filter(|b| !b.trim().is_empty()) else {
            return Self::default();
        };

        let value = match serde_json::from_str::<Value>(body) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Ignoring unparseable listing request body: {}", e);
                return Self::default();
            }
        };

        let continuation_token = match value.get("continuationToken") {
            None | Some(Value::Null) => None,
            Some(Value::String(token)) => Some(token.clone()),
            Some(other) => {
                tracing::warn!("Ignoring non-string continuationToken: {}", other);
                None
            }
        };

        Self {
            continuation_token,
            page_index: value.get("pageIndex").and_then(Value::as_i64),
        }
    }
}

/// One object as reported by the store, using the store's wire names.
///
/// This is the subset of the ListObjectsV2 entry the admin page reads:
/// `ChecksumAlgorithm`, `Owner` and `RestoreStatus` are not relayed.
/// `LastModified` is RFC 3339 in UTC with millisecond precision
/// (`2024-05-01T12:00:00.000Z`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectDescriptor {
    #[serde(rename = "Key", skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(rename = "LastModified", skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    #[serde(rename = "ETag", skip_serializing_if = "Option::is_none")]
    pub e_tag: Option<String>,
    #[serde(rename = "Size", skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    #[serde(rename = "StorageClass", skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,
}

impl ObjectDescriptor {
    pub fn with_key(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            ..Self::default()
        }
    }
}

/// One page of a listing. A missing `next_continuation_token` marks the end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult {
    #[serde(rename = "Contents")]
    pub contents: Vec<ObjectDescriptor>,
    #[serde(rename = "NextContinuationToken", skip_serializing_if = "Option::is_none")]
    pub next_continuation_token: Option<String>,
}
