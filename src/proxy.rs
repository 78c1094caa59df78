// proxy.rs - the authorized listing proxy
//
// Shared by the Lambda surface and the local server. Three terminal outcomes:
// forbidden / authorization error, or the listing result (success or store
// error). Every outcome is a ProxyResponse carrying the open CORS header.

use std::sync::Arc;

use crate::auth::{IdentityClaims, RolePolicy};
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::middleware::response::ProxyResponse;
use crate::storage::ObjectStore;
use crate::types::PageRequest;

#[derive(Clone)]
pub struct ListingProxy {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    policy: RolePolicy,
}

impl std::fmt::Debug for ListingProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListingProxy")
            .field("bucket", &self.bucket)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl ListingProxy {
    pub fn new(store: Arc<dyn ObjectStore>, bucket: impl Into<String>, policy: RolePolicy) -> Self {
        Self {
            store,
            bucket: bucket.into(),
            policy,
        }
    }

    pub fn from_config(store: Arc<dyn ObjectStore>, config: &AppConfig) -> Self {
        Self::new(store, &config.storage.bucket, RolePolicy::from_config(&config.auth))
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Authorize, decode the page request, list one page, shape the response
    pub async fn handle(&self, claims: Option<&IdentityClaims>, body: Option<&str>) -> ProxyResponse {
        // Any failure reading claims denies before the store is touched
        if let Err(err) = self.policy.authorize(claims) {
            let subject = claims.and_then(IdentityClaims::subject).unwrap_or("<unknown>");
            let denial = ApiError::from_authorization(&err, self.policy.claim());
            tracing::warn!(code = denial.error_code(), "Listing denied for {}: {}", subject, err);
            return denial.into();
        }

        let request = PageRequest::from_body(body);
        tracing::debug!(
            "Listing bucket '{}' (continuation token: {}, page index: {:?})",
            self.bucket,
            if request.continuation_token.is_some() { "present" } else { "none" },
            request.page_index
        );

        match self
            .store
            .list_page(&self.bucket, request.continuation_token.as_deref())
            .await
        {
            Ok(page) => {
                tracing::info!(
                    "Listed {} object(s) from '{}' (more: {})",
                    page.contents.len(),
                    self.bucket,
                    page.next_continuation_token.is_some()
                );
                ProxyResponse::ok(&page)
            }
            Err(e) => {
                tracing::error!("Listing bucket '{}' failed: {}", self.bucket, e);
                ApiError::from(e).into()
            }
        }
    }
}
