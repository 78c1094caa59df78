use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use aws_config::BehaviorVersion;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::operation::list_objects_v2::ListObjectsV2Error;
use aws_sdk_s3::types::Object;
use aws_sdk_s3::Client;

use super::{ObjectStore, StoreError};
use crate::config::StorageConfig;
use crate::types::{ObjectDescriptor, PageResult};

/// S3-backed store. The client is built once and cloned cheaply; it pools
/// connections internally.
#[derive(Debug, Clone)]
pub struct S3Store {
    client: Client,
}

impl S3Store {
    /// Build a client from the default credential chain (env, profile, IMDS,
    /// Lambda execution role). An endpoint override switches to path-style
    /// addressing, which LocalStack and MinIO expect.
    pub async fn connect(config: &StorageConfig) -> Self {
        let shared = aws_config::load_defaults(BehaviorVersion::latest()).await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = &config.endpoint_url {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Self {
            client: Client::from_conf(builder.build()),
        }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn list_page(
        &self,
        bucket: &str,
        continuation_token: Option<&str>,
    ) -> Result<PageResult, StoreError> {
        if bucket.is_empty() {
            return Err(StoreError::BucketNotConfigured);
        }

        let output = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .set_continuation_token(continuation_token.map(str::to_owned))
            .send()
            .await
            .map_err(|e| {
                let message = describe_list_error(&e);
                tracing::error!("ListObjectsV2 on '{}' failed: {}", bucket, DisplayErrorContext(&e));
                StoreError::Service(message)
            })?;

        Ok(PageResult {
            contents: output.contents().iter().map(descriptor_from).collect(),
            next_continuation_token: output.next_continuation_token().map(str::to_owned),
        })
    }
}

fn descriptor_from(object: &Object) -> ObjectDescriptor {
    ObjectDescriptor {
        key: object.key().map(str::to_owned),
        last_modified: object
            .last_modified()
            .and_then(|ts| format_last_modified(ts.secs(), ts.subsec_nanos())),
        e_tag: object.e_tag().map(str::to_owned),
        size: object.size(),
        storage_class: object.storage_class().map(|c| c.as_str().to_owned()),
    }
}

/// Millisecond RFC 3339, the form the JavaScript SDK serializes `Date`s in
fn format_last_modified(secs: i64, nanos: u32) -> Option<String> {
    DateTime::<Utc>::from_timestamp(secs, nanos).map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Prefer the service's own message ("Access Denied", "The specified bucket
/// does not exist"); transport failures fall back to the full error chain.
fn describe_list_error<R>(err: &SdkError<ListObjectsV2Error, R>) -> String
where
    R: std::fmt::Debug + 'static,
{
    match err.as_service_error().and_then(|e| e.message()) {
        Some(message) => message.to_string(),
        None => DisplayErrorContext(err).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_modified_keeps_milliseconds() {
        // 2024-05-01T12:00:00Z
        assert_eq!(format_last_modified(1_714_564_800, 0).as_deref(), Some("2024-05-01T12:00:00.000Z"));
        assert_eq!(
            format_last_modified(1_714_564_800, 250_000_000).as_deref(),
            Some("2024-05-01T12:00:00.250Z")
        );
    }

    #[test]
    fn test_descriptor_relays_listing_fields() {
        let object = Object::builder()
            .key("guides/intake.pdf")
            .e_tag("\"abc\"")
            .size(4096)
            .build();

        let descriptor = descriptor_from(&object);
        assert_eq!(descriptor.key.as_deref(), Some("guides/intake.pdf"));
        assert_eq!(descriptor.e_tag.as_deref(), Some("\"abc\""));
        assert_eq!(descriptor.size, Some(4096));
        assert_eq!(descriptor.last_modified, None);
    }
}
