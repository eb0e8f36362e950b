use std::time::Duration;

use async_trait::async_trait;
use s3::bucket_ops::BucketConfiguration;
use s3::creds::Credentials;
use s3::{Bucket, Region};
use tracing::info;

use super::error::StorageError;
use super::traits::{ObjectSigner, ObjectUploader};
use crate::config::StorageConfig;

/// Maximum presign lifetime accepted by SigV4 (7 days).
const MAX_PRESIGN_SECS: u64 = 7 * 24 * 60 * 60;

/// S3-compatible object store (MinIO, AWS S3) using path-style addressing.
///
/// Holds only region and credentials; a bucket handle is built per call so one
/// store serves every bucket an image reference may name.
#[derive(Clone)]
pub struct S3ObjectStore {
    region: Region,
    credentials: Credentials,
}

impl S3ObjectStore {
    pub fn new(config: &StorageConfig) -> Result<Self, StorageError> {
        config.validate()?;

        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| StorageError::Credentials(e.to_string()))?;

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: endpoint_url(&config.endpoint),
        };

        Ok(Self {
            region,
            credentials,
        })
    }

    fn bucket(&self, name: &str) -> Result<Box<Bucket>, StorageError> {
        Ok(Bucket::new(name, self.region.clone(), self.credentials.clone())?.with_path_style())
    }

    /// Create `name` if it does not exist. Returns `true` when the bucket was created.
    pub async fn ensure_bucket(&self, name: &str) -> Result<bool, StorageError> {
        if self.bucket(name)?.exists().await? {
            info!(bucket = name, "Object storage bucket exists");
            return Ok(false);
        }

        Bucket::create_with_path_style(
            name,
            self.region.clone(),
            self.credentials.clone(),
            BucketConfiguration::default(),
        )
        .await?;
        info!(bucket = name, "Created object storage bucket");
        Ok(true)
    }
}

#[async_trait]
impl ObjectSigner for S3ObjectStore {
    async fn presign_get(
        &self,
        bucket: &str,
        object_name: &str,
        expires_in: Duration,
    ) -> Result<String, StorageError> {
        let signing_error = |reason: String| StorageError::Signing {
            bucket: bucket.to_string(),
            object_name: object_name.to_string(),
            reason,
        };

        let secs = expires_in.as_secs();
        if secs == 0 || secs > MAX_PRESIGN_SECS {
            return Err(signing_error(format!(
                "expiry must be between 1 and {MAX_PRESIGN_SECS} seconds, got {secs}"
            )));
        }

        self.bucket(bucket)?
            .presign_get(object_name, secs as u32, None)
            .await
            .map_err(|e| signing_error(e.to_string()))
    }
}

#[async_trait]
impl ObjectUploader for S3ObjectStore {
    async fn put_object(
        &self,
        bucket: &str,
        object_name: &str,
        content: &[u8],
        content_type: &str,
    ) -> Result<(), StorageError> {
        let response = self
            .bucket(bucket)?
            .put_object_with_content_type(object_name, content, content_type)
            .await?;

        // Built without `fail-on-err`, so error statuses come back as responses.
        let status = response.status_code();
        if !(200..300).contains(&status) {
            return Err(StorageError::Backend(format!(
                "upload of {bucket}/{object_name} returned HTTP {status}"
            )));
        }

        info!(bucket, object_name, size = content.len(), "Uploaded object");
        Ok(())
    }
}

/// Endpoints without a scheme are plain HTTP, matching a MinIO `host:port` setting.
fn endpoint_url(endpoint: &str) -> String {
    let endpoint = endpoint.trim().trim_end_matches('/');
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.to_string()
    } else {
        format!("http://{endpoint}")
    }
}
