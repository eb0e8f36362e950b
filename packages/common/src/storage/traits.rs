use std::time::Duration;

use async_trait::async_trait;

use super::error::StorageError;

/// Issues time-limited read URLs for objects addressed by `(bucket, object_name)`.
#[async_trait]
pub trait ObjectSigner: Send + Sync {
    /// Produce a presigned GET URL valid for `expires_in`.
    async fn presign_get(
        &self,
        bucket: &str,
        object_name: &str,
        expires_in: Duration,
    ) -> Result<String, StorageError>;
}

/// Writes objects into a bucket.
#[async_trait]
pub trait ObjectUploader: Send + Sync {
    /// Store `content` at `(bucket, object_name)`, replacing any existing object.
    async fn put_object(
        &self,
        bucket: &str,
        object_name: &str,
        content: &[u8],
        content_type: &str,
    ) -> Result<(), StorageError>;
}
