use std::path::Path;
use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::error::StorageError;
use super::traits::ObjectUploader;

/// Uploads chat images into the default bucket.
///
/// Objects are named `{user_id}/{session_id}/{uuid}{ext}` (or `{user_id}/{uuid}{ext}`
/// without a session) so uploads never collide.
#[derive(Clone)]
pub struct ImageStore {
    bucket: String,
    uploader: Arc<dyn ObjectUploader>,
}

impl ImageStore {
    pub fn new(bucket: impl Into<String>, uploader: Arc<dyn ObjectUploader>) -> Self {
        Self {
            bucket: bucket.into(),
            uploader,
        }
    }

    /// Bucket every upload lands in.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Upload `content` and return the object name it was stored under.
    pub async fn upload(
        &self,
        user_id: &str,
        session_id: Option<&str>,
        filename: &str,
        content: &[u8],
    ) -> Result<String, StorageError> {
        let object_name = object_name_for(user_id, session_id, filename);
        let content_type = mime_guess::from_path(filename).first_or_octet_stream();

        self.uploader
            .put_object(
                &self.bucket,
                &object_name,
                content,
                content_type.essence_str(),
            )
            .await?;

        info!(bucket = %self.bucket, object_name, "Stored chat image");
        Ok(object_name)
    }
}

/// Fresh object name for an image uploaded as `filename`. Only the extension is kept.
pub fn object_name_for(user_id: &str, session_id: Option<&str>, filename: &str) -> String {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();
    let id = Uuid::new_v4();

    match session_id {
        Some(session_id) => format!("{user_id}/{session_id}/{id}{ext}"),
        None => format!("{user_id}/{id}{ext}"),
    }
}
