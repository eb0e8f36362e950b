use std::future::Future;
use std::sync::Arc;

use chatlog_common::PayloadEnricher;
use chatlog_common::storage::{ImageStore, StorageError};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::models::record::Page;
use crate::store::{ChatRecord, NewChatRecord, RecordStore, StoreError};

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("chat record {0} not found")]
    NotFound(i64),
    #[error("{0}")]
    Invalid(String),
    #[error("request was cancelled")]
    Cancelled,
    #[error("image upload failed: {0}")]
    Upload(StorageError),
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for RecordError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => RecordError::NotFound(id),
            other => RecordError::Store(other),
        }
    }
}

/// An image submitted together with a new record.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub content: Vec<u8>,
}

/// Chat record retrieval with image URL enrichment.
///
/// Every operation observes `cancel`: once it fires the operation returns
/// [`RecordError::Cancelled`] and nothing partially enriched is handed out.
#[derive(Clone)]
pub struct ChatRecordService {
    store: Arc<dyn RecordStore>,
    enricher: PayloadEnricher,
    images: ImageStore,
}

impl ChatRecordService {
    pub fn new(
        store: Arc<dyn RecordStore>,
        enricher: PayloadEnricher,
        images: ImageStore,
    ) -> Self {
        Self {
            store,
            enricher,
            images,
        }
    }

    /// Fetch a record and resolve the image references in its payload.
    ///
    /// The stored row is never modified; URLs are written into the returned copy.
    pub async fn get_record(
        &self,
        id: i64,
        cancel: &CancellationToken,
    ) -> Result<ChatRecord, RecordError> {
        info!("Retrieving chat record with ID: {id}");

        let mut record = cancellable(cancel, self.store.get_by_id(id)).await??;
        let payload = std::mem::take(&mut record.log_data);
        record.log_data = cancellable(cancel, self.enricher.enrich(payload)).await?;

        info!(
            "Successfully retrieved chat record: ID={}, ConversationID={}",
            record.id, record.conversation_id
        );
        Ok(record)
    }

    /// A page of records, newest first, as stored (no enrichment).
    pub async fn list_records(
        &self,
        page: Page,
        cancel: &CancellationToken,
    ) -> Result<(Vec<ChatRecord>, u64), RecordError> {
        info!(
            "Retrieving chat records with limit: {}, offset: {}",
            page.limit, page.offset
        );

        let (records, total) =
            cancellable(cancel, self.store.list(page.limit, page.offset)).await??;

        info!(
            "Successfully retrieved {} chat records, total: {total}",
            records.len()
        );
        Ok((records, total))
    }

    /// Persist a new record after checking its identifiers.
    ///
    /// A non-empty `image` is uploaded first and referenced from `log_data.image_ref`,
    /// replacing any reference the caller supplied. Nothing is stored if the upload fails.
    pub async fn create_record(
        &self,
        mut record: NewChatRecord,
        image: Option<ImageUpload>,
        cancel: &CancellationToken,
    ) -> Result<ChatRecord, RecordError> {
        record.user_id = required(record.user_id, "user_id")?;
        record.conversation_id = required(record.conversation_id, "conversation_id")?;
        record.session_id = record
            .session_id
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        if let Some(image) = image.filter(|i| !i.content.is_empty()) {
            let upload = self.images.upload(
                &record.user_id,
                record.session_id.as_deref(),
                &image.filename,
                &image.content,
            );
            let key = cancellable(cancel, upload)
                .await?
                .map_err(RecordError::Upload)?;
            record.log_data.set_image_ref(self.images.bucket(), &key);
        }

        info!(
            "Saving chat record: UserID={}, ConversationID={}, SessionID={:?}",
            record.user_id, record.conversation_id, record.session_id
        );

        let saved = cancellable(cancel, self.store.create(record)).await??;

        info!("Successfully saved chat record with ID: {}", saved.id);
        Ok(saved)
    }
}

fn required(value: String, field: &str) -> Result<String, RecordError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(RecordError::Invalid(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

async fn cancellable<F: Future>(
    cancel: &CancellationToken,
    fut: F,
) -> Result<F::Output, RecordError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(RecordError::Cancelled),
        out = fut => Ok(out),
    }
}
