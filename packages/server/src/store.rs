use async_trait::async_trait;
use chatlog_common::LogPayload;
use chatlog_common::payload::PayloadError;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryOrder,
    QuerySelect, Set,
};
use serde::Serialize;
use thiserror::Error;

use crate::entity::chat_log;

/// A persisted chat interaction.
#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct ChatRecord {
    #[schema(example = 42)]
    pub id: i64,
    pub conversation_id: String,
    pub user_id: String,
    pub session_id: Option<String>,
    /// Free-form payload. Image references inside it are resolved to URLs on fetch.
    #[schema(value_type = Object)]
    pub log_data: LogPayload,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied by the caller when logging a new interaction.
#[derive(Debug, Clone)]
pub struct NewChatRecord {
    pub user_id: String,
    pub conversation_id: String,
    pub session_id: Option<String>,
    pub log_data: LogPayload,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("chat record {0} not found")]
    NotFound(i64),
    #[error("chat record {id} has a malformed payload: {source}")]
    CorruptPayload {
        id: i64,
        #[source]
        source: PayloadError,
    },
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

/// Persistence of chat records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch one record by id.
    async fn get_by_id(&self, id: i64) -> Result<ChatRecord, StoreError>;

    /// Fetch a page of records, newest first, together with the total count.
    async fn list(&self, limit: u64, offset: u64) -> Result<(Vec<ChatRecord>, u64), StoreError>;

    /// Persist a new record. Id and creation time are assigned by the store.
    async fn create(&self, record: NewChatRecord) -> Result<ChatRecord, StoreError>;
}

impl TryFrom<chat_log::Model> for ChatRecord {
    type Error = StoreError;

    fn try_from(m: chat_log::Model) -> Result<Self, Self::Error> {
        let log_data = LogPayload::try_from(m.log_data)
            .map_err(|source| StoreError::CorruptPayload { id: m.id, source })?;
        Ok(Self {
            id: m.id,
            conversation_id: m.conversation_id,
            user_id: m.user_id,
            session_id: m.session_id,
            log_data,
            created_at: m.created_at,
        })
    }
}

/// [`RecordStore`] backed by the `chat_service.logs` table.
#[derive(Clone)]
pub struct SeaOrmRecordStore {
    db: DatabaseConnection,
}

impl SeaOrmRecordStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RecordStore for SeaOrmRecordStore {
    async fn get_by_id(&self, id: i64) -> Result<ChatRecord, StoreError> {
        chat_log::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(StoreError::NotFound(id))?
            .try_into()
    }

    async fn list(&self, limit: u64, offset: u64) -> Result<(Vec<ChatRecord>, u64), StoreError> {
        let total = chat_log::Entity::find().count(&self.db).await?;

        let records = chat_log::Entity::find()
            .order_by_desc(chat_log::Column::CreatedAt)
            .order_by_desc(chat_log::Column::Id)
            .offset(Some(offset))
            .limit(Some(limit))
            .all(&self.db)
            .await?
            .into_iter()
            .map(ChatRecord::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((records, total))
    }

    async fn create(&self, record: NewChatRecord) -> Result<ChatRecord, StoreError> {
        let model = chat_log::ActiveModel {
            conversation_id: Set(record.conversation_id),
            user_id: Set(record.user_id),
            session_id: Set(record.session_id),
            log_data: Set(record.log_data.into_value()),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        model.insert(&self.db).await?.try_into()
    }
}
