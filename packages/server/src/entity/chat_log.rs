use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One logged chat interaction.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(schema_name = "chat_service", table_name = "logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,

    pub conversation_id: String,
    pub user_id: String,
    pub session_id: Option<String>,

    /// Free-form interaction payload, see `chatlog_common::LogPayload`.
    #[sea_orm(column_type = "JsonBinary")]
    pub log_data: Json,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
