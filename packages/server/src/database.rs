use std::time::Duration;

use sea_orm::sea_query::{Index, PostgresQueryBuilder};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityName};
use tracing::{info, warn};

use crate::config::DatabaseConfig;
use crate::entity::chat_log;

pub async fn init_db(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(config.url.to_owned());

    // Set connection pool options
    opt.max_connections(config.max_connections)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(300))
        .sqlx_logging(false);

    let db = Database::connect(opt).await?;

    // Schema sync creates tables but not the schemas they live in.
    if let Some(schema) = chat_log::Entity.schema_name() {
        db.execute_unprepared(&format!("CREATE SCHEMA IF NOT EXISTS \"{schema}\""))
            .await?;
    }
    db.get_schema_registry("chatlog_server::entity::*")
        .sync(&db)
        .await?;

    Ok(db)
}

/// Create secondary indexes that schema sync does not derive from the entities.
///
/// Failures are logged and skipped; the service works without them, only slower.
pub async fn ensure_indexes<C: ConnectionTrait>(db: &C) {
    // Listing: ORDER BY created_at DESC LIMIT ? OFFSET ?
    let created_at = Index::create()
        .if_not_exists()
        .name("idx_logs_created_at")
        .table(chat_log::Entity.table_ref())
        .col(chat_log::Column::CreatedAt)
        .to_string(PostgresQueryBuilder);

    let conversation = Index::create()
        .if_not_exists()
        .name("idx_logs_conversation")
        .table(chat_log::Entity.table_ref())
        .col(chat_log::Column::ConversationId)
        .to_string(PostgresQueryBuilder);

    for (name, stmt) in [
        ("idx_logs_created_at", created_at),
        ("idx_logs_conversation", conversation),
    ] {
        match db.execute_unprepared(&stmt).await {
            Ok(_) => info!("Ensured index {name} exists"),
            Err(e) => warn!("Failed to create index {name}: {e}"),
        }
    }
}
