use tokio_util::sync::CancellationToken;

use crate::config::AppConfig;
use crate::service::ChatRecordService;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub records: ChatRecordService,
    /// Cancelled when the server begins shutting down; each request runs under a child token.
    pub shutdown: CancellationToken,
}
