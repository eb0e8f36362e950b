use chatlog_common::LogPayload;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::store::{ChatRecord, NewChatRecord};

pub const DEFAULT_LIMIT: u64 = 50;
pub const MAX_LIMIT: u64 = 100;

#[derive(Deserialize, ToSchema)]
pub struct CreateRecordRequest {
    #[schema(example = "user-7")]
    pub user_id: String,
    #[schema(example = "3f0c8a52-7d55-4f7e-9a11-2b1f8f6d0c01")]
    pub conversation_id: String,
    #[serde(default)]
    pub session_id: Option<String>,
    /// Defaults to an empty object.
    #[serde(default)]
    #[schema(value_type = Object, required = false)]
    pub log_data: Option<LogPayload>,
}

impl From<CreateRecordRequest> for NewChatRecord {
    fn from(req: CreateRecordRequest) -> Self {
        Self {
            user_id: req.user_id,
            conversation_id: req.conversation_id,
            session_id: req.session_id,
            log_data: req.log_data.unwrap_or_default(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct RecordResponse {
    pub success: bool,
    pub data: ChatRecord,
}

impl From<ChatRecord> for RecordResponse {
    fn from(data: ChatRecord) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct RecordListResponse {
    pub success: bool,
    pub data: Vec<ChatRecord>,
    /// Number of records in this page.
    pub count: usize,
    /// Number of records in the store.
    pub total: u64,
    pub limit: u64,
    pub offset: u64,
}

/// Raw pagination parameters. Kept as strings so malformed values fall back
/// to defaults instead of rejecting the request.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecordListQuery {
    /// Page size, 1-100. Default: 50.
    pub limit: Option<String>,
    /// Records to skip. Default: 0.
    pub offset: Option<String>,
}

/// Normalized pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: u64,
    pub offset: u64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl RecordListQuery {
    /// Clamp the raw parameters: a missing, unparsable or non-positive limit
    /// becomes 50 and is capped at 100; a missing, unparsable or negative
    /// offset becomes 0.
    pub fn page(&self) -> Page {
        let limit = match parse(self.limit.as_deref()) {
            Some(n) if n > 0 => (n as u64).min(MAX_LIMIT),
            _ => DEFAULT_LIMIT,
        };
        let offset = match parse(self.offset.as_deref()) {
            Some(n) if n >= 0 => n as u64,
            _ => 0,
        };
        Page { limit, offset }
    }
}

fn parse(raw: Option<&str>) -> Option<i64> {
    raw?.parse().ok()
}
