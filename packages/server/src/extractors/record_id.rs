use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;

use crate::error::AppError;

/// Numeric chat record id taken from the `{id}` path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordId(pub i64);

impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;
        parse_record_id(&raw).map(RecordId)
    }
}

pub fn parse_record_id(raw: &str) -> Result<i64, AppError> {
    if raw.trim().is_empty() {
        return Err(AppError::Validation("Record ID cannot be empty".into()));
    }
    raw.parse()
        .map_err(|_| AppError::Validation("Invalid record ID format".into()))
}
