pub mod json;
pub mod record_id;
