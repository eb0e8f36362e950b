pub mod config;
pub mod enrich;
pub mod payload;
pub mod storage;

pub use config::StorageConfig;
pub use enrich::PayloadEnricher;
pub use payload::{ImageReference, LogPayload, ResolvedReferences};
