mod log_payload;
mod reference;

pub use log_payload::{
    IMAGE_REF_KEY, IMAGE_REFS_KEY, IMAGE_URL_KEY, IMAGE_URL_SUFFIX, IMAGE_URLS_KEY, LogPayload,
    PayloadError,
};
pub use reference::{ImageReference, LEGACY_REFERENCE_NAME, ResolvedReferences, extract};
