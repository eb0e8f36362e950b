mod error;
mod images;
mod issuer;
mod traits;

#[cfg(feature = "object-storage")]
pub mod s3_store;

pub use error::StorageError;
pub use images::{ImageStore, object_name_for};
pub use issuer::{PRESIGN_VALIDITY, UrlIssuer, UrlMode};
pub use traits::{ObjectSigner, ObjectUploader};
