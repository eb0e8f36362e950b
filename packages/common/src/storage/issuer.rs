use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use super::traits::ObjectSigner;
use crate::payload::ImageReference;

/// Validity window of presigned URLs.
pub const PRESIGN_VALIDITY: Duration = Duration::from_secs(12 * 60 * 60);

/// How image URLs are produced. Chosen once per process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlMode {
    /// Buckets are world-readable behind `endpoint`; URLs are composed, not signed.
    Public { endpoint: String },
    /// Buckets are access-controlled; URLs are presigned.
    Private,
}

impl UrlMode {
    /// Public mode when a non-blank endpoint is given, private otherwise.
    pub fn from_public_endpoint(endpoint: Option<&str>) -> Self {
        match endpoint.map(str::trim).filter(|e| !e.is_empty()) {
            Some(endpoint) => Self::Public {
                endpoint: endpoint.trim_end_matches('/').to_string(),
            },
            None => Self::Private,
        }
    }
}

/// Turns image references into access URLs.
///
/// Issuance never fails: a reference that cannot be signed yields an empty
/// string so the surrounding record can still be served.
#[derive(Clone)]
pub struct UrlIssuer {
    default_bucket: String,
    mode: UrlMode,
    signer: Arc<dyn ObjectSigner>,
}

impl UrlIssuer {
    pub fn new(
        default_bucket: impl Into<String>,
        mode: UrlMode,
        signer: Arc<dyn ObjectSigner>,
    ) -> Self {
        Self {
            default_bucket: default_bucket.into(),
            mode,
            signer,
        }
    }

    /// Issue an access URL for `reference`, or an empty string if none can be produced.
    pub async fn issue(&self, reference: &ImageReference) -> String {
        let bucket = reference.bucket().unwrap_or(&self.default_bucket);
        let Some(object_name) = reference.object_name() else {
            warn!(bucket, "Image reference names no object");
            return String::new();
        };

        match &self.mode {
            UrlMode::Public { endpoint } => {
                info!(bucket, object_name, "Composing public image URL");
                format!("{endpoint}/{bucket}/{object_name}")
            }
            UrlMode::Private => {
                info!(bucket, object_name, "Presigning image URL");
                match self
                    .signer
                    .presign_get(bucket, object_name, PRESIGN_VALIDITY)
                    .await
                {
                    Ok(url) => url,
                    Err(e) => {
                        error!(bucket, object_name, error = %e, "Failed to presign image URL");
                        String::new()
                    }
                }
            }
        }
    }
}
