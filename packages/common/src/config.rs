use serde::Deserialize;

use crate::storage::{StorageError, UrlMode};

/// Object storage configuration shared by every component that resolves images.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// S3-compatible endpoint, e.g. "localhost:9000" or "https://s3.example.com".
    /// A bare host is treated as plain HTTP.
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    /// Bucket used when an image reference does not name one.
    pub bucket: String,
    /// Signing region. Default: "us-east-1".
    #[serde(default = "default_region")]
    pub region: String,
    /// Base URL of a world-readable mirror of the storage. When set, image URLs
    /// are composed against it instead of being presigned.
    #[serde(default)]
    pub public_endpoint: Option<String>,
    /// Create the default bucket at startup if it is missing. Default: true.
    #[serde(default = "default_ensure_bucket")]
    pub ensure_bucket: bool,
}

fn default_region() -> String {
    "us-east-1".into()
}
fn default_ensure_bucket() -> bool {
    true
}

impl StorageConfig {
    /// Reject configurations missing any of the settings needed to reach the backend.
    pub fn validate(&self) -> Result<(), StorageError> {
        let missing: Vec<&str> = [
            ("endpoint", &self.endpoint),
            ("access_key", &self.access_key),
            ("secret_key", &self.secret_key),
            ("bucket", &self.bucket),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(StorageError::Config(format!(
                "missing required settings: {}",
                missing.join(", ")
            )))
        }
    }

    /// URL issuance mode selected by the presence of `public_endpoint`.
    pub fn url_mode(&self) -> UrlMode {
        UrlMode::from_public_endpoint(self.public_endpoint.as_deref())
    }
}
