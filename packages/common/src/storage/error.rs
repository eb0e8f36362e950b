use std::fmt;

/// Errors that can occur while talking to object storage.
#[derive(Debug)]
pub enum StorageError {
    /// Required storage settings are missing or malformed.
    Config(String),
    /// Access credentials were rejected while building the client.
    Credentials(String),
    /// A presigned URL could not be produced for an object.
    Signing {
        bucket: String,
        object_name: String,
        reason: String,
    },
    /// The storage backend returned an error or was unreachable.
    Backend(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "invalid storage configuration: {msg}"),
            Self::Credentials(msg) => write!(f, "invalid storage credentials: {msg}"),
            Self::Signing {
                bucket,
                object_name,
                reason,
            } => write!(f, "failed to sign {bucket}/{object_name}: {reason}"),
            Self::Backend(msg) => write!(f, "object storage error: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {}

#[cfg(feature = "object-storage")]
impl From<s3::error::S3Error> for StorageError {
    fn from(err: s3::error::S3Error) -> Self {
        Self::Backend(err.to_string())
    }
}
