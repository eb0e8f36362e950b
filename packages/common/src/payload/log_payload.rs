use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use super::reference::{self, ResolvedReferences};

pub const IMAGE_REF_KEY: &str = "image_ref";
pub const IMAGE_REFS_KEY: &str = "image_refs";
pub const IMAGE_URL_KEY: &str = "image_url";
pub const IMAGE_URLS_KEY: &str = "image_urls";
/// Appended to a reference name to form its key inside `image_urls`.
pub const IMAGE_URL_SUFFIX: &str = "_image_url";

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("log payload must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// Free-form data attached to a chat record.
///
/// A thin wrapper over a JSON object. Keys this type knows nothing about are
/// carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogPayload(Map<String, Value>);

impl LogPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Image references carried by this payload.
    pub fn image_references(&self) -> ResolvedReferences {
        reference::extract(self)
    }

    /// Point the legacy `image_ref` at an uploaded object, replacing any previous reference.
    pub fn set_image_ref(&mut self, bucket: &str, key: &str) {
        let mut reference = Map::new();
        reference.insert("bucket".to_string(), Value::String(bucket.to_string()));
        reference.insert("key".to_string(), Value::String(key.to_string()));
        self.0.insert(IMAGE_REF_KEY.to_string(), Value::Object(reference));
    }

    /// Set the legacy top-level `image_url`.
    pub fn set_image_url(&mut self, url: &str) {
        self.0
            .insert(IMAGE_URL_KEY.to_string(), Value::String(url.to_string()));
    }

    /// Write `<name>_image_url` entries into the `image_urls` object.
    ///
    /// Existing entries are overwritten and unrelated ones kept. A non-object
    /// `image_urls` value is replaced.
    pub fn set_image_urls(&mut self, urls: &BTreeMap<String, String>) {
        let slot = self
            .0
            .entry(IMAGE_URLS_KEY)
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        if let Value::Object(image_urls) = slot {
            for (name, url) in urls {
                image_urls.insert(
                    format!("{name}{IMAGE_URL_SUFFIX}"),
                    Value::String(url.clone()),
                );
            }
        }
    }
}

impl From<Map<String, Value>> for LogPayload {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for LogPayload {
    type Error = PayloadError;

    /// `null` becomes an empty payload; any other non-object is rejected.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::default()),
            Value::Bool(_) => Err(PayloadError::NotAnObject("boolean")),
            Value::Number(_) => Err(PayloadError::NotAnObject("number")),
            Value::String(_) => Err(PayloadError::NotAnObject("string")),
            Value::Array(_) => Err(PayloadError::NotAnObject("array")),
        }
    }
}

impl From<LogPayload> for Value {
    fn from(payload: LogPayload) -> Self {
        payload.into_value()
    }
}
