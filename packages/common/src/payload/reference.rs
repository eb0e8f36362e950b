use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::log_payload::{IMAGE_REF_KEY, IMAGE_REFS_KEY, LogPayload};

/// Name given to a reference resolved from the legacy `image_ref` field.
pub const LEGACY_REFERENCE_NAME: &str = "image";

/// Image references keyed by name, iterated in name order.
pub type ResolvedReferences = BTreeMap<String, ImageReference>;

/// Pointer to an image held in object storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_name: Option<String>,
    /// Older writers store the object name here instead of `object_name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl ImageReference {
    /// Parse a reference-shaped JSON value.
    ///
    /// Only non-empty string fields count. Returns `None` when `value` is not an
    /// object or names no object at all. When `object_name` is missing it is
    /// filled from `key`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let fields = value.as_object()?;
        let mut reference = Self {
            bucket: non_empty_string(fields, "bucket"),
            object_name: non_empty_string(fields, "object_name"),
            key: non_empty_string(fields, "key"),
        };
        if reference.object_name.is_none() {
            reference.object_name = reference.key.clone();
        }
        reference.object_name.is_some().then_some(reference)
    }

    /// Bucket named by the reference, if any.
    pub fn bucket(&self) -> Option<&str> {
        self.bucket.as_deref().filter(|b| !b.is_empty())
    }

    /// Effective object name: `object_name`, falling back to `key`.
    pub fn object_name(&self) -> Option<&str> {
        self.object_name
            .as_deref()
            .filter(|o| !o.is_empty())
            .or_else(|| self.key.as_deref().filter(|k| !k.is_empty()))
    }
}

fn non_empty_string(fields: &Map<String, Value>, name: &str) -> Option<String> {
    fields
        .get(name)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

/// Collect the image references of a payload.
///
/// Valid entries of `image_refs` win. Only when that field yields nothing is
/// the legacy `image_ref` consulted, under the name [`LEGACY_REFERENCE_NAME`].
pub fn extract(payload: &LogPayload) -> ResolvedReferences {
    let resolved: ResolvedReferences = payload
        .get(IMAGE_REFS_KEY)
        .and_then(Value::as_object)
        .into_iter()
        .flatten()
        .filter_map(|(name, value)| {
            ImageReference::from_value(value).map(|reference| (name.clone(), reference))
        })
        .collect();

    if !resolved.is_empty() {
        return resolved;
    }

    payload
        .get(IMAGE_REF_KEY)
        .and_then(ImageReference::from_value)
        .map(|reference| (LEGACY_REFERENCE_NAME.to_string(), reference))
        .into_iter()
        .collect()
}
