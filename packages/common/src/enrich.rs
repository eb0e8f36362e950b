//! Resolving image references of a payload into access URLs.

use std::collections::BTreeMap;

use tracing::debug;

use crate::payload::{LogPayload, ResolvedReferences};
use crate::storage::UrlIssuer;

/// Issue a URL for each resolved reference and write them back into `payload`.
///
/// URLs land under `image_urls.<name>_image_url`. When exactly one reference
/// was resolved its URL is also written to the top-level `image_url`. With no
/// references the payload is returned as is.
///
/// Every URL is issued before the payload is touched, so dropping the future
/// midway never leaves a half-enriched payload behind.
pub async fn enrich(
    mut payload: LogPayload,
    references: &ResolvedReferences,
    issuer: &UrlIssuer,
) -> LogPayload {
    if references.is_empty() {
        return payload;
    }

    let mut urls = BTreeMap::new();
    for (name, reference) in references {
        let url = issuer.issue(reference).await;
        debug!(name, issued = !url.is_empty(), "Issued image URL");
        urls.insert(name.clone(), url);
    }

    payload.set_image_urls(&urls);
    if urls.len() == 1
        && let Some(url) = urls.values().next()
    {
        payload.set_image_url(url);
    }
    payload
}

/// Resolves and issues image URLs for payloads using one process-wide issuer.
#[derive(Clone)]
pub struct PayloadEnricher {
    issuer: UrlIssuer,
}

impl PayloadEnricher {
    pub fn new(issuer: UrlIssuer) -> Self {
        Self { issuer }
    }

    pub async fn enrich(&self, payload: LogPayload) -> LogPayload {
        let references = payload.image_references();
        enrich(payload, &references, &self.issuer).await
    }
}
