//! Webhook-driven invalidation of cached insight pages.

use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use crate::cache::PageCache;
use crate::document::model::SlugField;
use crate::view::{insight_path, INSIGHTS_PATH};

/// Shared secret the CMS webhook must present. An unset secret rejects every
/// request.
#[derive(Clone, Default)]
pub struct RevalidationSecret(Option<String>);

impl RevalidationSecret {
    pub fn new(secret: Option<String>) -> Self {
        Self(secret.filter(|s| !s.is_empty()))
    }

    pub fn is_configured(&self) -> bool {
        self.0.is_some()
    }

    pub fn verify(&self, candidate: Option<&str>) -> bool {
        match (self.0.as_deref(), candidate) {
            (Some(expected), Some(candidate)) => {
                expected.as_bytes().ct_eq(candidate.as_bytes()).unwrap_u8() == 1
            }
            _ => false,
        }
    }
}

impl std::fmt::Debug for RevalidationSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shown = if self.0.is_some() { "<redacted>" } else { "<unset>" };
        f.debug_tuple("RevalidationSecret").field(&shown).finish()
    }
}

#[derive(Debug, Default, Deserialize)]
struct WebhookBody {
    #[serde(default)]
    slug: Option<SlugField>,
}

/// Slug named by a webhook body. Anything unparseable, a missing field or a
/// blank slug all mean "no slug".
pub fn slug_from_body(body: &[u8]) -> Option<String> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return None;
    }
    let parsed: WebhookBody = match serde_json::from_slice(body) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::debug!(error = %e, "ignoring malformed revalidation body");
            WebhookBody::default()
        }
    };
    parsed
        .slug
        .as_ref()
        .and_then(SlugField::resolve)
        .map(str::to_string)
}

/// Paths to invalidate: the listing always, the detail page when a slug is
/// known.
pub fn paths_for(slug: Option<&str>) -> Vec<String> {
    let mut paths = vec![INSIGHTS_PATH.to_string()];
    if let Some(slug) = slug {
        paths.push(insight_path(slug));
    }
    paths
}

/// Outcome of a successful revalidation, serialized as the webhook response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Revalidation {
    pub ok: bool,
    pub revalidated: bool,
    pub slug: Option<String>,
}

/// Drop every cached render affected by `slug`. Completes only once all
/// paths are gone from the cache.
pub async fn revalidate(cache: &PageCache, slug: Option<String>) -> Revalidation {
    let paths = paths_for(slug.as_deref());
    for path in &paths {
        cache.revalidate_path(path).await;
    }
    tracing::info!(slug = ?slug, paths = ?paths, "revalidated insights");
    Revalidation {
        ok: true,
        revalidated: true,
        slug,
    }
}
