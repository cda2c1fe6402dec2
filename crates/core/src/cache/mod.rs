//! Rendered page cache keyed by request path.
//!
//! Entries expire after a fixed TTL. Revalidation removes a path so the next
//! request renders it from fresh content.
//!
//! Every path carries a generation that revalidation bumps. A render reads
//! the generation before it fetches content and stores its body only if the
//! generation is unchanged, so a render that raced a publish cannot put the
//! old page back.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

#[derive(Debug, Clone)]
pub struct CachedPage {
    pub body: String,
    pub rendered_at: Instant,
}

/// Revalidation count for a path, read before rendering it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation(u64);

#[derive(Debug, Default)]
struct Entries {
    pages: HashMap<String, CachedPage>,
    generations: HashMap<String, u64>,
}

impl Entries {
    fn generation(&self, path: &str) -> u64 {
        self.generations.get(path).copied().unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct PageCache {
    inner: Arc<RwLock<Entries>>,
    ttl: Duration,
}

/// `/insights/` and `/insights` share an entry.
fn normalize(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

impl PageCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Entries::default())),
            ttl,
        }
    }

    /// Body cached for `path`, if it is still fresh.
    pub async fn get(&self, path: &str) -> Option<String> {
        let entries = self.inner.read().await;
        let page = entries.pages.get(normalize(path))?;
        (page.rendered_at.elapsed() < self.ttl).then(|| page.body.clone())
    }

    pub async fn generation(&self, path: &str) -> Generation {
        Generation(self.inner.read().await.generation(normalize(path)))
    }

    /// Store `body` for `path` unless the path was revalidated after
    /// `generation` was read. Returns whether the body was stored.
    pub async fn insert_if_generation(
        &self,
        path: &str,
        generation: Generation,
        body: String,
    ) -> bool {
        let path = normalize(path);
        let mut entries = self.inner.write().await;
        if entries.generation(path) != generation.0 {
            tracing::debug!(path, "discarded render that predates revalidation");
            return false;
        }
        let page = CachedPage {
            body,
            rendered_at: Instant::now(),
        };
        entries.pages.insert(path.to_string(), page);
        true
    }

    /// Drop the entry for `path` and bump its generation. Returns whether an
    /// entry was present; dropping a path that was never cached is not an
    /// error.
    pub async fn revalidate_path(&self, path: &str) -> bool {
        let path = normalize(path);
        let mut entries = self.inner.write().await;
        *entries.generations.entry(path.to_string()).or_default() += 1;
        let removed = entries.pages.remove(path).is_some();
        tracing::debug!(path, removed, "revalidated path");
        removed
    }

    /// Number of entries, stale ones included.
    pub async fn len(&self) -> usize {
        self.inner.read().await.pages.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
