use std::sync::Arc;

use fractional_site_core::revalidate::RevalidationSecret;
use fractional_site_core::store::{HttpContentStore, MemoryContentStore};
use fractional_site_core::{ContentFetcher, ContentStore, ImageUrlBuilder, PageCache, StoreError};

use crate::config::{AppConfig, StoreSource};

/// Shared application state, passed to all handlers via Axum's `State` extractor.
/// Wrapped in `Arc` so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    config: AppConfig,
    fetcher: ContentFetcher,
    cache: PageCache,
    secret: RevalidationSecret,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn ContentStore>) -> Self {
        let images = ImageUrlBuilder::new(config.sanity_project_id.as_deref(), &config.sanity_dataset);
        let cache = PageCache::new(config.page_cache_ttl);
        let secret = RevalidationSecret::new(config.revalidate_secret.clone());
        if !secret.is_configured() {
            tracing::warn!("SANITY_REVALIDATE_SECRET is unset; revalidation requests will be rejected");
        }
        Self {
            inner: Arc::new(InnerState {
                fetcher: ContentFetcher::new(store, images),
                cache,
                secret,
                config,
            }),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn fetcher(&self) -> &ContentFetcher {
        &self.inner.fetcher
    }

    pub fn cache(&self) -> &PageCache {
        &self.inner.cache
    }

    pub fn secret(&self) -> &RevalidationSecret {
        &self.inner.secret
    }
}

/// Open the content store named by `source`.
pub async fn open_store(source: &StoreSource) -> Result<Arc<dyn ContentStore>, StoreError> {
    match source {
        StoreSource::Fixtures(path) => Ok(Arc::new(MemoryContentStore::load(path).await?)),
        StoreSource::ContentLake(config) => Ok(Arc::new(HttpContentStore::new(config)?)),
    }
}
