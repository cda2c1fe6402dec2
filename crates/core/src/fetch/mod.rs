//! Typed reads over a [`ContentStore`].
//!
//! The listing read is fail-open: any store failure yields empty sections so
//! the page still renders. Single-document reads surface errors so callers can
//! tell "not found" from "unavailable".

pub mod queries;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use thiserror::Error;

use crate::document::model::{ContentDocument, ContentKind};
use crate::image::ImageUrlBuilder;
use crate::store::{ContentStore, StoreError};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("unexpected query result: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The three listing sections, each newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsightsList {
    pub posts: Vec<ContentDocument>,
    pub case_studies: Vec<ContentDocument>,
    pub news: Vec<ContentDocument>,
    /// Set when the store could not be reached and the sections were
    /// defaulted to empty.
    pub degraded: bool,
}

impl InsightsList {
    pub fn unavailable() -> Self {
        Self {
            degraded: true,
            ..Self::default()
        }
    }

    pub fn total(&self) -> usize {
        self.posts.len() + self.case_studies.len() + self.news.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

#[derive(Clone)]
pub struct ContentFetcher {
    store: Arc<dyn ContentStore>,
    images: ImageUrlBuilder,
}

impl ContentFetcher {
    pub fn new(store: Arc<dyn ContentStore>, images: ImageUrlBuilder) -> Self {
        Self { store, images }
    }

    pub fn images(&self) -> &ImageUrlBuilder {
        &self.images
    }

    pub fn store_name(&self) -> &'static str {
        self.store.name()
    }

    /// All published posts, case studies and news items. Never fails; a
    /// store error is logged and reported through [`InsightsList::degraded`].
    pub async fn fetch_insights_list(&self) -> InsightsList {
        match self.try_fetch_insights_list().await {
            Ok(list) => {
                tracing::debug!(
                    posts = list.posts.len(),
                    case_studies = list.case_studies.len(),
                    news = list.news.len(),
                    "fetched insights"
                );
                list
            }
            Err(e) => {
                tracing::error!(store = self.store.name(), error = %e, "failed to fetch insights");
                InsightsList::unavailable()
            }
        }
    }

    async fn try_fetch_insights_list(&self) -> Result<InsightsList, FetchError> {
        let result = self
            .store
            .query(&queries::insights_query(), &json!({}))
            .await?;
        let mut sections = match result {
            Value::Object(map) => map,
            Value::Null => Default::default(),
            other => {
                return Err(FetchError::Decode(serde::de::Error::custom(format!(
                    "expected an object of sections, got {other}"
                ))))
            }
        };
        let mut section = |key: &str| decode_documents(sections.remove(key).unwrap_or(Value::Null));
        Ok(InsightsList {
            posts: section("posts"),
            case_studies: section("caseStudies"),
            news: section("news"),
            degraded: false,
        })
    }

    /// Published documents of one kind, newest first.
    pub async fn fetch_kind(&self, kind: ContentKind) -> Result<Vec<ContentDocument>, FetchError> {
        let result = self
            .store
            .query(&queries::list_query(kind), &json!({}))
            .await?;
        Ok(decode_documents(result))
    }

    /// The insight whose slug is `slug`, of any kind. A blank slug matches
    /// nothing and is answered without querying.
    pub async fn fetch_by_slug(&self, slug: &str) -> Result<Option<ContentDocument>, FetchError> {
        let slug = slug.trim();
        if slug.is_empty() {
            return Ok(None);
        }
        let result = self
            .store
            .query(&queries::by_slug_query(), &json!({ "slug": slug }))
            .await?;
        decode_optional(result)
    }

    /// Document count, used by the health check.
    pub async fn ping(&self) -> Result<u64, FetchError> {
        let result = self.store.query(queries::PING_QUERY, &json!({})).await?;
        Ok(serde_json::from_value(result)?)
    }
}

/// Decode an array of documents, dropping entries that do not fit the model.
fn decode_documents(value: Value) -> Vec<ContentDocument> {
    let Value::Array(items) = value else {
        return Vec::new();
    };
    items
        .into_iter()
        .filter_map(|item| {
            let id = item.get("_id").and_then(Value::as_str).map(str::to_owned);
            match serde_json::from_value::<ContentDocument>(item) {
                Ok(doc) => Some(doc),
                Err(e) => {
                    tracing::warn!(id = ?id, error = %e, "skipping malformed document");
                    None
                }
            }
        })
        .collect()
}

fn decode_optional<T: DeserializeOwned>(value: Value) -> Result<Option<T>, FetchError> {
    if value.is_null() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_value(value)?))
}
