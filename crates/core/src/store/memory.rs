use std::path::Path;

use async_trait::async_trait;
use fractional_site_groq::{evaluate, parse};
use serde_json::Value;

use super::{ContentStore, StoreError};
use crate::document::id::DocumentIdKind;
use crate::document::validate::validate_document;

/// Content store holding a dataset export in memory. Queries run through the
/// local GROQ evaluator with the published perspective: drafts and release
/// versions are never visible.
#[derive(Debug, Clone, Default)]
pub struct MemoryContentStore {
    documents: Vec<Value>,
}

impl MemoryContentStore {
    pub fn new(documents: Vec<Value>) -> Result<Self, StoreError> {
        let total = documents.len();
        let mut published = Vec::with_capacity(total);
        for (index, doc) in documents.into_iter().enumerate() {
            validate_document(&doc).map_err(|source| StoreError::Invalid { index, source })?;
            let id = doc.get("_id").and_then(Value::as_str).unwrap_or_default();
            let kind = DocumentIdKind::parse(id);
            if kind.is_published() {
                published.push(doc);
            } else {
                tracing::trace!(base_id = kind.base_id(), "hiding unpublished document");
            }
        }
        tracing::debug!(
            total,
            published = published.len(),
            "loaded documents into memory store"
        );
        Ok(Self {
            documents: published,
        })
    }

    /// Load a dataset export: a JSON array or newline-delimited JSON.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| StoreError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let documents = parse_export(&text)?;
        tracing::info!(path = %path.display(), documents = documents.len(), "loaded content fixtures");
        Self::new(documents)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

fn parse_export(text: &str) -> Result<Vec<Value>, StoreError> {
    if text.trim_start().starts_with('[') {
        return serde_json::from_str(text).map_err(|source| StoreError::Malformed { line: 1, source });
    }

    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).map_err(|source| StoreError::Malformed { line: i + 1, source })
        })
        .collect()
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn query(&self, query: &str, params: &Value) -> Result<Value, StoreError> {
        let expr = parse(query)?;
        Ok(evaluate(&expr, &self.documents, params)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const FIXTURES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/insights.ndjson");

    #[tokio::test]
    async fn loads_ndjson_export_without_drafts() {
        let store = MemoryContentStore::load(FIXTURES).await.unwrap();
        let posts = store
            .query(r#"count(*[_type == "post"])"#, &json!({}))
            .await
            .unwrap();
        assert_eq!(posts, json!(2));

        let drafts = store
            .query(r#"count(*[_id == "drafts.post-runway"])"#, &json!({}))
            .await
            .unwrap();
        assert_eq!(drafts, json!(0));
        assert!(!store.is_empty());
    }

    #[tokio::test]
    async fn binds_parameters() {
        let store = MemoryContentStore::new(vec![
            json!({"_id": "a", "_type": "news", "title": "A", "slug": {"current": "a"}}),
            json!({"_id": "b", "_type": "news", "title": "B", "slug": {"current": "b"}}),
        ])
        .unwrap();
        let result = store
            .query(r#"*[slug.current == $slug][0].title"#, &json!({"slug": "b"}))
            .await
            .unwrap();
        assert_eq!(result, json!("B"));
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let err = MemoryContentStore::load("/nonexistent/insights.ndjson")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }

    #[test]
    fn parses_json_array_exports() {
        let docs = parse_export(r#"[{"_id": "a", "_type": "x"}]"#).unwrap();
        assert_eq!(docs.len(), 1);
    }

    #[test]
    fn reports_malformed_line() {
        let err = parse_export("{\"_id\": \"a\", \"_type\": \"x\"}\n\n{oops").unwrap_err();
        assert!(matches!(err, StoreError::Malformed { line: 3, .. }));
    }

    #[test]
    fn rejects_invalid_documents() {
        let err = MemoryContentStore::new(vec![json!({"_type": "post"})]).unwrap_err();
        assert!(matches!(err, StoreError::Invalid { index: 0, .. }));
    }

    #[tokio::test]
    async fn parse_errors_surface() {
        let store = MemoryContentStore::default();
        assert!(matches!(
            store.query("*[", &json!({})).await,
            Err(StoreError::Parse(_))
        ));
    }
}
