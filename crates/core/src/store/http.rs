use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::Value;

use super::{ContentStore, StoreError};

/// Longest error body kept from a failed response.
const MAX_ERROR_BODY: usize = 512;

/// Connection settings for the hosted content lake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpStoreConfig {
    pub project_id: String,
    pub dataset: String,
    pub api_version: String,
    pub use_cdn: bool,
    pub token: Option<String>,
}

/// Content store backed by the content lake's HTTP query API.
#[derive(Debug, Clone)]
pub struct HttpContentStore {
    client: Client,
    endpoint: Url,
    token: Option<String>,
}

#[derive(Deserialize)]
struct QueryEnvelope {
    #[serde(default)]
    result: Value,
}

impl HttpContentStore {
    pub fn new(config: &HttpStoreConfig) -> Result<Self, StoreError> {
        let endpoint = query_endpoint(config)?;
        let client = Client::builder()
            .user_agent(concat!("fractional-site/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            endpoint,
            token: config.token.clone().filter(|t| !t.is_empty()),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

/// Query endpoint for `config`. Authenticated requests bypass the CDN, which
/// only serves public content.
pub fn query_endpoint(config: &HttpStoreConfig) -> Result<Url, StoreError> {
    let project = config.project_id.trim();
    if project.is_empty() || !project.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(StoreError::Config(format!(
            "invalid project id {:?}",
            config.project_id
        )));
    }
    let dataset = config.dataset.trim();
    if dataset.is_empty() {
        return Err(StoreError::Config("dataset is empty".to_string()));
    }

    let authenticated = config.token.as_deref().is_some_and(|t| !t.is_empty());
    let host = if config.use_cdn && !authenticated {
        "apicdn"
    } else {
        "api"
    };
    let version = config.api_version.trim().trim_start_matches('v');

    let raw = format!("https://{project}.{host}.sanity.io/v{version}/data/query/{dataset}");
    Url::parse(&raw).map_err(|e| StoreError::Config(format!("{raw}: {e}")))
}

#[async_trait]
impl ContentStore for HttpContentStore {
    fn name(&self) -> &'static str {
        "content-lake"
    }

    async fn query(&self, query: &str, params: &Value) -> Result<Value, StoreError> {
        let mut pairs = vec![
            ("query".to_string(), query.to_string()),
            ("perspective".to_string(), "published".to_string()),
        ];
        if let Value::Object(map) = params {
            pairs.extend(map.iter().map(|(name, value)| (format!("${name}"), value.to_string())));
        }

        let mut request = self.client.get(self.endpoint.clone()).query(&pairs);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|i| body.is_char_boundary(*i))
                    .unwrap_or(0);
                body.truncate(cut);
            }
            tracing::warn!(status = status.as_u16(), "content lake query failed");
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: QueryEnvelope = response.json().await?;
        Ok(envelope.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> HttpStoreConfig {
        HttpStoreConfig {
            project_id: "abc123".into(),
            dataset: "production".into(),
            api_version: "2024-01-01".into(),
            use_cdn: true,
            token: None,
        }
    }

    #[test]
    fn uses_cdn_for_public_reads() {
        let url = query_endpoint(&config()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://abc123.apicdn.sanity.io/v2024-01-01/data/query/production"
        );
    }

    #[test]
    fn token_bypasses_cdn() {
        let cfg = HttpStoreConfig {
            token: Some("sk-test".into()),
            api_version: "v2021-10-21".into(),
            ..config()
        };
        let url = query_endpoint(&cfg).unwrap();
        assert_eq!(
            url.as_str(),
            "https://abc123.api.sanity.io/v2021-10-21/data/query/production"
        );
    }

    #[test]
    fn rejects_bad_project_ids() {
        for project_id in ["", "abc.evil.com/", "a b"] {
            let cfg = HttpStoreConfig {
                project_id: project_id.into(),
                ..config()
            };
            assert!(matches!(query_endpoint(&cfg), Err(StoreError::Config(_))));
        }
    }

    #[test]
    fn builds_store() {
        let store = HttpContentStore::new(&config()).unwrap();
        assert_eq!(store.name(), "content-lake");
        assert_eq!(store.endpoint().host_str(), Some("abc123.apicdn.sanity.io"));
    }
}
