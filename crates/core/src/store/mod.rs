//! Read-only access to the content lake.

mod http;
mod memory;

use std::path::PathBuf;

use async_trait::async_trait;
use fractional_site_groq::{EvalError, ParseError};
use serde_json::Value;
use thiserror::Error;

use crate::document::validate::ValidationError;

pub use http::{HttpContentStore, HttpStoreConfig};
pub use memory::MemoryContentStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("content store request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("content store responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid content store configuration: {0}")]
    Config(String),

    #[error("query parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("query evaluation error: {0}")]
    Eval(#[from] EvalError),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed document on line {line}: {source}")]
    Malformed {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid document #{index}: {source}")]
    Invalid {
        index: usize,
        #[source]
        source: ValidationError,
    },
}

/// A queryable content store. Implementations run a GROQ query with
/// `$name` parameters bound from the `params` object and return the raw
/// JSON result.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Short name for logs and health output.
    fn name(&self) -> &'static str;

    async fn query(&self, query: &str, params: &Value) -> Result<Value, StoreError>;
}
