//! Content layer for the fractional CFO site: document model, rich-text
//! rendering, content stores, the content fetcher and the page cache that
//! revalidation webhooks invalidate.

pub mod cache;
pub mod document;
pub mod fetch;
pub mod image;
pub mod portable_text;
pub mod revalidate;
pub mod store;
pub mod view;

pub use cache::PageCache;
pub use document::model::{ContentDocument, ContentKind};
pub use fetch::{ContentFetcher, FetchError, InsightsList};
pub use image::ImageUrlBuilder;
pub use store::{ContentStore, StoreError};
pub use view::{BlogItem, InsightsView};
