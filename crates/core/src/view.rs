use serde::Serialize;

use crate::document::model::{ContentDocument, ContentKind};
use crate::fetch::InsightsList;
use crate::image::ImageUrlBuilder;

/// Listing path for all insights.
pub const INSIGHTS_PATH: &str = "/insights";

/// Shown when a document has no author.
pub const DEFAULT_AUTHOR: &str = "Editorial Team";

/// Width requested for listing thumbnails.
const CARD_IMAGE_WIDTH: u32 = 800;

/// Detail path for the insight with `slug`.
pub fn insight_path(slug: &str) -> String {
    format!("{INSIGHTS_PATH}/{slug}")
}

/// Flattened projection of a document for list rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogItem {
    pub kind: ContentKind,
    pub title: String,
    pub href: String,
    pub description: String,
    pub image_url: Option<String>,
    pub image_alt: String,
    pub date: Option<String>,
    pub author: String,
    pub read_time: Option<String>,
}

impl BlogItem {
    pub fn from_document(doc: &ContentDocument, images: &ImageUrlBuilder) -> Self {
        let image = doc.main_image.as_ref();
        Self {
            kind: doc.kind,
            title: doc.title.clone(),
            href: insight_path(doc.slug.as_str()),
            description: doc.description.clone().unwrap_or_default(),
            image_url: image.and_then(|img| images.url_for(img, Some(CARD_IMAGE_WIDTH))),
            image_alt: image
                .and_then(|img| img.alt.clone())
                .unwrap_or_else(|| doc.title.clone()),
            date: format_date(doc),
            author: doc.author_name().unwrap_or(DEFAULT_AUTHOR).to_string(),
            read_time: doc.read_time.clone(),
        }
    }
}

/// Human-formatted publication date, e.g. `March 5, 2024`.
pub fn format_date(doc: &ContentDocument) -> Option<String> {
    doc.published_date()
        .map(|date| date.format("%B %-d, %Y").to_string())
}

/// The insights listing, one section per content kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsView {
    pub posts: Vec<BlogItem>,
    pub case_studies: Vec<BlogItem>,
    pub news: Vec<BlogItem>,
}

impl InsightsView {
    pub fn from_list(list: &InsightsList, images: &ImageUrlBuilder) -> Self {
        let items = |docs: &[ContentDocument]| {
            docs.iter()
                .map(|doc| BlogItem::from_document(doc, images))
                .collect::<Vec<_>>()
        };
        Self {
            posts: items(list.posts.as_slice()),
            case_studies: items(list.case_studies.as_slice()),
            news: items(list.news.as_slice()),
        }
    }

    /// Sections in display order.
    pub fn sections(&self) -> [(ContentKind, &[BlogItem]); 3] {
        [
            (ContentKind::Post, self.posts.as_slice()),
            (ContentKind::CaseStudy, self.case_studies.as_slice()),
            (ContentKind::News, self.news.as_slice()),
        ]
    }
}
