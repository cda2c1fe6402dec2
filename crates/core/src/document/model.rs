use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::portable_text::Block;

/// The content types the site renders, named after their CMS `_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentKind {
    Post,
    CaseStudy,
    News,
}

impl ContentKind {
    pub const ALL: [ContentKind; 3] = [ContentKind::Post, ContentKind::CaseStudy, ContentKind::News];

    /// The CMS `_type` value.
    pub fn type_name(self) -> &'static str {
        match self {
            ContentKind::Post => "post",
            ContentKind::CaseStudy => "caseStudy",
            ContentKind::News => "news",
        }
    }

    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.type_name() == name)
    }

    pub fn label(self) -> &'static str {
        match self {
            ContentKind::Post => "Article",
            ContentKind::CaseStudy => "Case Study",
            ContentKind::News => "News",
        }
    }

    /// Lower-case plural used in listings and empty-state messages.
    pub fn plural(self) -> &'static str {
        match self {
            ContentKind::Post => "posts",
            ContentKind::CaseStudy => "case studies",
            ContentKind::News => "news",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A slug as the CMS may send it: a plain string or `{"current": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SlugField {
    Plain(String),
    Object {
        #[serde(default)]
        current: Option<String>,
    },
}

impl SlugField {
    /// The slug text, trimmed; `None` when absent or blank.
    pub fn resolve(&self) -> Option<&str> {
        let raw = match self {
            SlugField::Plain(s) => Some(s.as_str()),
            SlugField::Object { current } => current.as_deref(),
        };
        raw.map(str::trim).filter(|s| !s.is_empty())
    }
}

/// A non-empty document slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SlugField", into = "SlugField")]
pub struct Slug(String);

impl Slug {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<SlugField> for Slug {
    type Error = &'static str;

    fn try_from(field: SlugField) -> Result<Self, Self::Error> {
        field
            .resolve()
            .map(|s| Slug(s.to_string()))
            .ok_or("slug is empty")
    }
}

impl From<Slug> for SlugField {
    fn from(slug: Slug) -> Self {
        SlugField::Object {
            current: Some(slug.0),
        }
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reference to an image asset plus editorial hints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRef {
    #[serde(default)]
    pub asset: Option<AssetRef>,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub crop: Option<Crop>,
    #[serde(default)]
    pub hotspot: Option<Hotspot>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetRef {
    #[serde(rename = "_ref", default)]
    pub reference: Option<String>,
    /// Present when the query dereferenced the asset.
    #[serde(default)]
    pub url: Option<String>,
}

/// Fractions of the source image trimmed from each edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Crop {
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub bottom: f64,
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub right: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Hotspot {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub width: f64,
}

/// Author as stored on the document: a plain name or a (dereferenced)
/// person object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Author {
    Name(String),
    Profile {
        #[serde(default)]
        name: Option<String>,
    },
}

impl Author {
    pub fn display_name(&self) -> Option<&str> {
        let name = match self {
            Author::Name(name) => Some(name.as_str()),
            Author::Profile { name } => name.as_deref(),
        };
        name.map(str::trim).filter(|s| !s.is_empty())
    }
}

/// A post, case study or news item read from the content store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_type")]
    pub kind: ContentKind,
    pub title: String,
    pub slug: Slug,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub main_image: Option<ImageRef>,
    /// ISO-8601 datetime or date, as entered in the CMS.
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default, deserialize_with = "deserialize_read_time")]
    pub read_time: Option<String>,
    #[serde(default)]
    pub body: Option<Vec<Block>>,
}

impl ContentDocument {
    pub fn published_date(&self) -> Option<DateTime<Utc>> {
        self.published_at.as_deref().and_then(parse_timestamp)
    }

    pub fn author_name(&self) -> Option<&str> {
        self.author.as_ref().and_then(Author::display_name)
    }
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Read time is free text in the CMS, but older documents store minutes.
fn deserialize_read_time<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Minutes(u64),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Text(text)) => Some(text.trim().to_string()).filter(|s| !s.is_empty()),
        Some(Raw::Minutes(minutes)) => Some(format!("{minutes} min read")),
        None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn slug_accepts_both_shapes() {
        let plain: Slug = serde_json::from_value(json!("cash-runway")).unwrap();
        let object: Slug = serde_json::from_value(json!({"current": "cash-runway"})).unwrap();
        assert_eq!(plain, object);
        assert!(serde_json::from_value::<Slug>(json!({"current": "  "})).is_err());
        assert!(serde_json::from_value::<Slug>(json!({})).is_err());
    }

    #[test]
    fn decodes_full_document() {
        let doc: ContentDocument = serde_json::from_value(json!({
            "_id": "post-1",
            "_type": "caseStudy",
            "title": "Closing the books in five days",
            "slug": {"_type": "slug", "current": "five-day-close"},
            "description": "How a SaaS client shortened month-end.",
            "mainImage": {"asset": {"_ref": "image-abc-1200x800-jpg"}, "alt": "Ledger"},
            "publishedAt": "2024-02-14T08:30:00Z",
            "author": "Dana Reyes",
            "readTime": 6,
            "body": [{"_type": "block", "children": [{"_type": "span", "text": "Hi"}]}]
        }))
        .unwrap();

        assert_eq!(doc.kind, ContentKind::CaseStudy);
        assert_eq!(doc.slug.as_str(), "five-day-close");
        assert_eq!(doc.read_time.as_deref(), Some("6 min read"));
        assert_eq!(doc.author_name(), Some("Dana Reyes"));
        assert_eq!(doc.body.as_ref().map(Vec::len), Some(1));
        assert_eq!(
            doc.published_date().map(|d| d.to_rfc3339()),
            Some("2024-02-14T08:30:00+00:00".to_string())
        );
    }

    #[test]
    fn optional_fields_may_be_absent_or_null() {
        let doc: ContentDocument = serde_json::from_value(json!({
            "_id": "news-1",
            "_type": "news",
            "title": "We moved",
            "slug": "we-moved",
            "description": null,
            "author": {"name": null}
        }))
        .unwrap();
        assert!(doc.description.is_none());
        assert!(doc.author_name().is_none());
        assert!(doc.published_date().is_none());
    }

    #[test]
    fn parses_date_only_timestamps() {
        let ts = parse_timestamp("2023-11-02").unwrap();
        assert_eq!(ts.to_rfc3339(), "2023-11-02T00:00:00+00:00");
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn kind_names_round_trip() {
        for kind in ContentKind::ALL {
            assert_eq!(ContentKind::from_type_name(kind.type_name()), Some(kind));
        }
        assert_eq!(ContentKind::from_type_name("person"), None);
    }
}
