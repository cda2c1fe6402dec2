//! GROQ queries issued by the content fetcher.

use crate::document::model::ContentKind;

/// Fields every listing card needs. References to authors are resolved to a
/// display name; inline author strings pass through.
pub const CARD_PROJECTION: &str = r#"{
  _id,
  _type,
  title,
  slug,
  description,
  mainImage,
  publishedAt,
  "author": coalesce(author->name, author),
  readTime
}"#;

/// Published documents of `kind` that carry a slug, newest first.
pub fn list_query(kind: ContentKind) -> String {
    format!(
        r#"*[_type == "{}" && defined(slug)] | order(publishedAt desc) {CARD_PROJECTION}"#,
        kind.type_name()
    )
}

/// One round trip for all three listing sections.
pub fn insights_query() -> String {
    format!(
        r#"{{
  "posts": {},
  "caseStudies": {},
  "news": {}
}}"#,
        list_query(ContentKind::Post),
        list_query(ContentKind::CaseStudy),
        list_query(ContentKind::News),
    )
}

/// First document of any insight kind whose slug equals `$slug`.
pub fn by_slug_query() -> String {
    let kinds = ContentKind::ALL
        .iter()
        .map(|kind| format!("{:?}", kind.type_name()))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        r#"*[_type in [{kinds}] && (slug.current == $slug || slug == $slug)] | order(publishedAt desc) [0] {{
  ...,
  "author": coalesce(author->name, author)
}}"#
    )
}

/// Cheap liveness check.
pub const PING_QUERY: &str = "count(*)";
