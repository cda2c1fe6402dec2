//! Portable Text: the CMS's rich-text format, a flat sequence of typed
//! blocks whose spans carry decorator marks and annotation keys.

mod render;

use serde::{Deserialize, Serialize};

use crate::document::model::ImageRef;

pub use render::render_html;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_type", rename_all = "camelCase")]
pub enum Block {
    Block(TextBlock),
    Image(ImageRef),
    /// Custom block types the site has no renderer for.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBlock {
    #[serde(default = "default_style")]
    pub style: String,
    #[serde(default)]
    pub children: Vec<Span>,
    #[serde(default)]
    pub mark_defs: Vec<MarkDef>,
    #[serde(default)]
    pub list_item: Option<ListKind>,
    #[serde(default)]
    pub level: Option<usize>,
}

fn default_style() -> String {
    "normal".to_string()
}

/// Inline text run. Non-span inline objects decode with empty text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Span {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub marks: Vec<String>,
}

/// Annotation referenced from a span's marks by `_key`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkDef {
    #[serde(rename = "_key")]
    pub key: String,
    #[serde(rename = "_type")]
    pub kind: String,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub blank: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Bullet,
    Number,
}

impl ListKind {
    fn tag(self) -> &'static str {
        match self {
            ListKind::Bullet => "ul",
            ListKind::Number => "ol",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_blocks_and_skips_unknown_types() {
        let blocks: Vec<Block> = serde_json::from_value(json!([
            {"_type": "block", "_key": "a", "style": "h2", "children": [{"_type": "span", "text": "Runway", "marks": []}], "markDefs": []},
            {"_type": "image", "_key": "b", "asset": {"_ref": "image-x-10x10-png"}, "alt": "chart"},
            {"_type": "codeEmbed", "_key": "c", "code": "print()"}
        ]))
        .unwrap();

        assert!(matches!(&blocks[0], Block::Block(b) if b.style == "h2" && b.children[0].text == "Runway"));
        assert!(matches!(&blocks[1], Block::Image(img) if img.alt.as_deref() == Some("chart")));
        assert_eq!(blocks[2], Block::Unknown);
    }

    #[test]
    fn text_block_defaults() {
        let block: Block = serde_json::from_value(json!({"_type": "block"})).unwrap();
        let Block::Block(text) = block else {
            panic!("expected text block");
        };
        assert_eq!(text.style, "normal");
        assert!(text.children.is_empty());
        assert!(text.list_item.is_none());
    }
}
