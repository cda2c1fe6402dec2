use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::image::ImageUrlBuilder;

use super::{Block, ListKind, MarkDef, Span, TextBlock};

/// Width requested for inline body images.
const BODY_IMAGE_WIDTH: u32 = 1200;

/// Render Portable Text blocks to HTML. Consecutive list items are grouped
/// into (nested) lists; unknown block types and unknown marks render nothing
/// extra.
pub fn render_html(blocks: &[Block], images: &ImageUrlBuilder) -> String {
    let mut html = String::new();
    let mut lists = ListStack::default();

    for block in blocks {
        match block {
            Block::Block(text) => match text.list_item {
                Some(kind) => {
                    lists.enter_item(&mut html, kind, text.level.unwrap_or(1).max(1));
                    render_spans(&mut html, text);
                }
                None => {
                    lists.close_all(&mut html);
                    render_text_block(&mut html, text);
                }
            },
            Block::Image(image) => {
                lists.close_all(&mut html);
                if let Some(src) = images.url_for(image, Some(BODY_IMAGE_WIDTH)) {
                    html.push_str("<figure><img src=\"");
                    html.push_str(&encode_double_quoted_attribute(&src));
                    html.push_str("\" alt=\"");
                    html.push_str(&encode_double_quoted_attribute(
                        image.alt.as_deref().unwrap_or_default(),
                    ));
                    html.push_str("\" loading=\"lazy\">");
                    if let Some(caption) = image.caption.as_deref() {
                        html.push_str("<figcaption>");
                        html.push_str(&encode_text(caption));
                        html.push_str("</figcaption>");
                    }
                    html.push_str("</figure>");
                }
            }
            Block::Unknown => {}
        }
    }

    lists.close_all(&mut html);
    html
}

/// Open lists, innermost last. The flag records whether the list has an
/// `<li>` still open.
#[derive(Default)]
struct ListStack {
    open: Vec<(ListKind, bool)>,
}

impl ListStack {
    fn enter_item(&mut self, html: &mut String, kind: ListKind, level: usize) {
        while self.open.len() > level {
            self.close_one(html);
        }
        if self.open.len() == level && self.open.last().is_some_and(|(k, _)| *k != kind) {
            self.close_one(html);
        }
        while self.open.len() < level {
            html.push('<');
            html.push_str(kind.tag());
            html.push('>');
            self.open.push((kind, false));
        }
        if let Some((_, item_open)) = self.open.last_mut() {
            if *item_open {
                html.push_str("</li>");
            }
            html.push_str("<li>");
            *item_open = true;
        }
    }

    fn close_one(&mut self, html: &mut String) {
        if let Some((kind, item_open)) = self.open.pop() {
            if item_open {
                html.push_str("</li>");
            }
            html.push_str("</");
            html.push_str(kind.tag());
            html.push('>');
        }
    }

    fn close_all(&mut self, html: &mut String) {
        while !self.open.is_empty() {
            self.close_one(html);
        }
    }
}

fn render_text_block(html: &mut String, block: &TextBlock) {
    let tag = match block.style.as_str() {
        "h1" => "h1",
        "h2" => "h2",
        "h3" => "h3",
        "h4" => "h4",
        "h5" => "h5",
        "h6" => "h6",
        "blockquote" => "blockquote",
        _ => "p",
    };
    html.push('<');
    html.push_str(tag);
    html.push('>');
    render_spans(html, block);
    html.push_str("</");
    html.push_str(tag);
    html.push('>');
}

fn render_spans(html: &mut String, block: &TextBlock) {
    for span in &block.children {
        render_span(html, span, &block.mark_defs);
    }
}

fn render_span(html: &mut String, span: &Span, mark_defs: &[MarkDef]) {
    let mut closers = Vec::with_capacity(span.marks.len());

    for mark in &span.marks {
        let (open, close) = match mark.as_str() {
            "strong" => ("<strong>".to_string(), "</strong>"),
            "em" => ("<em>".to_string(), "</em>"),
            "code" => ("<code>".to_string(), "</code>"),
            "underline" => ("<u>".to_string(), "</u>"),
            "strike-through" => ("<s>".to_string(), "</s>"),
            key => match mark_defs.iter().find(|def| def.key == key) {
                Some(def) => match link_open_tag(def) {
                    Some(open) => (open, "</a>"),
                    None => continue,
                },
                None => continue,
            },
        };
        html.push_str(&open);
        closers.push(close);
    }

    for (i, line) in span.text.split('\n').enumerate() {
        if i > 0 {
            html.push_str("<br>");
        }
        html.push_str(&encode_text(line));
    }

    for close in closers.into_iter().rev() {
        html.push_str(close);
    }
}

fn link_open_tag(def: &MarkDef) -> Option<String> {
    if def.kind != "link" {
        return None;
    }
    let href = def.href.as_deref().filter(|href| is_safe_href(href))?;
    let external = href.starts_with("http://") || href.starts_with("https://");
    let mut tag = format!("<a href=\"{}\"", encode_double_quoted_attribute(href));
    if def.blank || external {
        tag.push_str(" target=\"_blank\" rel=\"noopener noreferrer\"");
    }
    tag.push('>');
    Some(tag)
}

fn is_safe_href(href: &str) -> bool {
    let lower = href.trim_start().to_ascii_lowercase();
    ["http://", "https://", "mailto:", "tel:", "/", "#"]
        .iter()
        .any(|prefix| lower.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn render(value: Value) -> String {
        let blocks: Vec<Block> = serde_json::from_value(value).unwrap();
        render_html(&blocks, &ImageUrlBuilder::new(Some("proj1"), "production"))
    }

    fn text(style: &str, body: &str) -> Value {
        json!({"_type": "block", "style": style, "children": [{"_type": "span", "text": body}]})
    }

    fn item(kind: &str, level: usize, body: &str) -> Value {
        json!({"_type": "block", "listItem": kind, "level": level, "children": [{"_type": "span", "text": body}]})
    }

    #[test]
    fn renders_headings_paragraphs_and_quotes() {
        let html = render(json!([
            text("h2", "Why runway matters"),
            text("normal", "Cash is oxygen."),
            text("blockquote", "Revenue is vanity."),
        ]));
        assert_eq!(
            html,
            "<h2>Why runway matters</h2><p>Cash is oxygen.</p><blockquote>Revenue is vanity.</blockquote>"
        );
    }

    #[test]
    fn escapes_text() {
        let html = render(json!([text("normal", "P&L <draft>")]));
        assert_eq!(html, "<p>P&amp;L &lt;draft&gt;</p>");
    }

    #[test]
    fn quotes_are_escaped_inside_attributes_only() {
        let html = render(json!([
            {
                "_type": "block",
                "markDefs": [{"_key": "l1", "_type": "link", "href": "/search?q=\"cfo\""}],
                "children": [{"_type": "span", "text": "\"Cash\" <is> king", "marks": ["l1"]}]
            },
            {"_type": "image", "asset": {"_ref": "image-abc123-800x600-jpg"}, "alt": "Q1 \"burn\"", "caption": "<b>Q1</b>"}
        ]));
        assert_eq!(
            html,
            "<p><a href=\"/search?q=&quot;cfo&quot;\">\"Cash\" &lt;is&gt; king</a></p>\
             <figure><img src=\"https://cdn.sanity.io/images/proj1/production/abc123-800x600.jpg?w=1200&amp;auto=format\" alt=\"Q1 &quot;burn&quot;\" loading=\"lazy\">\
             <figcaption>&lt;b&gt;Q1&lt;/b&gt;</figcaption></figure>"
        );
    }

    #[test]
    fn applies_decorators_and_links() {
        let html = render(json!([{
            "_type": "block",
            "markDefs": [{"_key": "l1", "_type": "link", "href": "https://example.com/a?b=1&c=2"}],
            "children": [
                {"_type": "span", "text": "Read ", "marks": []},
                {"_type": "span", "text": "this", "marks": ["strong", "l1"]},
                {"_type": "span", "text": " now", "marks": ["em", "missing"]}
            ]
        }]));
        assert_eq!(
            html,
            "<p>Read <strong><a href=\"https://example.com/a?b=1&amp;c=2\" target=\"_blank\" rel=\"noopener noreferrer\">this</a></strong><em> now</em></p>"
        );
    }

    #[test]
    fn drops_script_links() {
        let html = render(json!([{
            "_type": "block",
            "markDefs": [{"_key": "x", "_type": "link", "href": "javascript:alert(1)"}],
            "children": [{"_type": "span", "text": "click", "marks": ["x"]}]
        }]));
        assert_eq!(html, "<p>click</p>");
    }

    #[test]
    fn groups_and_nests_list_items() {
        let html = render(json!([
            item("bullet", 1, "Forecast"),
            item("bullet", 2, "Weekly"),
            item("bullet", 1, "Report"),
            item("number", 1, "First"),
            text("normal", "Done"),
        ]));
        assert_eq!(
            html,
            "<ul><li>Forecast<ul><li>Weekly</li></ul></li><li>Report</li></ul><ol><li>First</li></ol><p>Done</p>"
        );
    }

    #[test]
    fn renders_images_with_cdn_url() {
        let html = render(json!([
            {"_type": "image", "asset": {"_ref": "image-abc123-800x600-jpg"}, "alt": "Chart"},
            {"_type": "image", "asset": {"_ref": "not-an-image"}}
        ]));
        assert_eq!(
            html,
            "<figure><img src=\"https://cdn.sanity.io/images/proj1/production/abc123-800x600.jpg?w=1200&amp;auto=format\" alt=\"Chart\" loading=\"lazy\"></figure>"
        );
    }

    #[test]
    fn soft_breaks_become_br() {
        let html = render(json!([text("normal", "line one\nline two")]));
        assert_eq!(html, "<p>line one<br>line two</p>");
    }
}
