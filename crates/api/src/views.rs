use askama::Template;
use axum::{
    http::{HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
};
use chrono::Datelike;
use fractional_site_core::{BlogItem, ContentKind, InsightsView};

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::site::{self, About, Home, Service};

pub struct NavLinkView {
    pub label: &'static str,
    pub href: &'static str,
    pub active: bool,
}

/// Header and footer shared by every page.
#[derive(Clone)]
pub struct LayoutChrome {
    pub site_name: String,
    pub booking_url: Option<String>,
    pub current_path: String,
    pub year: i32,
}

impl LayoutChrome {
    pub fn new(config: &AppConfig, current_path: &str) -> Self {
        Self {
            site_name: config.site_name.clone(),
            booking_url: config.booking_url.clone(),
            current_path: current_path.to_string(),
            year: chrono::Utc::now().year(),
        }
    }
}

pub struct LayoutContext<T> {
    pub title: String,
    pub site_name: String,
    pub booking_url: Option<String>,
    pub navigation: Vec<NavLinkView>,
    pub year: i32,
    pub content: T,
}

impl<T> LayoutContext<T> {
    pub fn new(chrome: LayoutChrome, title: impl Into<String>, content: T) -> Self {
        let navigation = site::NAVIGATION
            .iter()
            .map(|entry| NavLinkView {
                label: entry.label,
                href: entry.href,
                active: is_active(entry.href, &chrome.current_path),
            })
            .collect();
        Self {
            title: title.into(),
            site_name: chrome.site_name,
            booking_url: chrome.booking_url,
            navigation,
            year: chrome.year,
            content,
        }
    }
}

fn is_active(href: &str, current: &str) -> bool {
    if href == "/" {
        current == "/"
    } else {
        current == href || current.starts_with(&format!("{href}/"))
    }
}

pub struct HomeContent {
    pub home: &'static Home,
    pub services: &'static [Service],
    pub latest: Vec<BlogItem>,
}

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub view: LayoutContext<HomeContent>,
}

#[derive(Template)]
#[template(path = "services.html")]
pub struct ServicesTemplate {
    pub view: LayoutContext<&'static [Service]>,
}

#[derive(Template)]
#[template(path = "who_we_are.html")]
pub struct AboutTemplate {
    pub view: LayoutContext<&'static About>,
}

pub struct ContactContent {
    pub email: &'static str,
}

#[derive(Template)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub view: LayoutContext<ContactContent>,
}

/// One listing section with its empty-state message.
pub struct SectionView {
    pub id: &'static str,
    pub heading: &'static str,
    pub empty_message: String,
    pub items: Vec<BlogItem>,
}

impl SectionView {
    pub fn new(kind: ContentKind, items: &[BlogItem]) -> Self {
        let (id, heading) = match kind {
            ContentKind::Post => ("articles", "Articles"),
            ContentKind::CaseStudy => ("case-studies", "Case Studies"),
            ContentKind::News => ("news", "News"),
        };
        Self {
            id,
            heading,
            empty_message: format!("No {} found.", kind.plural()),
            items: items.to_vec(),
        }
    }
}

pub fn sections(view: &InsightsView) -> Vec<SectionView> {
    view.sections()
        .into_iter()
        .map(|(kind, items)| SectionView::new(kind, items))
        .collect()
}

#[derive(Template)]
#[template(path = "insights.html")]
pub struct InsightsTemplate {
    pub view: LayoutContext<Vec<SectionView>>,
}

pub struct InsightContent {
    pub item: BlogItem,
    pub kind_label: &'static str,
    pub hero_url: Option<String>,
    pub body_html: String,
}

#[derive(Template)]
#[template(path = "insight.html")]
pub struct InsightTemplate {
    pub view: LayoutContext<InsightContent>,
}

pub struct ErrorContent {
    pub status: u16,
    pub heading: &'static str,
    pub message: &'static str,
}

impl ErrorContent {
    pub fn not_found() -> Self {
        Self {
            status: 404,
            heading: "Page not found",
            message: "The page you were looking for does not exist or has moved.",
        }
    }

    pub fn unavailable() -> Self {
        Self {
            status: 503,
            heading: "Temporarily unavailable",
            message: "We could not load this page right now. Please try again shortly.",
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub view: LayoutContext<ErrorContent>,
}

pub fn render_template<T: Template>(template: &T) -> Result<String, ApiError> {
    Ok(template.render()?)
}

pub fn render_template_response<T: Template>(template: &T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn render_error_response(chrome: LayoutChrome, content: ErrorContent) -> Response {
    let status = StatusCode::from_u16(content.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let title = content.heading;
    let view = LayoutContext::new(chrome, title, content);
    render_template_response(&ErrorTemplate { view }, status)
}

pub fn render_not_found_response(chrome: LayoutChrome) -> Response {
    render_error_response(chrome, ErrorContent::not_found())
}

/// HTML response tagged with whether it came from the page cache.
pub fn cached_html(body: String, hit: bool) -> Response {
    let mut response = Html(body).into_response();
    let value = if hit { "HIT" } else { "MISS" };
    response
        .headers_mut()
        .insert("x-cache", HeaderValue::from_static(value));
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_active_navigation() {
        assert!(is_active("/", "/"));
        assert!(!is_active("/", "/insights"));
        assert!(is_active("/insights", "/insights/runway"));
        assert!(!is_active("/insights", "/insightsful"));
    }

    #[test]
    fn empty_sections_name_their_kind() {
        let view = InsightsView::default();
        let messages: Vec<_> = sections(&view)
            .into_iter()
            .map(|section| section.empty_message)
            .collect();
        assert_eq!(
            messages,
            ["No posts found.", "No case studies found.", "No news found."]
        );
    }

    #[test]
    fn error_page_renders_with_status() {
        let chrome = LayoutChrome::new(&AppConfig::default(), "/missing");
        let response = render_not_found_response(chrome);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
