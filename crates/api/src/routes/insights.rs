use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use fractional_site_core::portable_text::render_html;
use fractional_site_core::view::{insight_path, INSIGHTS_PATH};
use fractional_site_core::{BlogItem, InsightsView};

use crate::state::AppState;
use crate::views::{
    cached_html, render_error_response, render_not_found_response, render_template, sections,
    ErrorContent, InsightContent, InsightTemplate, InsightsTemplate, LayoutChrome, LayoutContext,
};

/// Width requested for the detail page hero image.
const HERO_IMAGE_WIDTH: u32 = 1600;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/insights", get(insights_page))
        .route("/insights/", get(insights_page))
        .route("/insights/{slug}", get(insight_page))
        .route("/api/insights", get(insights_json))
}

/// Listing page. Served from the page cache until revalidated or expired.
/// Degraded renders (store unavailable) are never cached, nor are renders
/// that a revalidation overtook while they were fetching.
async fn insights_page(State(state): State<AppState>) -> Response {
    if let Some(body) = state.cache().get(INSIGHTS_PATH).await {
        return cached_html(body, true);
    }
    let generation = state.cache().generation(INSIGHTS_PATH).await;

    let fetcher = state.fetcher();
    let list = fetcher.fetch_insights_list().await;
    let view = InsightsView::from_list(&list, fetcher.images());
    let template = InsightsTemplate {
        view: LayoutContext::new(
            LayoutChrome::new(state.config(), INSIGHTS_PATH),
            "Insights",
            sections(&view),
        ),
    };
    let body = match render_template(&template) {
        Ok(body) => body,
        Err(err) => return err.into_response(),
    };

    if !list.degraded {
        state
            .cache()
            .insert_if_generation(INSIGHTS_PATH, generation, body.clone())
            .await;
    }
    cached_html(body, false)
}

/// Detail page for one insight. Unknown slugs get the 404 page; a store
/// failure gets a 503 page rather than a misleading "not found".
async fn insight_page(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    let path = insight_path(&slug);
    if let Some(body) = state.cache().get(&path).await {
        return cached_html(body, true);
    }
    let generation = state.cache().generation(&path).await;

    let chrome = LayoutChrome::new(state.config(), &path);
    let fetcher = state.fetcher();
    let doc = match fetcher.fetch_by_slug(&slug).await {
        Ok(Some(doc)) => doc,
        Ok(None) => return render_not_found_response(chrome),
        Err(e) => {
            tracing::error!(slug = %slug, error = %e, "failed to fetch insight");
            return render_error_response(chrome, ErrorContent::unavailable());
        }
    };

    let images = fetcher.images();
    let content = InsightContent {
        item: BlogItem::from_document(&doc, images),
        kind_label: doc.kind.label(),
        hero_url: doc
            .main_image
            .as_ref()
            .and_then(|image| images.url_for(image, Some(HERO_IMAGE_WIDTH))),
        body_html: doc
            .body
            .as_deref()
            .map(|blocks| render_html(blocks, images))
            .unwrap_or_default(),
    };
    let template = InsightTemplate {
        view: LayoutContext::new(chrome, doc.title.clone(), content),
    };
    let body = match render_template(&template) {
        Ok(body) => body,
        Err(err) => return err.into_response(),
    };

    state
        .cache()
        .insert_if_generation(&path, generation, body.clone())
        .await;
    cached_html(body, false)
}

/// The listing as JSON, with the same fail-open behavior as the page.
async fn insights_json(State(state): State<AppState>) -> Json<InsightsView> {
    let fetcher = state.fetcher();
    let list = fetcher.fetch_insights_list().await;
    Json(InsightsView::from_list(&list, fetcher.images()))
}
