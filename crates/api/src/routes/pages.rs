use axum::{extract::State, http::StatusCode, response::Response, routing::get, Router};
use fractional_site_core::BlogItem;

use crate::site;
use crate::state::AppState;
use crate::views::{
    render_template_response, AboutTemplate, ContactContent, ContactTemplate, HomeContent,
    HomeTemplate, LayoutChrome, LayoutContext, ServicesTemplate,
};

/// Articles featured on the home page.
const HOME_FEATURED: usize = 3;

/// Marketing pages with static copy.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/services", get(services))
        .route("/who-we-are", get(who_we_are))
        .route("/contact", get(contact))
}

async fn home(State(state): State<AppState>) -> Response {
    let fetcher = state.fetcher();
    let list = fetcher.fetch_insights_list().await;
    let latest = list
        .posts
        .iter()
        .take(HOME_FEATURED)
        .map(|doc| BlogItem::from_document(doc, fetcher.images()))
        .collect();

    let content = HomeContent {
        home: &site::HOME,
        services: site::SERVICES,
        latest,
    };
    let view = LayoutContext::new(
        LayoutChrome::new(state.config(), "/"),
        state.config().site_name.clone(),
        content,
    );
    render_template_response(&HomeTemplate { view }, StatusCode::OK)
}

async fn services(State(state): State<AppState>) -> Response {
    let view = LayoutContext::new(
        LayoutChrome::new(state.config(), "/services"),
        "Services",
        site::SERVICES,
    );
    render_template_response(&ServicesTemplate { view }, StatusCode::OK)
}

async fn who_we_are(State(state): State<AppState>) -> Response {
    let view = LayoutContext::new(
        LayoutChrome::new(state.config(), "/who-we-are"),
        "Who We Are",
        &site::ABOUT,
    );
    render_template_response(&AboutTemplate { view }, StatusCode::OK)
}

async fn contact(State(state): State<AppState>) -> Response {
    let view = LayoutContext::new(
        LayoutChrome::new(state.config(), "/contact"),
        "Contact",
        ContactContent {
            email: site::CONTACT_EMAIL,
        },
    );
    render_template_response(&ContactTemplate { view }, StatusCode::OK)
}
