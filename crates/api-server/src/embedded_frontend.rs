use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use rust_embed::Embed;

#[derive(Embed)]
#[folder = "../../frontend/"]
#[include = "*.html"]
#[include = "*.js"]
#[include = "*.css"]
pub struct FrontendAssets;

/// Serves the embedded single-page dashboard.
pub async fn index() -> Response {
    match FrontendAssets::get("index.html") {
        Some(file) => (
            [(header::CACHE_CONTROL, "no-cache")],
            Html(file.data.into_owned()),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "frontend not bundled").into_response(),
    }
}
