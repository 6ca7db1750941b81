//! Home page

use axum::response::Html;

const HOME_HTML: &str = include_str!("../../ui/home.html");

/// GET /
pub async fn serve_home() -> Html<&'static str> {
    Html(HOME_HTML)
}
