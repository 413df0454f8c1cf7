//! Plain HTML pages posting to the inventory API.

use axum::Router;
use axum::response::Html;
use axum::routing::get;

static REGISTER_PAGE: &str = include_str!("../templates/register.html");
static SEARCH_PAGE: &str = include_str!("../templates/search.html");

/// Build the `/forms/*` routes.
pub fn routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/forms/register", get(register_page))
        .route("/forms/search", get(search_page))
}

async fn register_page() -> Html<&'static str> {
    Html(REGISTER_PAGE)
}

async fn search_page() -> Html<&'static str> {
    Html(SEARCH_PAGE)
}
